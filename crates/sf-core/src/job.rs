use serde::{Deserialize, Serialize};

/// Status of a remote generation job as reported by the service.
///
/// Only `succeeded` and `failed` are terminal. Every other value the service
/// sends (`queued`, `running`, `pending`, ...) is kept verbatim and treated
/// as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    InProgress(String),
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            other => Self::InProgress(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress(raw) => raw,
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress(_))
    }

    pub fn icon(&self) -> &str {
        match self {
            Self::InProgress(_) => "⚡",
            Self::Succeeded => "✅",
            Self::Failed => "❌",
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::parse("succeeded").is_active());
        assert!(!JobStatus::parse("failed").is_active());
        assert!(JobStatus::parse("running").is_active());
        assert!(JobStatus::parse("queued").is_active());
    }

    #[test]
    fn test_unknown_status_kept_verbatim() {
        let status = JobStatus::parse("Succeeded");
        assert_eq!(status, JobStatus::InProgress("Succeeded".into()));
        assert_eq!(status.to_string(), "Succeeded");
    }

    #[test]
    fn test_deserialize_from_json_string() {
        let status: JobStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(status, JobStatus::Failed);

        let status: JobStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(status, JobStatus::InProgress("processing".into()));
    }
}
