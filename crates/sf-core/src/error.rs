use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ERROR: {0} environment variable is not set.")]
    MissingCredential(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Capture command `{command}` failed: {reason}")]
    Capture { command: String, reason: String },

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus { url: String, status: u16, body: String },

    #[error("Malformed response from {context}: {detail}")]
    MalformedResponse { context: &'static str, detail: String },

    #[error("Generation job {job_id} failed{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    JobFailed { job_id: String, reason: Option<String> },

    #[error("Gave up on job {job_id} after {attempts} status checks ({elapsed:?})")]
    PollTimedOut { job_id: String, attempts: u32, elapsed: Duration },

    #[error("Failed to write {}: {source}", .path.display())]
    Persist { path: PathBuf, source: std::io::Error },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The remote service reported the job as failed. This is a normal
    /// terminal outcome, not a transport or parsing problem.
    pub fn is_job_failure(&self) -> bool {
        matches!(self, Self::JobFailed { .. })
    }

    /// Errors a bounded retry may absorb while polling.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}
