use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sf_core::AssetFormat;
use sf_core::job::JobStatus;

/// Reply to a job submission. Only `id` is read, and it is checked by the
/// client rather than by the schema so a wrong type reads as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobCreateResponse {
    pub id: Option<Value>,
}

impl JobCreateResponse {
    pub fn job_id(&self) -> Option<&str> {
        self.id.as_ref()?.as_str().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// Status payload. `status` is the only required field; everything else is
/// kept loose because the service varies its shape between states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    pub result: Option<JobResult>,
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobResult {
    #[serde(default)]
    pub assets: HashMap<String, Value>,
}

impl JobStatusResponse {
    /// `result.assets.<format>.url`, if the service provided one
    pub fn asset_url(&self, format: AssetFormat) -> Option<&str> {
        self.result
            .as_ref()?
            .assets
            .get(format.id())?
            .get("url")?
            .as_str()
            .filter(|url| !url.is_empty())
    }

    /// The service's explanation for a failed job, flattened to one line.
    pub fn failure_reason(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            Value::Object(fields) => match fields.get("message").and_then(Value::as_str) {
                Some(message) => Some(message.to_string()),
                None => Some(Value::Object(fields.clone()).to_string()),
            },
            other => Some(other.to_string()),
        }
    }
}
