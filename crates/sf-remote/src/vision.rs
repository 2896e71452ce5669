//! Single-shot image analysis against the Gemini `generateContent` API.
//!
//! The image travels inline as base64 and the key goes in the `key` query
//! parameter. Whatever comes back is surfaced to the caller: a clean answer
//! as [`VisionAnswer::Text`], anything else as [`VisionAnswer::Raw`].

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use sf_core::{Result, Secret};

use crate::http::{build_client, image_mime_type, redact_query};

pub const DEFAULT_VISION_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro-vision:generateContent";

const ANSWER_POINTER: &str = "/candidates/0/content/parts/0/text";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Part<'a> {
    Text(&'a str),
    InlineData(InlineData<'a>),
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

/// What the vision service said about the image.
#[derive(Debug, Clone, PartialEq)]
pub enum VisionAnswer {
    /// `candidates[0].content.parts[0].text` was present
    Text(String),
    /// The expected structure was missing; the whole response is kept for
    /// manual inspection
    Raw(Value),
}

impl VisionAnswer {
    pub fn from_response(response: Value) -> Self {
        match response.pointer(ANSWER_POINTER).and_then(Value::as_str) {
            Some(text) => Self::Text(text.to_string()),
            None => Self::Raw(response),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Raw(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl std::fmt::Display for VisionAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Raw(Value::String(body)) => f.write_str(body),
            Self::Raw(value) => write!(f, "{value}"),
        }
    }
}

pub struct VisionClient {
    http: Client,
    endpoint: String,
    key: Secret,
}

impl VisionClient {
    pub fn new(endpoint: impl Into<String>, key: &Secret) -> Result<Self> {
        Ok(Self::with_client(build_client(None)?, endpoint, key))
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>, key: &Secret) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            key: key.clone(),
        }
    }

    /// Read the image at `image_path` and ask the model about it.
    pub fn analyze(&self, image_path: &Path, prompt: &str) -> Result<VisionAnswer> {
        let bytes = std::fs::read(image_path)?;
        self.analyze_bytes(&bytes, image_mime_type(image_path), prompt)
    }

    pub fn analyze_bytes(&self, image: &[u8], mime_type: &str, prompt: &str) -> Result<VisionAnswer> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text(prompt),
                    Part::InlineData(InlineData {
                        mime_type,
                        data: STANDARD.encode(image),
                    }),
                ],
            }],
        };

        info!("Sending {} byte image ({}) for analysis", image.len(), mime_type);

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.key.expose())])
            .json(&request)
            .send()?;

        let status = response.status();
        let url = redact_query(response.url());
        let body = response.text()?;
        debug!("Vision response from {}: HTTP {}, {} bytes", url, status, body.len());

        let value = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));

        if !status.is_success() {
            warn!("Vision service returned HTTP {}, surfacing raw response", status);
            return Ok(VisionAnswer::Raw(value));
        }

        let answer = VisionAnswer::from_response(value);
        if answer.is_degraded() {
            warn!("Vision response has no candidate text, surfacing raw response");
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_nested_text() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "DESCRIPTION: a mug\nSTATUS: NOT BROKEN" }, { "text": "ignored" }] }
            }]
        });

        let answer = VisionAnswer::from_response(response);
        assert_eq!(answer.text(), Some("DESCRIPTION: a mug\nSTATUS: NOT BROKEN"));
        assert!(!answer.is_degraded());
    }

    #[test]
    fn test_missing_shape_falls_back_to_raw() {
        let response = json!({ "error": { "code": 400, "message": "API key not valid" } });

        let answer = VisionAnswer::from_response(response.clone());
        assert_eq!(answer, VisionAnswer::Raw(response));
        assert!(answer.is_degraded());
        assert!(answer.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_non_string_text_is_raw() {
        let response = json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] });
        assert!(VisionAnswer::from_response(response).is_degraded());
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text("describe"),
                    Part::InlineData(InlineData {
                        mime_type: "image/jpeg",
                        data: STANDARD.encode(b"\xff\xd8\xff"),
                    }),
                ],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{
                    "parts": [
                        { "text": "describe" },
                        { "inline_data": { "mime_type": "image/jpeg", "data": "/9j/" } }
                    ]
                }]
            })
        );
    }
}
