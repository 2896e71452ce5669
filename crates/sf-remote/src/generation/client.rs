use std::path::Path;

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use sf_core::{AssetFormat, Error, Result, Secret};

use crate::generation::JobApi;
use crate::generation::schemas::{JobCreateResponse, JobStatusResponse};
use crate::http::{build_client, ensure_success, image_mime_type};

pub const DEFAULT_GENERATION_ENDPOINT: &str = "https://integrate.api.nvidia.com/v1/microsoft/trellis";

/// HTTP transport for the TRELLIS job API on NVIDIA NIM.
///
/// Job calls carry the key as a bearer token. Asset downloads are plain GETs
/// without it: the returned URL is treated as pre-signed.
pub struct TrellisClient {
    http: Client,
    base_url: String,
    token: Secret,
}

impl TrellisClient {
    pub fn new(base_url: impl Into<String>, token: &Secret) -> Result<Self> {
        Ok(Self::with_client(build_client(None)?, base_url, token))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, token: &Secret) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.clone(),
        }
    }

    fn jobs_url(&self) -> String {
        format!("{}/jobs", self.base_url)
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{}", self.base_url, job_id)
    }
}

impl JobApi for TrellisClient {
    fn submit(&self, image: &Path, format: AssetFormat) -> Result<String> {
        let bytes = std::fs::read(image)?;
        let mime_type = image_mime_type(image);
        let file_name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());

        info!("Submitting {} ({} bytes) for {} generation", file_name, bytes.len(), format);

        let part = Part::bytes(bytes).file_name(file_name).mime_str(mime_type)?;
        let form = Form::new()
            .part("image", part)
            .text("output_format", format.id().to_string());

        let response = self
            .http
            .post(self.jobs_url())
            .bearer_auth(self.token.expose())
            .multipart(form)
            .send()?;
        let body = ensure_success(response)?.text()?;

        let created: JobCreateResponse =
            serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
                context: "job submission",
                detail: format!("{e}: {body}"),
            })?;

        created
            .job_id()
            .map(str::to_string)
            .ok_or_else(|| Error::MalformedResponse {
                context: "job submission",
                detail: format!("response has no string `id`: {body}"),
            })
    }

    fn status(&self, job_id: &str) -> Result<JobStatusResponse> {
        let response = self
            .http
            .get(self.job_url(job_id))
            .bearer_auth(self.token.expose())
            .send()?;
        let body = ensure_success(response)?.text()?;
        debug!("Status for job {}: {}", job_id, body);

        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
            context: "job status",
            detail: format!("{e}: {body}"),
        })
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = ensure_success(self.http.get(url).send()?)?;
        Ok(response.bytes()?.to_vec())
    }
}
