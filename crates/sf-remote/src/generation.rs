//! Asynchronous 3D asset generation: submit an image, poll the job until it
//! reaches a terminal state, then download the result.

use std::path::Path;

use sf_core::{AssetFormat, Result};

mod client;
mod runner;
pub mod schemas;

pub use client::{DEFAULT_GENERATION_ENDPOINT, TrellisClient};
pub use runner::{GeneratedAsset, JobEvent, JobRunner};
use schemas::JobStatusResponse;

/// Transport for the generation service. The runner drives the job state
/// machine through this trait only.
pub trait JobApi {
    /// Create a job for `image` and return its identifier.
    fn submit(&self, image: &Path, format: AssetFormat) -> Result<String>;

    /// Fetch the current status of a job.
    fn status(&self, job_id: &str) -> Result<JobStatusResponse>;

    /// Download a finished asset.
    fn download(&self, url: &str) -> Result<Vec<u8>>;
}

impl<T: JobApi + ?Sized> JobApi for &T {
    fn submit(&self, image: &Path, format: AssetFormat) -> Result<String> {
        (**self).submit(image, format)
    }

    fn status(&self, job_id: &str) -> Result<JobStatusResponse> {
        (**self).status(job_id)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        (**self).download(url)
    }
}
