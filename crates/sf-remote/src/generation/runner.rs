use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{info, warn};
use sf_core::job::JobStatus;
use sf_core::persist::write_atomic;
use sf_core::poll::{PollStrategy, Sleeper, ThreadSleeper};
use sf_core::{AssetFormat, Error, Result};

use crate::generation::JobApi;

/// Progress notifications emitted while a job is driven to completion.
#[derive(Debug)]
pub enum JobEvent<'a> {
    Submitted { job_id: &'a str },
    Polled { job_id: &'a str, attempt: u32, status: &'a JobStatus },
    TransientError { job_id: &'a str, attempt: u32, error: &'a Error },
    Downloading { url: &'a str },
    Saved { path: &'a Path, bytes: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAsset {
    pub job_id: String,
    pub format: AssetFormat,
    pub path: PathBuf,
    pub bytes: usize,
    pub polls: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Drives one generation job: submit, poll until terminal, fetch.
pub struct JobRunner<A, S = ThreadSleeper> {
    api: A,
    sleeper: S,
    strategy: PollStrategy,
    format: AssetFormat,
}

impl<A: JobApi> JobRunner<A> {
    pub fn new(api: A, strategy: PollStrategy) -> Self {
        Self {
            api,
            sleeper: ThreadSleeper,
            strategy,
            format: AssetFormat::default(),
        }
    }
}

impl<A: JobApi, S: Sleeper> JobRunner<A, S> {
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> JobRunner<A, T> {
        JobRunner {
            api: self.api,
            sleeper,
            strategy: self.strategy,
            format: self.format,
        }
    }

    pub fn with_format(mut self, format: AssetFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> AssetFormat {
        self.format
    }

    /// Full workflow for a new image.
    pub fn run(
        &self,
        image: &Path,
        output: &Path,
        mut on_event: impl FnMut(JobEvent<'_>),
    ) -> Result<GeneratedAsset> {
        let job_id = self.submit(image)?;
        on_event(JobEvent::Submitted { job_id: &job_id });
        self.resume(&job_id, output, on_event)
    }

    pub fn submit(&self, image: &Path) -> Result<String> {
        let job_id = self.api.submit(image, self.format)?;
        info!("Generation job {} submitted", job_id);
        Ok(job_id)
    }

    /// Poll and fetch a job that was submitted earlier.
    pub fn resume(
        &self,
        job_id: &str,
        output: &Path,
        mut on_event: impl FnMut(JobEvent<'_>),
    ) -> Result<GeneratedAsset> {
        let started_at = Utc::now();
        let (url, polls) = self.wait(job_id, &mut on_event)?;
        let bytes = self.fetch(&url, output, &mut on_event)?;

        Ok(GeneratedAsset {
            job_id: job_id.to_string(),
            format: self.format,
            path: output.to_path_buf(),
            bytes,
            polls,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Block until the job is terminal. Returns the asset URL and the number
    /// of status checks made.
    pub fn wait(&self, job_id: &str, mut on_event: impl FnMut(JobEvent<'_>)) -> Result<(String, u32)> {
        let started = Instant::now();
        let mut attempts = 0u32;
        let mut consecutive_errors = 0u32;

        let timed_out = |attempts| Error::PollTimedOut {
            job_id: job_id.to_string(),
            attempts,
            elapsed: started.elapsed(),
        };

        loop {
            if !self.strategy.allows_another(attempts, started) {
                return Err(timed_out(attempts));
            }

            self.sleeper.sleep(self.strategy.pause(started));
            // The pause may end exactly on the deadline; no late check after it.
            if self.strategy.deadline_passed(started) {
                return Err(timed_out(attempts));
            }
            attempts += 1;

            let response = match self.api.status(job_id) {
                Ok(response) => {
                    consecutive_errors = 0;
                    response
                }
                Err(e) if e.is_transient() && consecutive_errors < self.strategy.transient_retries => {
                    consecutive_errors += 1;
                    warn!(
                        "Status check {} for job {} failed ({}), retry {}/{}",
                        attempts, job_id, e, consecutive_errors, self.strategy.transient_retries
                    );
                    on_event(JobEvent::TransientError { job_id, attempt: attempts, error: &e });
                    continue;
                }
                Err(e) => return Err(e),
            };

            on_event(JobEvent::Polled {
                job_id,
                attempt: attempts,
                status: &response.status,
            });

            match &response.status {
                JobStatus::Succeeded => {
                    let url = response.asset_url(self.format).ok_or_else(|| Error::MalformedResponse {
                        context: "job status",
                        detail: format!("job {job_id} succeeded without result.assets.{}.url", self.format.id()),
                    })?;
                    info!("Generation job {} succeeded after {} status checks", job_id, attempts);
                    return Ok((url.to_string(), attempts));
                }
                JobStatus::Failed => {
                    warn!("Generation job {} failed", job_id);
                    return Err(Error::JobFailed {
                        job_id: job_id.to_string(),
                        reason: response.failure_reason(),
                    });
                }
                JobStatus::InProgress(_) => {}
            }
        }
    }

    /// Download the asset and replace `output` with it in one step.
    pub fn fetch(&self, url: &str, output: &Path, mut on_event: impl FnMut(JobEvent<'_>)) -> Result<usize> {
        on_event(JobEvent::Downloading { url });
        let bytes = self.api.download(url)?;
        write_atomic(output, &bytes)?;
        on_event(JobEvent::Saved { path: output, bytes: bytes.len() });
        Ok(bytes.len())
    }
}
