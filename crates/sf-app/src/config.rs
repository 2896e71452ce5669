use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sf_core::poll::PollStrategy;
use sf_remote::generation::DEFAULT_GENERATION_ENDPOINT;
use sf_remote::vision::DEFAULT_VISION_ENDPOINT;

use crate::error::AppError;

pub const DEFAULT_CAPTURE_COMMAND: &str = "rpicam-still";
pub const DEFAULT_CAPTURE_WIDTH: u32 = 1920;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub program: String,
    /// Arguments placed before the fixed size and output flags
    pub extra_args: Vec<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_CAPTURE_COMMAND.to_string(),
            extra_args: Vec::new(),
            width: DEFAULT_CAPTURE_WIDTH,
            height: DEFAULT_CAPTURE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub vision_endpoint: String,
    pub generation_endpoint: String,
    pub capture: CaptureConfig,
    pub poll: PollStrategy,
    /// `None` keeps the HTTP client's default
    pub http_timeout: Option<Duration>,
}

impl AppConfig {
    /// Load settings from the environment, after reading `.env` if present.
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }

        Self::from_lookup(|name| std::env::var(name).ok(), dirs::home_dir())
    }

    pub fn from_lookup<F>(lookup: F, home: Option<PathBuf>) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let output_dir = match get("SNAPFORGE_OUTPUT_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => home.ok_or(AppError::NoHomeDir)?.join("Downloads"),
        };

        let mut capture = CaptureConfig::default();
        if let Some(command) = get("SNAPFORGE_CAPTURE_COMMAND") {
            // Blank values were filtered out above, so there is always a first word.
            let mut words = command.split_whitespace().map(str::to_string);
            if let Some(program) = words.next() {
                capture.program = program;
                capture.extra_args = words.collect();
            }
        }
        if let Some(width) = parse_setting::<u32>(&get, "SNAPFORGE_CAPTURE_WIDTH")? {
            capture.width = width;
        }
        if let Some(height) = parse_setting::<u32>(&get, "SNAPFORGE_CAPTURE_HEIGHT")? {
            capture.height = height;
        }

        let mut poll = PollStrategy::default();
        if let Some(secs) = parse_setting::<u64>(&get, "SNAPFORGE_POLL_INTERVAL_SECS")? {
            poll.interval = Duration::from_secs(secs);
        }
        poll.max_attempts = parse_setting::<u32>(&get, "SNAPFORGE_MAX_POLLS")?;
        poll.deadline = parse_setting::<u64>(&get, "SNAPFORGE_POLL_TIMEOUT_SECS")?.map(Duration::from_secs);
        if let Some(retries) = parse_setting::<u32>(&get, "SNAPFORGE_TRANSIENT_RETRIES")? {
            poll.transient_retries = retries;
        }

        Ok(Self {
            output_dir,
            vision_endpoint: get("SNAPFORGE_VISION_ENDPOINT").unwrap_or_else(|| DEFAULT_VISION_ENDPOINT.to_string()),
            generation_endpoint: get("SNAPFORGE_GENERATION_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GENERATION_ENDPOINT.to_string()),
            capture,
            poll,
            http_timeout: parse_setting::<u64>(&get, "SNAPFORGE_HTTP_TIMEOUT_SECS")?.map(Duration::from_secs),
        })
    }
}

fn parse_setting<T>(get: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(var)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| AppError::InvalidSetting {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned(), Some(PathBuf::from("/home/pi")))
    }

    #[test]
    fn test_defaults_follow_reference_setup() {
        let config = load(&[]).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/home/pi/Downloads"));
        assert_eq!(config.vision_endpoint, DEFAULT_VISION_ENDPOINT);
        assert_eq!(config.generation_endpoint, DEFAULT_GENERATION_ENDPOINT);
        assert_eq!(config.capture, CaptureConfig::default());
        assert_eq!(config.poll, PollStrategy::default());
        assert_eq!(config.http_timeout, None);
    }

    #[test]
    fn test_env_overrides() {
        let config = load(&[
            ("SNAPFORGE_OUTPUT_DIR", "/tmp/out"),
            ("SNAPFORGE_CAPTURE_COMMAND", "libcamera-still --nopreview"),
            ("SNAPFORGE_CAPTURE_WIDTH", "640"),
            ("SNAPFORGE_POLL_INTERVAL_SECS", "1"),
            ("SNAPFORGE_MAX_POLLS", "30"),
            ("SNAPFORGE_POLL_TIMEOUT_SECS", "600"),
            ("SNAPFORGE_TRANSIENT_RETRIES", "2"),
            ("SNAPFORGE_HTTP_TIMEOUT_SECS", "20"),
        ])
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.capture.program, "libcamera-still");
        assert_eq!(config.capture.extra_args, vec!["--nopreview"]);
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.capture.height, DEFAULT_CAPTURE_HEIGHT);
        assert_eq!(config.poll.interval, Duration::from_secs(1));
        assert_eq!(config.poll.max_attempts, Some(30));
        assert_eq!(config.poll.deadline, Some(Duration::from_secs(600)));
        assert_eq!(config.poll.transient_retries, 2);
        assert_eq!(config.http_timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = load(&[("SNAPFORGE_MAX_POLLS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("SNAPFORGE_MAX_POLLS"));
    }

    #[test]
    fn test_missing_home_without_override() {
        let err = AppConfig::from_lookup(|_| None, None).unwrap_err();
        assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::NoHomeDir)));
    }
}
