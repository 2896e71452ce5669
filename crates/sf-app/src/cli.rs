use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use sf_remote::PromptPreset;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "snapforge", version, about = "Capture an object, inspect it with a vision model, and turn it into a 3D asset")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Capture, analyse, then generate a 3D asset (default)
    Scan {
        /// Stop after the vision analysis
        #[arg(long)]
        skip_3d: bool,

        #[arg(long, default_value = "detailed")]
        prompt: PromptPreset,
    },
    /// Capture and analyse only
    Inspect {
        #[arg(long, default_value = "detailed")]
        prompt: PromptPreset,
    },
    /// Poll an already submitted generation job and download its asset
    Resume { job_id: String },
}

impl Default for Command {
    fn default() -> Self {
        Self::Scan {
            skip_3d: false,
            prompt: PromptPreset::default(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Directory for the captured image and generated asset
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Seconds between job status checks
    #[arg(long, global = true)]
    pub poll_interval: Option<u64>,

    /// Give up after this many status checks
    #[arg(long, global = true)]
    pub max_polls: Option<u32>,

    /// Give up after this many seconds of polling
    #[arg(long, global = true)]
    pub poll_timeout: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(secs) = self.poll_interval {
            config.poll.interval = Duration::from_secs(secs);
        }
        if let Some(max) = self.max_polls {
            config.poll.max_attempts = Some(max);
        }
        if let Some(secs) = self.poll_timeout {
            config.poll.deadline = Some(Duration::from_secs(secs));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_full_scan() {
        let cli = Cli::try_parse_from(["snapforge"]).unwrap();
        assert_eq!(cli.command.unwrap_or_default(), Command::default());
    }

    #[test]
    fn test_inspect_with_prompt() {
        let cli = Cli::try_parse_from(["snapforge", "inspect", "--prompt", "broken-check"]).unwrap();
        assert_eq!(cli.command, Some(Command::Inspect { prompt: PromptPreset::BrokenCheck }));
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "snapforge",
            "resume",
            "job-7",
            "--output-dir",
            "/tmp/out",
            "--max-polls",
            "10",
            "--poll-interval",
            "2",
        ])
        .unwrap();

        let mut config = AppConfig::from_lookup(|_| None, Some(PathBuf::from("/home/pi"))).unwrap();
        cli.overrides.apply(&mut config);

        assert_eq!(cli.command, Some(Command::Resume { job_id: "job-7".into() }));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.poll.max_attempts, Some(10));
        assert_eq!(config.poll.interval, Duration::from_secs(2));
        assert_eq!(config.poll.deadline, None);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
