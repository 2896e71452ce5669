mod capture;
mod cli;
mod config;
mod console;
mod error;
mod pipeline;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::info;
use sf_core::Credentials;
use sf_remote::{JobRunner, TrellisClient, VisionClient};
use tracing_subscriber::EnvFilter;

use crate::capture::CommandCapture;
use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::pipeline::{AssetGenerator, Pipeline, RunPlan, VisionStage};

const INSPECT_CAPTURE: &str = "capture.jpg";
const SCAN_CAPTURE: &str = "capture_for_3d.jpg";
const ASSET_STEM: &str = "trellis_output";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<sf_core::Error>() {
            Some(err) if err.is_job_failure() => {
                console::failure(format!("TRELLIS {err}. No asset was produced."));
                ExitCode::from(2)
            }
            Some(err @ sf_core::Error::MissingCredential(_)) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
            _ => {
                console::failure(format!("{e:#}"));
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    cli.overrides.apply(&mut config);

    // Both keys must be present before any camera or network activity.
    let credentials = Credentials::from_env()?;

    console::banner("SNAPFORGE INSPECTION CONSOLE");

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;

    let http = sf_remote::build_client(config.http_timeout)?;
    let runner = JobRunner::new(
        TrellisClient::with_client(http.clone(), &config.generation_endpoint, &credentials.generation_key),
        config.poll.clone(),
    );
    let asset_path = config
        .output_dir
        .join(format!("{ASSET_STEM}.{}", runner.format().extension()));

    let command = cli.command.unwrap_or_default();
    info!("Running {:?} with output in {}", command, config.output_dir.display());

    let (prompt, capture_name, generate) = match command {
        Command::Resume { job_id } => {
            console::step(format!("Resuming TRELLIS job {job_id}"));
            let asset = runner.resume(&job_id, &asset_path, console::job_event)?;
            console::asset_summary(&asset);
            return Ok(());
        }
        Command::Scan { skip_3d, prompt } => (prompt, SCAN_CAPTURE, !skip_3d),
        Command::Inspect { prompt } => (prompt, INSPECT_CAPTURE, false),
    };

    let camera = CommandCapture::new(config.capture.clone());
    let vision = VisionStage {
        client: VisionClient::with_client(http, &config.vision_endpoint, &credentials.vision_key),
        prompt,
    };

    let pipeline = Pipeline {
        source: &camera,
        analyzer: &vision,
        generator: generate.then_some(&runner as &dyn AssetGenerator),
    };
    let plan = RunPlan {
        capture_path: config.output_dir.join(capture_name),
        asset_path: generate.then(|| asset_path.clone()),
    };

    let report = pipeline.run(&plan)?;
    info!(
        "Analysed {} ({})",
        report.image.display(),
        if report.answer.is_degraded() { "raw response" } else { "answer text" }
    );
    if let Some(asset) = &report.asset {
        info!("Asset for job {} written to {}", asset.job_id, asset.path.display());
    }

    Ok(())
}
