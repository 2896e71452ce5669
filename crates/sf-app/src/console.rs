//! Human-facing progress output on stdout. Diagnostics go through `log`.

use std::path::Path;

use sf_core::inspection::InspectionReport;
use sf_remote::{GeneratedAsset, JobEvent, VisionAnswer};

const BANNER_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 60;

pub fn banner(title: &str) {
    println!("\n{}", "*".repeat(BANNER_WIDTH));
    println!("{:^width$}", title, width = BANNER_WIDTH);
    println!("{}\n", "*".repeat(BANNER_WIDTH));
}

pub fn step(message: impl std::fmt::Display) {
    println!("[+] {message}");
}

pub fn failure(message: impl std::fmt::Display) {
    eprintln!("[!] {message}");
}

pub fn analysis(answer: &VisionAnswer, image: &Path) {
    println!("\n{}", "=".repeat(SECTION_WIDTH));
    println!("GEMINI ANALYSIS RESULT");
    println!("{}", "=".repeat(SECTION_WIDTH));

    match answer {
        VisionAnswer::Text(text) => {
            println!("{text}");
            if let Some(verdict) = InspectionReport::parse(text).verdict {
                println!("\nVerdict: {verdict}");
            }
        }
        VisionAnswer::Raw(_) => {
            println!("(no answer text in response, showing raw response)");
            println!("{answer}");
        }
    }

    println!("\nSaved image at: {}", image.display());
    println!("{}", "=".repeat(SECTION_WIDTH));
}

pub fn job_event(event: JobEvent<'_>) {
    match event {
        JobEvent::Submitted { job_id } => step(format!("TRELLIS Job ID: {job_id}")),
        JobEvent::Polled { status, .. } => println!("[TRELLIS Status] {} {}", status.icon(), status),
        JobEvent::TransientError { attempt, error, .. } => {
            println!("[TRELLIS Status] check {attempt} failed, retrying: {error}")
        }
        JobEvent::Downloading { .. } => step("Downloading 3D asset..."),
        JobEvent::Saved { path, bytes } => step(format!("3D asset saved to: {} ({bytes} bytes)", path.display())),
    }
}

pub fn asset_summary(asset: &GeneratedAsset) {
    let took = asset.finished_at - asset.started_at;
    println!(
        "\nJob {} finished after {} status checks in {}s: {} ({}, {} bytes)",
        asset.job_id,
        asset.polls,
        took.num_seconds(),
        asset.path.display(),
        asset.format.name(),
        asset.bytes
    );
}
