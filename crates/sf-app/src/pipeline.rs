//! Strictly sequential workflow: capture, analyse, then optionally
//! generate a 3D asset from the same image. A failed stage stops the run.

use std::path::{Path, PathBuf};

use sf_core::Result;
use sf_core::poll::Sleeper;
use sf_remote::{GeneratedAsset, JobApi, JobRunner, PromptPreset, VisionAnswer, VisionClient};
use tracing::info_span;

use crate::capture::ImageSource;
use crate::console;

pub trait Analyzer {
    fn analyze(&self, image: &Path) -> Result<VisionAnswer>;
}

pub trait AssetGenerator {
    fn generate(&self, image: &Path, output: &Path) -> Result<GeneratedAsset>;
}

/// Vision client paired with the prompt to send.
pub struct VisionStage {
    pub client: VisionClient,
    pub prompt: PromptPreset,
}

impl Analyzer for VisionStage {
    fn analyze(&self, image: &Path) -> Result<VisionAnswer> {
        self.client.analyze(image, self.prompt.text())
    }
}

impl<A: JobApi, S: Sleeper> AssetGenerator for JobRunner<A, S> {
    fn generate(&self, image: &Path, output: &Path) -> Result<GeneratedAsset> {
        self.run(image, output, console::job_event)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub capture_path: PathBuf,
    /// Where to save the 3D asset; `None` skips generation
    pub asset_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunReport {
    pub image: PathBuf,
    pub answer: VisionAnswer,
    pub asset: Option<GeneratedAsset>,
}

pub struct Pipeline<'a> {
    pub source: &'a dyn ImageSource,
    pub analyzer: &'a dyn Analyzer,
    pub generator: Option<&'a dyn AssetGenerator>,
}

impl Pipeline<'_> {
    pub fn run(&self, plan: &RunPlan) -> Result<RunReport> {
        let image = {
            let _span = info_span!("capture").entered();
            console::step("Capturing image...");
            let image = self.source.capture(&plan.capture_path)?;
            console::step(format!("Image saved: {}", image.display()));
            image
        };

        let answer = {
            let _span = info_span!("analyze").entered();
            console::step("Sending image to Google Gemini...");
            let answer = self.analyzer.analyze(&image)?;
            console::analysis(&answer, &image);
            answer
        };

        let asset = match (&plan.asset_path, self.generator) {
            (Some(output), Some(generator)) => {
                let _span = info_span!("generate").entered();
                console::step("Uploading to NVIDIA TRELLIS...");
                let asset = generator.generate(&image, output)?;
                console::asset_summary(&asset);
                Some(asset)
            }
            _ => None,
        };

        Ok(RunReport { image, answer, asset })
    }
}
