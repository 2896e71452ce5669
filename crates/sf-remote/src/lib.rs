pub mod generation;
pub mod prompts;
pub mod vision;
mod http;

pub use generation::{GeneratedAsset, JobApi, JobEvent, JobRunner, TrellisClient};
pub use http::build_client;
pub use prompts::PromptPreset;
pub use vision::{VisionAnswer, VisionClient};
