pub mod error;
pub mod credentials;
pub mod inspection;
pub mod job;
pub mod persist;
pub mod poll;
mod asset_format;

pub use asset_format::AssetFormat;
pub use credentials::{Credentials, Secret};
pub use error::{Error, Result};
