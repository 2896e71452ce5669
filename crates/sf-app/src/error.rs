use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Could not determine the home directory; set SNAPFORGE_OUTPUT_DIR or pass --output-dir")]
    NoHomeDir,

    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidSetting {
        var: &'static str,
        value: String,
        reason: String,
    },
}
