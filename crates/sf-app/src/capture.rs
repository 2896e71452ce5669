use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use sf_core::{Error, Result};

use crate::config::CaptureConfig;

/// Produces a still image at a given path.
pub trait ImageSource {
    fn capture(&self, output: &Path) -> Result<PathBuf>;
}

/// Runs an external still-capture program such as `rpicam-still`.
#[derive(Debug, Clone)]
pub struct CommandCapture {
    config: CaptureConfig,
}

impl CommandCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    fn args(&self, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.config.extra_args.iter().map(OsString::from).collect();
        args.extend([
            "--width".into(),
            self.config.width.to_string().into(),
            "--height".into(),
            self.config.height.to_string().into(),
            "-o".into(),
            output.as_os_str().to_os_string(),
        ]);
        args
    }

    fn describe(&self) -> String {
        std::iter::once(self.config.program.as_str())
            .chain(self.config.extra_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn capture_error(&self, reason: String) -> Error {
        Error::Capture {
            command: self.describe(),
            reason,
        }
    }
}

impl ImageSource for CommandCapture {
    fn capture(&self, output: &Path) -> Result<PathBuf> {
        // A leftover image from an earlier run must not pass for this one.
        match std::fs::remove_file(output) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        info!(
            "Capturing {}x{} image to {} with {}",
            self.config.width,
            self.config.height,
            output.display(),
            self.config.program
        );

        let status = Command::new(&self.config.program)
            .args(self.args(output))
            .status()
            .map_err(|e| self.capture_error(format!("could not start: {e}")))?;

        if !status.success() {
            let reason = match status.code() {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".to_string(),
            };
            return Err(self.capture_error(reason));
        }

        let (width, height) = image::image_dimensions(output).map_err(|e| {
            self.capture_error(format!("no readable image at {}: {e}", output.display()))
        })?;
        debug!("Captured image is {}x{}", width, height);

        Ok(output.to_path_buf())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// `sh -c <script> sh --width W --height H -o PATH` puts the output path in `$6`.
    fn shell(script: &str) -> CommandCapture {
        CommandCapture::new(CaptureConfig {
            program: "sh".into(),
            extra_args: vec!["-c".into(), script.into(), "sh".into()],
            width: 8,
            height: 6,
        })
    }

    fn fixture(dir: &TempDir, name: &str, width: u32) -> PathBuf {
        let path = dir.path().join(name);
        image::RgbImage::new(width, 6).save(&path).unwrap();
        path
    }

    #[test]
    fn test_fixed_arguments() {
        let capture = CommandCapture::new(CaptureConfig::default());
        let args = capture.args(Path::new("/home/pi/Downloads/capture.jpg"));

        assert_eq!(
            args,
            ["--width", "1920", "--height", "1080", "-o", "/home/pi/Downloads/capture.jpg"]
                .map(OsString::from)
                .to_vec()
        );
        assert_eq!(capture.describe(), "rpicam-still");
    }

    #[test]
    fn test_successful_capture_returns_path() {
        let dir = TempDir::new().unwrap();
        let source = fixture(&dir, "source.jpg", 8);
        let output = dir.path().join("capture.jpg");

        let capture = shell(&format!("cp '{}' \"$6\"", source.display()));
        let path = capture.capture(&output).unwrap();

        assert_eq!(path, output);
        assert_eq!(image::image_dimensions(&output).unwrap(), (8, 6));
    }

    #[test]
    fn test_second_capture_overwrites_first() {
        let dir = TempDir::new().unwrap();
        let first = fixture(&dir, "first.jpg", 8);
        let second = fixture(&dir, "second.jpg", 16);
        let output = dir.path().join("capture.jpg");

        shell(&format!("cp '{}' \"$6\"", first.display())).capture(&output).unwrap();
        shell(&format!("cp '{}' \"$6\"", second.display())).capture(&output).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (16, 6));
    }

    #[test]
    fn test_nonzero_exit_is_fatal() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("capture.jpg");

        match shell("exit 3").capture(&output) {
            Err(Error::Capture { reason, .. }) => assert_eq!(reason, "exited with status 3"),
            other => panic!("expected capture error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_capture_error() {
        let dir = TempDir::new().unwrap();
        let capture = CommandCapture::new(CaptureConfig {
            program: "snapforge-no-such-camera-tool".into(),
            ..CaptureConfig::default()
        });

        let err = capture.capture(&dir.path().join("capture.jpg")).unwrap_err();
        assert!(matches!(err, Error::Capture { .. }));
    }

    #[test]
    fn test_stale_image_not_trusted() {
        let dir = TempDir::new().unwrap();
        let output = fixture(&dir, "capture.jpg", 8);

        let err = shell("exit 0").capture(&output).unwrap_err();
        assert!(matches!(err, Error::Capture { .. }));
        assert!(!output.exists());
    }
}
