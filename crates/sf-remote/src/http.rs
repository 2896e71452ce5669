use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use sf_core::{Error, Result};

const USER_AGENT: &str = concat!("snapforge/", env!("CARGO_PKG_VERSION"));

/// Shared blocking client. `None` keeps reqwest's default timeout.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Turn a non-2xx response into [`Error::HttpStatus`], keeping the body
/// for diagnostics.
pub(crate) fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = redact_query(response.url());
    let body = response.text().unwrap_or_default();
    Err(Error::HttpStatus {
        url,
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn redact_query(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// MIME type for an image file, guessed from its extension. Camera output
/// has no extension guarantee, so anything unknown is sent as JPEG.
pub(crate) fn image_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(image_mime_type(Path::new("capture.jpg")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("shot.PNG")), "image/png");
        assert_eq!(image_mime_type(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_redact_query_drops_key() {
        let url = reqwest::Url::parse("https://vision.example/generate?key=secret").unwrap();
        assert_eq!(redact_query(&url), "https://vision.example/generate");
    }
}
