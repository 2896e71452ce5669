use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write `bytes` to `target` in one step: the buffer goes to a temp file
/// next to the target which is then renamed over it. Readers see either the
/// old file or the complete new one.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let persist_err = |source: std::io::Error| Error::Persist {
        path: target.to_path_buf(),
        source,
    };

    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(parent).map_err(persist_err)?;
    temp.write_all(bytes).map_err(persist_err)?;
    temp.as_file().sync_all().map_err(persist_err)?;
    temp.persist(target).map_err(|e| persist_err(e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), target.display());
    Ok(())
}
