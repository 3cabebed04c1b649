//! Cover-art materialization.
//!
//! Turns a selected [`CoverSource`] into an image file on disk and,
//! optionally, hands it to AtomicParsley for embedding into a finished
//! container. Embedding stays a narrow subprocess boundary; legato never
//! rewrites tags itself.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::error::Error;
use crate::probe;
use crate::select::CoverSource;

/// Write the selected cover art to `output`.
///
/// Sidecar sources are byte-copied; embedded sources are read through the
/// tag backend and the first picture's bytes are written out.
pub fn extract(source: &CoverSource, output: &Path) -> Result<(), Error> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match source {
        CoverSource::Sidecar(path) => {
            if path != output {
                fs::copy(path, output)?;
            }
        }
        CoverSource::Embedded(path) => {
            let data = probe::first_picture(path)?.ok_or(Error::NoCoverArt)?;
            fs::write(output, data)?;
        }
    }
    Ok(())
}

/// Embed `cover` into `target` with AtomicParsley.
///
/// The target must already exist; AtomicParsley must be on PATH. Failures
/// carry the tool's stderr so the operator sees what went wrong.
pub fn embed(cover: &Path, target: &Path) -> Result<(), Error> {
    if !target.exists() {
        return Err(Error::Config(format!(
            "embed target not found: {}",
            target.display()
        )));
    }

    let program = which::which("AtomicParsley")
        .map_err(|_| Error::Tool("AtomicParsley not found on PATH".to_string()))?;

    let output = Command::new(program)
        .arg(target)
        .arg("--artwork")
        .arg(cover)
        .arg("--overWrite")
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Tool(format!(
            "AtomicParsley failed: {}",
            stderr.trim()
        )));
    }

    tracing::info!(target = %target.display(), "embedded cover art");
    Ok(())
}
