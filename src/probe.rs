//! Metadata probing across two interchangeable backends.
//!
//! The rich backend reads tags in-process; the generic one shells out to
//! `ffprobe` when it is installed. Callers only see [`Prober`]: it prefers
//! the rich backend and falls back per file, so a single unreadable format
//! never degrades the whole run.

mod ffprobe;
mod tags;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::catalog::CatalogEntry;

pub(crate) use tags::first_picture;

/// Everything a probe backend can report about one file.
///
/// Every field is optional; a file with no record at all behaves exactly
/// like a record with all fields absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRecord {
    pub track: Option<u32>,
    pub disc: Option<u32>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub duration: Option<Duration>,
    pub has_cover: bool,
}

impl MetadataRecord {
    /// How many of the mergeable text tags are present (0-4). The entry
    /// with the highest score becomes the metadata source for the merge.
    pub fn tag_score(&self) -> usize {
        [&self.title, &self.album, &self.artist, &self.album_artist]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("tag read failed: {0}")]
    Tags(#[from] lofty::error::LoftyError),

    #[error("ffprobe failed for {path}: {reason}")]
    Ffprobe { path: PathBuf, reason: String },
}

/// Parse the leading integer run out of a free-form index field.
/// Composite forms like "3/12" yield 3; non-digit content is ignored.
pub(crate) fn parse_index(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Two-backend prober. The in-process tag reader always exists; the
/// `ffprobe` fallback is detected once at startup.
pub struct Prober {
    ffprobe: Option<ffprobe::FfprobeBackend>,
}

impl Prober {
    pub fn detect() -> Self {
        let ffprobe = ffprobe::FfprobeBackend::detect();
        if ffprobe.is_none() {
            tracing::debug!("ffprobe not found on PATH; tag reader is the only backend");
        }
        Self { ffprobe }
    }

    /// Probe a single file, falling back to `ffprobe` when the tag reader
    /// cannot open it.
    pub fn probe_one(&self, path: &Path) -> Result<MetadataRecord, ProbeError> {
        match tags::read(path) {
            Ok(record) => Ok(record),
            Err(err) => match &self.ffprobe {
                Some(backend) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %err,
                        "tag reader failed; trying ffprobe"
                    );
                    backend.probe(path)
                }
                None => Err(err),
            },
        }
    }

    /// Probe every catalog entry. Per-file failures become warnings and
    /// absent records, never aborts; results are keyed by absolute path so
    /// probe completion order cannot matter.
    pub fn probe_all(
        &self,
        catalog: &[CatalogEntry],
    ) -> (HashMap<PathBuf, MetadataRecord>, Vec<String>) {
        let mut records = HashMap::new();
        let mut warnings = Vec::new();
        for entry in catalog {
            match self.probe_one(&entry.path) {
                Ok(record) => {
                    records.insert(entry.path.clone(), record);
                }
                Err(err) => {
                    warnings.push(format!(
                        "could not probe {}: {}",
                        entry.relative.display(),
                        err
                    ));
                }
            }
        }
        (records, warnings)
    }
}
