//! Metadata and cover-art source selection.

use std::path::{Path, PathBuf};

use crate::catalog::{self, ScanError};
use crate::config::{CoverSettings, ScanSettings};
use crate::natural::natural_path_cmp;
use crate::order::OrderedEntry;

/// Where the merged output's cover art should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    /// Standalone image file next to the audio; authoritative curator
    /// intent, always preferred over embedded art.
    Sidecar(PathBuf),
    /// Audio file carrying an embedded picture in its tags.
    Embedded(PathBuf),
}

/// Pick the entry whose tags are most complete as the metadata source for
/// the merged output.
///
/// Score = number of present {title, album, artist, album artist}. The
/// strict maximum wins; on ties the earliest entry in play order does.
/// A best score of zero means there is no usable source and the caller
/// must ask the operator for metadata.
pub fn select_metadata_source(ordered: &[OrderedEntry]) -> Option<&OrderedEntry> {
    let mut best: Option<(&OrderedEntry, usize)> = None;
    for entry in ordered {
        let score = entry.record.tag_score();
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((entry, score));
        }
    }
    best.filter(|(_, score)| *score > 0).map(|(entry, _)| entry)
}

/// Find the naturally-earliest sidecar image under `root`, if any.
pub fn find_sidecar(
    root: &Path,
    scan: &ScanSettings,
    cover: &CoverSettings,
) -> Result<Option<PathBuf>, ScanError> {
    let matches = catalog::scan_named(root, scan, &cover.image_names)?;
    Ok(matches.into_iter().next().map(|entry| entry.path))
}

/// Find the best embedded-art carrier in the play set: files with the
/// audiobook-container extension first, natural order within each group.
pub fn select_embedded(ordered: &[OrderedEntry], cover: &CoverSettings) -> Option<PathBuf> {
    let container = cover
        .container_extension
        .trim_start_matches('.')
        .to_ascii_lowercase();
    let rank = |o: &OrderedEntry| u8::from(!has_extension(&o.entry.path, &container));

    ordered
        .iter()
        .filter(|o| o.record.has_cover)
        .min_by(|a, b| {
            rank(a)
                .cmp(&rank(b))
                .then_with(|| natural_path_cmp(&a.entry.relative, &b.entry.relative))
        })
        .map(|o| o.entry.path.clone())
}

/// Choose the cover-art source: a sidecar image wins outright regardless
/// of play order; embedded art is only a fallback.
pub fn select_cover_source(
    root: &Path,
    scan: &ScanSettings,
    cover: &CoverSettings,
    ordered: &[OrderedEntry],
) -> Result<Option<CoverSource>, ScanError> {
    if let Some(sidecar) = find_sidecar(root, scan, cover)? {
        return Ok(Some(CoverSource::Sidecar(sidecar)));
    }
    Ok(select_embedded(ordered, cover).map(CoverSource::Embedded))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
