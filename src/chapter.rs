//! Chapter-boundary computation over the final play order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

use crate::order::OrderedEntry;

/// How chapter boundaries are derived from the play order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ChapterMode {
    /// One chapter per run of adjacent files in the same directory.
    #[serde(alias = "directory", alias = "per-dir", alias = "per-directory")]
    Dir,
    /// One chapter per input file.
    #[serde(alias = "per-file")]
    File,
    /// No chapters at all.
    None,
}

/// One named time range of the merged output, in milliseconds.
///
/// The chapters of a run partition `[0, total)`: each chapter ends where
/// the next one starts and the first starts at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub start_ms: u64,
    pub end_ms: u64,
    pub title: String,
}

#[derive(Debug, Error)]
pub enum ChapterError {
    /// Without a probed duration for every file, chapter timing is
    /// impossible; this surfaces as a probe-backend failure to the user.
    #[error("no duration available for {0}; cannot compute chapter timing")]
    MissingDuration(PathBuf),
}

fn duration_ms(duration: Duration) -> u64 {
    (duration.as_secs_f64() * 1000.0).round() as u64
}

/// Title for a per-directory chapter: the entry's directory relative to
/// the scan root, always with forward slashes. Files directly under the
/// root use the root's own name, or "Root" when it has none.
fn directory_title(entry: &OrderedEntry, root: &Path) -> String {
    let parent = entry.entry.relative.parent().unwrap_or(Path::new(""));
    if parent.as_os_str().is_empty() {
        root.file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "Root".to_string())
    } else {
        parent
            .iter()
            .map(|c| c.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Compute chapters for the ordered play list.
///
/// `Dir` mode groups by order-adjacency, not by a global group-by: when
/// the same directory reappears later in the play order it starts a new
/// chapter. Audiobooks split into disc/part directories rely on this.
pub fn build_chapters(
    ordered: &[OrderedEntry],
    mode: ChapterMode,
    root: &Path,
) -> Result<Vec<Chapter>, ChapterError> {
    if mode == ChapterMode::None || ordered.is_empty() {
        return Ok(Vec::new());
    }

    let durations = ordered
        .iter()
        .map(|o| {
            o.record
                .duration
                .map(duration_ms)
                .ok_or_else(|| ChapterError::MissingDuration(o.entry.path.clone()))
        })
        .collect::<Result<Vec<u64>, ChapterError>>()?;

    match mode {
        ChapterMode::File => Ok(per_file(ordered, &durations)),
        ChapterMode::Dir => Ok(per_directory(ordered, &durations, root)),
        ChapterMode::None => unreachable!(),
    }
}

fn per_file(ordered: &[OrderedEntry], durations: &[u64]) -> Vec<Chapter> {
    let mut chapters = Vec::with_capacity(ordered.len());
    let mut cursor = 0u64;
    for (o, duration) in ordered.iter().zip(durations) {
        chapters.push(Chapter {
            start_ms: cursor,
            end_ms: cursor + duration,
            title: o.entry.stem(),
        });
        cursor += duration;
    }
    chapters
}

fn per_directory(ordered: &[OrderedEntry], durations: &[u64], root: &Path) -> Vec<Chapter> {
    let mut starts: Vec<u64> = Vec::new();
    let mut titles: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut cursor = 0u64;

    for (o, duration) in ordered.iter().zip(durations) {
        let title = directory_title(o, root);
        if current.as_deref() != Some(title.as_str()) {
            starts.push(cursor);
            titles.push(title.clone());
            current = Some(title);
        }
        cursor += duration;
    }

    let total = cursor;
    titles
        .into_iter()
        .enumerate()
        .map(|(i, title)| Chapter {
            start_ms: starts[i],
            end_ms: starts.get(i + 1).copied().unwrap_or(total),
            title,
        })
        .collect()
}
