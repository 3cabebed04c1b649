use serde::Deserialize;

use crate::chapter::ChapterMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/legato/config.toml` or `~/.config/legato/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags
/// 2) Environment variables (prefix `LEGATO__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanSettings,
    pub cover: CoverSettings,
    pub chapters: ChapterSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scan: ScanSettings::default(),
            cover: CoverSettings::default(),
            chapters: ChapterSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// File extensions to treat as audiobook parts (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "aac".into(),
                "flac".into(),
                "m4a".into(),
                "m4b".into(),
                "mp3".into(),
                "ogg".into(),
                "wav".into(),
            ],
            recursive: false,
            follow_links: true,
            include_hidden: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoverSettings {
    /// Sidecar image filenames that count as curated cover art
    /// (case-insensitive, matched against the whole file name).
    pub image_names: Vec<String>,
    /// Extension of the audiobook container format. Files with this
    /// extension are searched first for embedded art because they most
    /// likely carry finalized artwork from a prior encode.
    pub container_extension: String,
}

impl Default for CoverSettings {
    fn default() -> Self {
        Self {
            image_names: vec![
                "artwork.jpg".into(),
                "artwork.png".into(),
                "cover.jpeg".into(),
                "cover.jpg".into(),
                "cover.png".into(),
                "folder.jpg".into(),
                "folder.png".into(),
                "front.jpg".into(),
                "front.png".into(),
            ],
            container_extension: "m4b".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChapterSettings {
    /// Default chapter mode when none is given on the command line.
    pub mode: ChapterMode,
}

impl Default for ChapterSettings {
    fn default() -> Self {
        Self {
            mode: ChapterMode::Dir,
        }
    }
}

/// Split a comma-separated allow-list into normalized entries:
/// trimmed, lowercased, leading dots stripped, empties dropped.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}
