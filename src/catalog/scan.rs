use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::config::ScanSettings;
use crate::natural::natural_path_cmp;

use super::model::CatalogEntry;

/// Errors that make a scan impossible; per-entry walk errors are logged
/// and skipped instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let exts: Vec<String> = extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn matches_name(path: &Path, names: &[String]) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| {
            let name = name.to_lowercase();
            names.iter().any(|n| n.to_lowercase() == name)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `root` per the scan settings and keep files accepted by `keep`.
/// The result is sorted by natural order of the root-relative path; that
/// order is the scan order every downstream stage relies on.
fn walk(
    root: &Path,
    settings: &ScanSettings,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<CatalogEntry>, ScanError> {
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut entries: Vec<CatalogEntry> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && (settings.include_hidden || !is_hidden(path)) && keep(path) {
            let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            entries.push(CatalogEntry {
                path: path.to_path_buf(),
                relative,
            });
        }
    }

    entries.sort_by(|a, b| natural_path_cmp(&a.relative, &b.relative));
    Ok(entries)
}

/// Scan `root` for files whose extension is in the allow-list.
pub fn scan(root: &Path, settings: &ScanSettings) -> Result<Vec<CatalogEntry>, ScanError> {
    walk(root, settings, |path| {
        matches_extension(path, &settings.extensions)
    })
}

/// Scan `root` for files whose whole name (lowercase) is in `names`.
/// Same scope rules as [`scan`]; used for sidecar cover-art lookup.
pub fn scan_named(
    root: &Path,
    settings: &ScanSettings,
    names: &[String],
) -> Result<Vec<CatalogEntry>, ScanError> {
    walk(root, settings, |path| matches_name(path, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn settings() -> ScanSettings {
        ScanSettings {
            recursive: true,
            ..ScanSettings::default()
        }
    }

    #[test]
    fn matches_extension_is_case_insensitive_and_dot_tolerant() {
        let exts = vec!["mp3".to_string(), ".M4B".to_string()];
        assert!(matches_extension(Path::new("/tmp/a.mp3"), &exts));
        assert!(matches_extension(Path::new("/tmp/a.MP3"), &exts));
        assert!(matches_extension(Path::new("/tmp/a.m4b"), &exts));
        assert!(!matches_extension(Path::new("/tmp/a.flac"), &exts));
        assert!(!matches_extension(Path::new("/tmp/a"), &exts));
    }

    #[test]
    fn scan_filters_by_extension_and_sorts_naturally() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("part10.mp3"), b"x").unwrap();
        fs::write(dir.path().join("part2.mp3"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let entries = scan(dir.path(), &settings()).unwrap();
        let names: Vec<_> = entries
            .iter()
            .map(|e| e.relative.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["part2.mp3", "part10.mp3"]);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"x").unwrap();

        let entries = scan(
            dir.path(),
            &ScanSettings {
                recursive: false,
                ..ScanSettings::default()
            },
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].relative, Path::new("root.mp3"));
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"x").unwrap();

        let entries = scan(
            dir.path(),
            &ScanSettings {
                include_hidden: false,
                ..settings()
            },
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].relative, Path::new("visible.mp3"));
    }

    #[test]
    fn scan_keeps_relative_paths_under_root() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("disc 1");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("01.mp3"), b"x").unwrap();

        let entries = scan(dir.path(), &settings()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].relative, Path::new("disc 1").join("01.mp3"));
        assert!(entries[0].path.is_absolute() || entries[0].path.starts_with(dir.path()));
    }

    #[test]
    fn scan_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan(&missing, &settings()),
            Err(ScanError::PathNotFound(_))
        ));
    }

    #[test]
    fn scan_named_matches_whole_name_case_insensitively() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Cover.JPG"), b"x").unwrap();
        fs::write(dir.path().join("cover-art.jpg"), b"x").unwrap();

        let names = vec!["cover.jpg".to_string()];
        let entries = scan_named(dir.path(), &settings(), &names).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].relative, Path::new("Cover.JPG"));
    }

    #[test]
    fn stem_strips_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("01 - Intro.mp3"), b"x").unwrap();
        let entries = scan(dir.path(), &settings()).unwrap();
        assert_eq!(entries[0].stem(), "01 - Intro");
    }
}
