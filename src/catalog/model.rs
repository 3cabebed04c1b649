use std::path::PathBuf;

/// One scanned file.
///
/// Identity is the absolute `path`. `relative` is the path under the scan
/// root, used for natural ordering, chapter titles and report output.
/// Entries are immutable once scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub relative: PathBuf,
}

impl CatalogEntry {
    /// File name without its extension, used for per-file chapter titles.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string()
    }
}
