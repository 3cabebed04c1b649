use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use super::{MetadataRecord, ProbeError, parse_index};

/// Generic media prober: `ffprobe` as a subprocess, JSON output.
///
/// Knows formats the tag reader cannot open, but reports no embedded-art
/// signal (detecting attached pictures reliably needs a tag parser).
pub(super) struct FfprobeBackend {
    program: PathBuf,
}

impl FfprobeBackend {
    /// Capability check: only constructed when `ffprobe` is on PATH.
    pub(super) fn detect() -> Option<Self> {
        which::which("ffprobe")
            .ok()
            .map(|program| Self { program })
    }

    pub(super) fn probe(&self, path: &Path) -> Result<MetadataRecord, ProbeError> {
        let failed = |reason: String| ProbeError::Ffprobe {
            path: path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration:format_tags=track,disc,title,album,artist,album_artist",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .map_err(|e| failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(stderr.trim().to_string()));
        }

        let json: serde_json::Value =
            serde_json::from_slice(&output.stdout).map_err(|e| failed(e.to_string()))?;
        Ok(record_from_json(&json))
    }
}

/// Build a record from ffprobe's `format` section. Tag keys are matched
/// case-insensitively because muxers disagree on casing.
fn record_from_json(json: &serde_json::Value) -> MetadataRecord {
    let format = &json["format"];

    let mut tags: HashMap<String, String> = HashMap::new();
    if let Some(obj) = format.get("tags").and_then(|t| t.as_object()) {
        for (key, value) in obj {
            if let Some(v) = value.as_str() {
                let v = v.trim();
                if !v.is_empty() {
                    tags.insert(key.to_lowercase(), v.to_string());
                }
            }
        }
    }

    MetadataRecord {
        track: tags.get("track").and_then(|v| parse_index(v)),
        disc: tags.get("disc").and_then(|v| parse_index(v)),
        title: tags.get("title").cloned(),
        album: tags.get("album").cloned(),
        artist: tags.get("artist").cloned(),
        album_artist: tags.get("album_artist").cloned(),
        duration: format
            .get("duration")
            .and_then(|d| d.as_str())
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(Duration::from_secs_f64),
        has_cover: false,
    }
}
