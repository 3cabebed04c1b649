use std::path::Path;

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};

use super::{MetadataRecord, ProbeError, parse_index};

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read one file with the in-process tag reader.
///
/// Duration and embedded-picture presence come from the file itself; text
/// tags come from the primary tag, falling back to the first one present.
pub(super) fn read(path: &Path) -> Result<MetadataRecord, ProbeError> {
    let tagged = lofty::read_from_path(path)?;

    let mut record = MetadataRecord {
        duration: Some(tagged.properties().duration()),
        has_cover: tagged.tags().iter().any(|t| !t.pictures().is_empty()),
        ..MetadataRecord::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        record.track = tag.get_string(&ItemKey::TrackNumber).and_then(parse_index);
        record.disc = tag.get_string(&ItemKey::DiscNumber).and_then(parse_index);
        record.title = non_empty(tag.get_string(&ItemKey::TrackTitle));
        record.album = non_empty(tag.get_string(&ItemKey::AlbumTitle));
        record.artist = non_empty(tag.get_string(&ItemKey::TrackArtist));
        record.album_artist = non_empty(tag.get_string(&ItemKey::AlbumArtist));
    }

    Ok(record)
}

/// Pull the first embedded picture's bytes out of a file's tags.
pub(crate) fn first_picture(path: &Path) -> Result<Option<Vec<u8>>, ProbeError> {
    let tagged = lofty::read_from_path(path)?;
    Ok(tagged
        .tags()
        .iter()
        .flat_map(|t| t.pictures().iter())
        .next()
        .map(|p| p.data().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_and_drops_blanks() {
        assert_eq!(non_empty(Some("  Title  ")), Some("Title".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn read_rejects_non_audio_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-audio.mp3");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(read(&path).is_err());
    }
}
