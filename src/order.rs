//! Play-order computation.
//!
//! Fuses per-file tag signals into one deterministic order. Tag-based
//! ordering is per-file, not all-or-nothing: a single untagged file sorts
//! to the end of its disc instead of throwing away every other file's
//! track number. Only a catalog with no track numbers at all degrades to
//! pure filename order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::catalog::CatalogEntry;
use crate::natural::natural_path_cmp;
use crate::probe::MetadataRecord;

/// One catalog entry placed in the final play order.
///
/// `index` is a strict, contiguous, zero-based ranking; chapters and
/// serializers iterate this order and never re-derive their own.
#[derive(Debug, Clone)]
pub struct OrderedEntry {
    pub entry: CatalogEntry,
    pub record: MetadataRecord,
    pub index: usize,
}

/// Missing track numbers sort after every real one.
fn cmp_track(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compute the play order for `catalog` (already in natural scan order).
///
/// Sort key: disc ascending (absent = disc 1), track ascending with
/// missing-sorts-last, then natural order of the relative path. When no
/// entry has a track number the catalog order is kept as-is.
pub fn order(
    catalog: Vec<CatalogEntry>,
    metadata: &HashMap<PathBuf, MetadataRecord>,
) -> (Vec<OrderedEntry>, Vec<String>) {
    let mut warnings = Vec::new();

    let mut entries: Vec<(CatalogEntry, MetadataRecord)> = catalog
        .into_iter()
        .map(|entry| {
            let record = metadata.get(&entry.path).cloned().unwrap_or_default();
            (entry, record)
        })
        .collect();

    let tracked = entries
        .iter()
        .filter(|(_, record)| record.track.is_some())
        .count();

    if tracked == 0 {
        warnings.push("no track numbers detected; using filename order".to_string());
    } else {
        if tracked < entries.len() {
            warnings
                .push("some files are missing track numbers; ordering may be incomplete".to_string());
        }
        entries.sort_by(|(ea, ra), (eb, rb)| {
            ra.disc
                .unwrap_or(1)
                .cmp(&rb.disc.unwrap_or(1))
                .then_with(|| cmp_track(ra.track, rb.track))
                .then_with(|| natural_path_cmp(&ea.relative, &eb.relative))
        });
    }

    let ordered = entries
        .into_iter()
        .enumerate()
        .map(|(index, (entry, record))| OrderedEntry {
            entry,
            record,
            index,
        })
        .collect();
    (ordered, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(relative: &str) -> CatalogEntry {
        CatalogEntry {
            path: PathBuf::from("/book").join(relative),
            relative: PathBuf::from(relative),
        }
    }

    fn record(track: Option<u32>, disc: Option<u32>) -> MetadataRecord {
        MetadataRecord {
            track,
            disc,
            ..MetadataRecord::default()
        }
    }

    fn metadata(pairs: &[(&str, MetadataRecord)]) -> HashMap<PathBuf, MetadataRecord> {
        pairs
            .iter()
            .map(|(rel, rec)| (PathBuf::from("/book").join(rel), rec.clone()))
            .collect()
    }

    fn relatives(ordered: &[OrderedEntry]) -> Vec<String> {
        ordered
            .iter()
            .map(|o| o.entry.relative.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn no_track_numbers_falls_back_to_catalog_order() {
        let catalog = vec![entry("z first.mp3"), entry("a second.mp3")];
        let (ordered, warnings) = order(catalog, &HashMap::new());

        assert_eq!(relatives(&ordered), vec!["z first.mp3", "a second.mp3"]);
        assert_eq!(
            warnings,
            vec!["no track numbers detected; using filename order"]
        );
    }

    #[test]
    fn track_numbers_override_filename_order() {
        let catalog = vec![entry("a.mp3"), entry("b.mp3")];
        let meta = metadata(&[
            ("a.mp3", record(Some(2), None)),
            ("b.mp3", record(Some(1), None)),
        ]);

        let (ordered, warnings) = order(catalog, &meta);
        assert_eq!(relatives(&ordered), vec!["b.mp3", "a.mp3"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_track_sorts_last_within_disc() {
        let catalog = vec![entry("a.mp3"), entry("b.mp3"), entry("c.mp3")];
        let meta = metadata(&[
            ("a.mp3", record(Some(1), None)),
            ("b.mp3", record(None, None)),
            ("c.mp3", record(Some(2), None)),
        ]);

        let (ordered, warnings) = order(catalog, &meta);
        assert_eq!(relatives(&ordered), vec!["a.mp3", "c.mp3", "b.mp3"]);
        assert_eq!(
            warnings,
            vec!["some files are missing track numbers; ordering may be incomplete"]
        );
    }

    #[test]
    fn disc_number_takes_precedence_over_track() {
        let catalog = vec![entry("a.mp3"), entry("b.mp3"), entry("c.mp3")];
        let meta = metadata(&[
            ("a.mp3", record(Some(1), Some(2))),
            ("b.mp3", record(Some(9), None)),
            ("c.mp3", record(Some(5), Some(1))),
        ]);

        // b has no disc tag and defaults to disc 1.
        let (ordered, _) = order(catalog, &meta);
        assert_eq!(relatives(&ordered), vec!["c.mp3", "b.mp3", "a.mp3"]);
    }

    #[test]
    fn equal_keys_break_ties_naturally() {
        let catalog = vec![entry("part10.mp3"), entry("part2.mp3")];
        let meta = metadata(&[
            ("part10.mp3", record(Some(1), None)),
            ("part2.mp3", record(Some(1), None)),
        ]);

        let (ordered, _) = order(catalog, &meta);
        assert_eq!(relatives(&ordered), vec!["part2.mp3", "part10.mp3"]);
    }

    #[test]
    fn indices_are_contiguous_and_reruns_are_identical() {
        let catalog = vec![entry("a.mp3"), entry("b.mp3"), entry("c.mp3")];
        let meta = metadata(&[
            ("a.mp3", record(Some(3), None)),
            ("c.mp3", record(Some(1), None)),
        ]);

        let (first, _) = order(catalog.clone(), &meta);
        let (second, _) = order(catalog, &meta);

        for (i, o) in first.iter().enumerate() {
            assert_eq!(o.index, i);
        }
        assert_eq!(relatives(&first), relatives(&second));
    }
}
