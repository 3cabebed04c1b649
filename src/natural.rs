//! Natural string ordering.
//!
//! Compares embedded digit runs numerically and everything else
//! case-insensitively, so "track2" sorts before "track10". This is the
//! universal tie-break: catalog scan order, ordering-engine fallback and
//! cover-candidate ranking all go through [`natural_cmp`].

use std::cmp::Ordering;
use std::path::Path;

/// One run of a natural-order key.
///
/// Keys always alternate `Text`/`Digits` starting with a (possibly empty)
/// text run, so two keys compared position by position never pit a digit
/// run against a text run until one key is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Digits(String),
}

fn segments(text: &str) -> Vec<Segment> {
    let mut segs = Vec::new();
    let mut rest = text;
    loop {
        let split = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        segs.push(Segment::Text(rest[..split].to_lowercase()));
        rest = &rest[split..];
        if rest.is_empty() {
            break;
        }

        let split = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        segs.push(Segment::Digits(rest[..split].to_string()));
        rest = &rest[split..];
        if rest.is_empty() {
            break;
        }
    }
    segs
}

/// Compare digit runs as integers of arbitrary length; leading zeros are
/// insignificant, so "007" and "7" compare equal.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Total order over path-like strings with numeric runs compared as integers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let sa = segments(a);
    let sb = segments(b);
    for (x, y) in sa.iter().zip(sb.iter()) {
        let ord = match (x, y) {
            (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
            (Segment::Digits(x), Segment::Digits(y)) => cmp_digits(x, y),
            // Kinds only mismatch once one side is exhausted mid-run;
            // digits-first matches the ASCII ordering of '0'..'9' vs letters.
            (Segment::Digits(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    sa.len().cmp(&sb.len())
}

/// [`natural_cmp`] over the display form of two paths.
pub fn natural_path_cmp(a: &Path, b: &Path) -> Ordering {
    natural_cmp(&a.to_string_lossy(), &b.to_string_lossy())
}
