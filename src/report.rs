//! Plan rendering and output-file serializers.
//!
//! The concat list and FFMETADATA formats are consumed verbatim by ffmpeg;
//! their field order and headers are fixed. Both writers validate first and
//! write the whole file in one go so no partial output is ever left behind.

use std::fs;
use std::path::Path;

use crate::chapter::Chapter;
use crate::error::Error;
use crate::order::OrderedEntry;
use crate::select::CoverSource;

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Render the human-readable plan: proposed order, accumulated warnings
/// and the action checklist the operator confirms before merging.
pub fn format_plan(
    ordered: &[OrderedEntry],
    root: &Path,
    warnings: &[String],
    metadata_source: Option<&OrderedEntry>,
    cover_source: Option<&CoverSource>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Proposed order:".to_string());
    for o in ordered {
        let mut detail: Vec<String> = Vec::new();
        if let Some(disc) = o.record.disc {
            detail.push(format!("disc={disc}"));
        }
        if let Some(track) = o.record.track {
            detail.push(format!("track={track}"));
        }
        if let Some(title) = &o.record.title {
            detail.push(format!("title={title}"));
        }
        let suffix = if detail.is_empty() {
            String::new()
        } else {
            format!(" ({})", detail.join(", "))
        };
        lines.push(format!(
            "  {:02}. {}{}",
            o.index + 1,
            o.entry.relative.display(),
            suffix
        ));
    }

    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        for warning in warnings {
            lines.push(format!("- {warning}"));
        }
    }

    lines.push(String::new());
    lines.push("Action plan (confirm before merging):".to_string());
    lines.push(format!(
        "- Inputs: {} file(s) under {}",
        ordered.len(),
        root.display()
    ));
    lines.push("- Order: use the proposed sequence above".to_string());
    match metadata_source {
        Some(source) => lines.push(format!(
            "- Metadata source: {} (most complete tags)",
            source.entry.relative.display()
        )),
        None => lines.push(
            "- Metadata source: none detected (supply manually or choose a source file)"
                .to_string(),
        ),
    }
    match cover_source {
        Some(CoverSource::Sidecar(path)) => lines.push(format!(
            "- Cover source: sidecar:{}",
            relative_to(path, root).display()
        )),
        Some(CoverSource::Embedded(path)) => lines.push(format!(
            "- Cover source: embedded:{}",
            relative_to(path, root).display()
        )),
        None => lines.push("- Cover source: none detected (supply a cover image)".to_string()),
    }
    lines.push("- Chapters: choose dir/file/none or merge existing chapters".to_string());
    lines.push("- Output: build the final container after confirmation".to_string());

    lines.join("\n")
}

fn ensure_parent(output: &Path) -> Result<(), Error> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write the ffmpeg concat list: one `file '<absolute path>'` line per
/// entry in play order. Paths containing a single quote are rejected
/// before anything is written; the concat format cannot escape them.
pub fn write_concat_list(ordered: &[OrderedEntry], output: &Path) -> Result<(), Error> {
    for o in ordered {
        if o.entry.path.to_string_lossy().contains('\'') {
            return Err(Error::ConcatQuote(o.entry.path.clone()));
        }
    }

    ensure_parent(output)?;
    let mut text = String::new();
    for o in ordered {
        text.push_str(&format!("file '{}'\n", o.entry.path.display()));
    }
    fs::write(output, text)?;
    Ok(())
}

/// Write the FFMETADATA chapter file. Header and per-chapter field order
/// are fixed for compatibility with downstream muxing tools.
pub fn write_ffmetadata(chapters: &[Chapter], output: &Path) -> Result<(), Error> {
    ensure_parent(output)?;
    let mut text = String::from(";FFMETADATA1\n");
    for chapter in chapters {
        text.push_str("[CHAPTER]\n");
        text.push_str("TIMEBASE=1/1000\n");
        text.push_str(&format!("START={}\n", chapter.start_ms));
        text.push_str(&format!("END={}\n", chapter.end_ms));
        text.push_str(&format!("title={}\n", chapter.title));
    }
    fs::write(output, text)?;
    Ok(())
}
