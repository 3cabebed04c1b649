//! Error types and their process exit codes.
//!
//! Warnings never land here: they are accumulated through the pipeline and
//! printed with the final report. Only conditions that make a correct
//! result impossible become an `Error` and abort the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::ScanError;
use crate::chapter::ChapterError;
use crate::probe::ProbeError;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad settings, bad root, missing embed target. Nothing was written.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no matching audio files found")]
    NoMatchingFiles,

    #[error("no cover art found in sidecar images or embedded metadata")]
    NoCoverArt,

    /// The ffmpeg concat format cannot represent this path; rejected
    /// before anything is written.
    #[error("file path contains a single quote: {0}")]
    ConcatQuote(PathBuf),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Chapter(#[from] ChapterError),

    /// An external tool (AtomicParsley) was missing or failed.
    #[error("external tool failed: {0}")]
    Tool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable exit codes for scripting around the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NoMatchingFiles | Error::NoCoverArt => 2,
            Error::ConcatQuote(_) => 3,
            Error::Probe(_) | Error::Chapter(_) | Error::Tool(_) => 4,
            Error::Config(_) | Error::Scan(_) => 5,
            Error::Io(_) => 1,
        }
    }
}
