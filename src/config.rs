//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive scanning,
//! cover detection and chapter building, plus helpers to load it from disk.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
