// src/errors.rs

//! Crate-wide error types.
//!
//! Only startup-time errors are structured: bad command-line usage and
//! pattern compilation failures, both fatal with exit code 1 before any
//! watching begins. Everything that happens after the watchers are running
//! is logged and contained to the triggering run, so those paths use plain
//! `anyhow` propagation internally.

use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::{Error, Result};

/// Invalid command-line usage, detected before anything is started.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Invalid Usage: Too few arguments")]
    TooFewArguments,

    #[error("Invalid Usage: No directory specified")]
    NoDirectory,

    #[error("Invalid Usage: No command specified")]
    NoCommand,

    #[error("Expected a value after the equals sign in '{0}'")]
    EmptyFlagValue(String),

    #[error("watched directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
}

/// A glob or regex pattern that failed to compile.
///
/// The underlying compilers don't expose character offsets, so the error
/// carries the full offending pattern text instead.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Failed to parse the following glob pattern ({}):\n  '{text}'", source.kind())]
    Glob {
        text: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to parse the following regex pattern:\n  '{text}'")]
    Regex {
        text: String,
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// The offending pattern text, exactly as the user supplied it.
    pub fn pattern_text(&self) -> &str {
        match self {
            PatternError::Glob { text, .. } | PatternError::Regex { text, .. } => text,
        }
    }
}
