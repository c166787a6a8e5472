// src/config/model.rs

use std::path::PathBuf;

use crate::watch::patterns::PatternSpec;

/// One external command: the whitespace-tokenised argv plus the original
/// string it was built from, kept for log lines.
///
/// Built once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub argv: Vec<String>,
    pub display: String,
}

impl Command {
    /// Tokenise a configured command string on whitespace.
    ///
    /// A blank string yields an empty argv, which the execution layer
    /// rejects when the command is actually run.
    pub fn parse(text: &str) -> Self {
        Self {
            argv: text.split_whitespace().map(str::to_string).collect(),
            display: text.to_string(),
        }
    }
}

/// Fully resolved configuration: what to watch, what to match, what to run.
///
/// Owned for the program's lifetime; every list is in the order the user
/// supplied it, and command order is execution order.
#[derive(Debug, Clone, Default)]
pub struct WatchConfig {
    pub dirs: Vec<PathBuf>,
    pub patterns: Vec<PatternSpec>,
    pub commands: Vec<Command>,
}
