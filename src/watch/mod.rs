// src/watch/mod.rs

//! File watching and change dispatch.
//!
//! This module is responsible for:
//! - Compiling the configured glob/regex patterns (`patterns`).
//! - Wiring up a cross-platform filesystem watcher per directory
//!   (`watcher`, built on `notify`).
//! - Filtering changes against the patterns and turning matches into run
//!   triggers (`dispatch`).
//!
//! It does **not** run commands; it only turns filesystem changes into
//! trigger events for the engine.

pub mod dispatch;
pub mod patterns;
pub mod watcher;

pub use dispatch::Dispatcher;
pub use patterns::{Pattern, PatternMode, PatternSet, PatternSpec};
pub use watcher::{WatchAction, WatchEvent, WatcherHandle, spawn_watcher};
