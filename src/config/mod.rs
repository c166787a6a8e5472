// src/config/mod.rs

//! Runtime configuration for watchcmd.
//!
//! Responsibilities:
//! - Define the resolved configuration model (`model.rs`): watched
//!   directories, pattern specs, and the ordered command list.
//! - Validate basic invariants before anything starts (`validate.rs`).
//!
//! Configuration comes from the command line (see `cli`); there is no
//! config file.

pub mod model;
pub mod validate;

pub use model::{Command, WatchConfig};
pub use validate::validate_config;
