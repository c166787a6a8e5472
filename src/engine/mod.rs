// src/engine/mod.rs

//! Orchestration engine.
//!
//! This module ties together:
//! - the run queue (ordered command execution, stop at first failure)
//! - the runtime event loop that serialises every trigger source
//! - the wakeup/cancellation primitives shared across threads
//!
//! Triggers come in from the file watchers and the keyboard thread; the
//! runtime is the only place commands are actually run from.

pub mod event;
pub mod queue;
pub mod runtime;

pub use event::{CancelFlag, WakeEvent};
pub use queue::{QueueResult, RunQueue, StopReason};
pub use runtime::{Runtime, RuntimeEvent, TriggerSource};
