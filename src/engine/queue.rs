// src/engine/queue.rs

use tracing::{error, warn};

use crate::config::Command;
use crate::engine::CancelFlag;
use crate::exec;
use crate::succ;
use crate::term::Terminal;

/// Why a queue execution stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The process could not be created or piped.
    LaunchFailed,
    /// The process ran and exited with this non-zero code.
    NonZeroExit(i32),
    /// A termination request abandoned the run.
    Cancelled,
}

/// Outcome of one full queue execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueResult {
    AllSucceeded,
    StoppedAt { index: usize, reason: StopReason },
}

/// The ordered sequence of configured commands.
///
/// Insertion order is configuration order is execution order: `execute`
/// always starts at index 0, proceeds strictly forward, and stops at the
/// first command that fails to launch or exits non-zero. It never reorders
/// or parallelises.
#[derive(Debug, Clone)]
pub struct RunQueue {
    commands: Vec<Command>,
}

impl RunQueue {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Run every command in order, stopping at the first failure.
    ///
    /// Callers must not overlap executions: the runtime is the single
    /// consumer that serialises every trigger source through this method.
    pub async fn execute(&self, terminal: &Terminal, cancel: &CancelFlag) -> QueueResult {
        for (index, command) in self.commands.iter().enumerate() {
            if cancel.is_raised() {
                return QueueResult::StoppedAt {
                    index,
                    reason: StopReason::Cancelled,
                };
            }

            let outcome = exec::exec(command, terminal, cancel).await;
            if !outcome.finished {
                if cancel.is_raised() {
                    return QueueResult::StoppedAt {
                        index,
                        reason: StopReason::Cancelled,
                    };
                }
                error!("'{}' couldn't be executed properly", command.display);
                return QueueResult::StoppedAt {
                    index,
                    reason: StopReason::LaunchFailed,
                };
            }
            if outcome.exit_code != 0 {
                warn!(
                    "'{}' failed with exit code {}",
                    command.display, outcome.exit_code
                );
                return QueueResult::StoppedAt {
                    index,
                    reason: StopReason::NonZeroExit(outcome.exit_code),
                };
            }
            succ!("'{}' ran successfully", command.display);
        }
        QueueResult::AllSucceeded
    }
}
