// src/exec/mod.rs

//! Subprocess execution.
//!
//! One contract over two OS process models: `exec` spawns a single external
//! command with its combined stdout/stderr captured, blocks until the child
//! exits (or a termination request kills it), and forwards the captured
//! output to the real terminal with disruptive escape sequences scrubbed.
//!
//! - [`unix`]: pipes + `tokio::process`.
//! - [`windows`]: pseudo-console via `portable-pty`, which preserves the
//!   child's ANSI behaviour under capture.
//! - [`ansi`]: the output scrub filter.
//!
//! A session moves NotStarted → Running → one of Completed,
//! TerminatedByRequest or FailedToStart; every OS handle it opened is
//! released on every path before `exec` returns.

pub mod ansi;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as platform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as platform;

use std::io::Write;

use tracing::{error, info, warn};

use crate::config::Command;
use crate::engine::CancelFlag;
use crate::term::Terminal;

/// How a launched child ended.
#[derive(Debug)]
pub(crate) enum RunOutput {
    Exited { exit_code: i32, output: Vec<u8> },
    Terminated,
}

/// Result of one command execution.
///
/// `finished` is false when the process could not be launched, or when a
/// termination request abandoned the session; `exit_code` is only
/// meaningful when `finished` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub exit_code: i32,
    pub finished: bool,
}

/// Run one external command to completion.
///
/// Fails fast on an empty argv. On success the captured output is replayed
/// onto the terminal under a save/restore guard, unless the cancel flag was
/// raised meanwhile, in which case the session is abandoned undrained.
pub async fn exec(command: &Command, terminal: &Terminal, cancel: &CancelFlag) -> ExecOutcome {
    if command.argv.is_empty() {
        error!("Cannot run an empty command");
        return ExecOutcome {
            exit_code: 0,
            finished: false,
        };
    }

    info!("Running '{}'...", command.display);

    match platform::run(&command.argv, cancel).await {
        Ok(RunOutput::Exited { exit_code, output }) => {
            if !cancel.is_raised() {
                forward_output(terminal, &output);
            }
            ExecOutcome {
                exit_code,
                finished: true,
            }
        }
        Ok(RunOutput::Terminated) => ExecOutcome {
            exit_code: -1,
            finished: false,
        },
        Err(err) => {
            error!("{err:#}");
            ExecOutcome {
                exit_code: 0,
                finished: false,
            }
        }
    }
}

/// Replay captured child output onto the real terminal.
///
/// The current terminal mode is saved before printing and restored right
/// after; printing isn't expected to change it, but the child's forwarded
/// escape codes make no such promise.
fn forward_output(terminal: &Terminal, output: &[u8]) {
    if output.is_empty() {
        return;
    }

    let _mode = terminal.guard();
    let scrubbed = ansi::scrub(output);

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = stdout.write_all(&scrubbed).and_then(|()| stdout.flush()) {
        warn!("failed to forward child output: {err}");
    }
}
