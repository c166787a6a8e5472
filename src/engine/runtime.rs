// src/engine/runtime.rs

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::event::{CancelFlag, WakeEvent};
use crate::engine::queue::RunQueue;
use crate::term::Terminal;

/// Where a trigger came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    FileChange,
    Manual,
}

/// Events sent into the runtime from the watchers, the keyboard thread, or
/// shutdown handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEvent {
    Triggered { source: TriggerSource },
    ShutdownRequested,
}

/// The main orchestration loop.
///
/// A single consumer drains the event channel and executes the run queue
/// inline, which is what enforces the single-flight invariant: at most one
/// command execution is in progress at any time, and triggers that arrive
/// while a run is in flight wait in the channel and each produce their own
/// full queue execution afterwards, in arrival order.
///
/// The cancel flag cuts a run short from outside: shutdown raises it, the
/// in-flight child is killed, and the pending `ShutdownRequested` event
/// ends the loop.
pub struct Runtime {
    queue: RunQueue,
    terminal: Arc<Terminal>,
    cancel: CancelFlag,
    events_rx: mpsc::Receiver<RuntimeEvent>,
    /// Signalled after every completed queue execution; lets a caller wait
    /// for quiescence without polling.
    run_finished: WakeEvent,
}

impl Runtime {
    pub fn new(
        queue: RunQueue,
        terminal: Arc<Terminal>,
        cancel: CancelFlag,
        events_rx: mpsc::Receiver<RuntimeEvent>,
        run_finished: WakeEvent,
    ) -> Self {
        Self {
            queue,
            terminal,
            cancel,
            events_rx,
            run_finished,
        }
    }

    /// Main event loop. Returns once shutdown is requested or every sender
    /// has gone away.
    pub async fn run(mut self) -> Result<()> {
        debug!("runtime started");

        while let Some(event) = self.events_rx.recv().await {
            match event {
                RuntimeEvent::Triggered { source } => {
                    if self.cancel.is_raised() {
                        // Shutdown already under way; drain without running.
                        debug!(?source, "ignoring trigger during shutdown");
                        continue;
                    }
                    debug!(?source, "executing run queue");
                    let result = self.queue.execute(&self.terminal, &self.cancel).await;
                    debug!(?result, "run queue finished");
                    self.run_finished.send();
                }
                RuntimeEvent::ShutdownRequested => {
                    debug!("shutdown requested, stopping runtime");
                    break;
                }
            }
        }

        debug!("runtime exiting");
        Ok(())
    }
}
