// src/input.rs

//! Keyboard control.
//!
//! A dedicated OS thread blocks on single-byte stdin reads (the terminal is
//! in raw mode, so bytes arrive per keypress) and translates the two control
//! keys into runtime events:
//!
//! - `q`: raise the cancel flag (killing any in-flight command) and request
//!   shutdown
//! - `r`: trigger a full rerun of the command queue
//!
//! Everything else is ignored. The thread ends on `q`, on a read error, or
//! once the runtime has gone away.

use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::{CancelFlag, RuntimeEvent, TriggerSource};
use crate::term::Terminal;

pub fn spawn_key_listener(
    terminal: Arc<Terminal>,
    cancel: CancelFlag,
    events_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            let byte = match terminal.get_char() {
                Ok(byte) => byte,
                Err(err) => {
                    debug!("stdin read failed, stopping key listener: {err}");
                    break;
                }
            };

            match byte.to_ascii_lowercase() {
                b'q' => {
                    debug!("quit requested from keyboard");
                    cancel.raise();
                    // Best effort: the runtime may already be gone.
                    let _ = events_tx.blocking_send(RuntimeEvent::ShutdownRequested);
                    break;
                }
                b'r' => {
                    debug!("manual rerun requested from keyboard");
                    let trigger = RuntimeEvent::Triggered {
                        source: TriggerSource::Manual,
                    };
                    if events_tx.blocking_send(trigger).is_err() {
                        break;
                    }
                }
                _ => {}
            }
        }
    })
}
