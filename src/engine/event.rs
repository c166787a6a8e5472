// src/engine/event.rs

//! Minimal cross-platform wakeup primitives.
//!
//! [`WakeEvent`] is a signal object with `send`/`wait` semantics: `send`
//! marks it signalled, `wait` blocks the calling task until a signal has
//! been sent. One signal is buffered, so a send that races ahead of the
//! waiter is not lost. Expected to have at most one outstanding waiter.
//! Resources are released on drop.
//!
//! [`CancelFlag`] layers a sticky "terminated" bit on top: once raised it
//! stays raised, and anyone awaiting [`CancelFlag::raised`] wakes up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Cloneable wakeup signal for coordinating two execution contexts without
/// busy-waiting.
#[derive(Debug, Clone, Default)]
pub struct WakeEvent {
    notify: Arc<Notify>,
}

impl WakeEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the event signalled, waking the waiter if there is one.
    pub fn send(&self) {
        self.notify.notify_one();
    }

    /// Block the calling task until the event is signalled.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Cooperative termination flag shared between the keyboard/shutdown side
/// and an in-flight command execution.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    raised: Arc<AtomicBool>,
    event: WakeEvent,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Sticky: there is no way to lower it again.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
        self.event.send();
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Resolve once the flag is raised. Returns immediately if it already
    /// was when called.
    pub async fn raised(&self) {
        while !self.is_raised() {
            self.event.wait().await;
        }
    }
}
