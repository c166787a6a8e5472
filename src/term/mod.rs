// src/term/mod.rs

//! Terminal mode control.
//!
//! Wraps the host terminal's attribute set behind a portable [`TermMode`]
//! bitmask plus the platform-native snapshot it was derived from. The native
//! translation lives in one submodule per OS (termios on Unix, console modes
//! on Windows) and is selected at build time.
//!
//! The [`Terminal`] object owns two snapshots: the *initial* state captured
//! by [`Terminal::init`] and restored exactly by [`Terminal::deinit`], and
//! the *current* state that `set_mode`/`add_mode`/`sub_mode` read-modify-
//! write. Components that need to print while raw mode is active take a
//! [`ModeGuard`], which captures the state it observed and restores exactly
//! that state when dropped, so nested save/restore sequences compose
//! regardless of call order.

use std::io::{IsTerminal, Read};
use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use bitflags::bitflags;
use tracing::{debug, warn};

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as platform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as platform;

pub use platform::TermState;

bitflags! {
    /// Portable terminal mode bitmask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TermMode: u8 {
        /// Echo input back to the screen automatically.
        const ECHO       = 1 << 0;
        /// Line-buffered (canonical) input: bytes are delivered on enter.
        const LINE_INPUT = 1 << 1;
        /// Insert instead of overwrite at the cursor position.
        const INSERT     = 1 << 2;
        /// Mouse input events. Only has an effect on Windows.
        const MOUSE      = 1 << 3;
        /// Control sequences like Ctrl+C are handled by the console.
        const CTRL_PROC  = 1 << 4;
        /// Process virtual-terminal (ANSI) escape codes.
        const VPROC      = 1 << 5;
    }
}

/// Where committed states go: the real console, or a log for tests.
enum Sink {
    Console,
    #[cfg(test)]
    Recorder(Vec<TermState>),
}

struct Inner {
    initial: TermState,
    current: TermState,
    sink: Sink,
}

impl Inner {
    fn commit(&mut self, state: &TermState) -> Result<()> {
        match &mut self.sink {
            Sink::Console => platform::set_state(state),
            #[cfg(test)]
            Sink::Recorder(log) => {
                log.push(state.clone());
                Ok(())
            }
        }
    }
}

/// Handle to the controlling terminal.
///
/// When stdin is not a terminal (tests, pipes, CI) every mode operation is
/// an inert no-op; `get_char` still reads from stdin.
pub struct Terminal {
    inner: Mutex<Option<Inner>>,
}

impl Terminal {
    /// Capture the current terminal state as the initial state, then apply
    /// the baseline operating mode for keyboard-driven control: ANSI
    /// processing on, line buffering off, echo off. OS handling of interrupt
    /// signals is left as found.
    pub fn init() -> Result<Self> {
        if !std::io::stdin().is_terminal() {
            debug!("stdin is not a terminal; terminal mode control disabled");
            return Ok(Self {
                inner: Mutex::new(None),
            });
        }

        let initial = platform::get_state()?;
        let baseline = (platform::state_mode(&initial) | TermMode::VPROC)
            - TermMode::LINE_INPUT
            - TermMode::ECHO;
        let current = platform::state_with_mode(&initial, baseline);
        platform::set_state(&current)?;

        Ok(Self {
            inner: Mutex::new(Some(Inner {
                initial,
                current,
                sink: Sink::Console,
            })),
        })
    }

    /// A handle with mode control disabled. For contexts that must not
    /// touch the controlling terminal, such as tests.
    pub fn disconnected() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Restore the exact state captured by [`Terminal::init`], regardless of
    /// any transient mode changes made in between.
    pub fn deinit(&self) -> Result<()> {
        let mut inner = self.lock();
        if let Some(inner) = inner.as_mut() {
            let initial = inner.initial.clone();
            inner.commit(&initial)?;
            inner.current = initial;
        }
        Ok(())
    }

    /// Current mode translated into the portable bitmask.
    pub fn get_mode(&self) -> TermMode {
        match self.lock().as_ref() {
            Some(inner) => platform::state_mode(&inner.current),
            None => TermMode::empty(),
        }
    }

    /// Translate the bitmask into a native state and commit it.
    pub fn set_mode(&self, mode: TermMode) -> Result<()> {
        let mut inner = self.lock();
        if let Some(inner) = inner.as_mut() {
            let next = platform::state_with_mode(&inner.current, mode);
            inner.commit(&next)?;
            inner.current = next;
        }
        Ok(())
    }

    /// OR the given bits into the current mode and commit.
    pub fn add_mode(&self, mode: TermMode) -> Result<()> {
        self.set_mode(self.get_mode() | mode)
    }

    /// Clear the given bits from the current mode and commit.
    pub fn sub_mode(&self, mode: TermMode) -> Result<()> {
        self.set_mode(self.get_mode() - mode)
    }

    /// Snapshot the current state and return a guard that restores exactly
    /// that snapshot on drop.
    pub fn guard(&self) -> ModeGuard<'_> {
        let saved = self.lock().as_ref().map(|inner| inner.current.clone());
        ModeGuard { term: self, saved }
    }

    /// Blocking read of one input byte from stdin.
    pub fn get_char(&self) -> std::io::Result<u8> {
        let mut buf = [0u8; 1];
        let n = std::io::stdin().lock().read(&mut buf)?;
        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed",
            ));
        }
        Ok(buf[0])
    }

    fn restore(&self, saved: &TermState) {
        let mut inner = self.lock();
        if let Some(inner) = inner.as_mut() {
            if let Err(err) = inner.commit(saved) {
                warn!("failed to restore terminal state: {err:#}");
            } else {
                inner.current = saved.clone();
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Inner>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Saved terminal state, restored exactly when dropped.
pub struct ModeGuard<'a> {
    term: &'a Terminal,
    saved: Option<TermState>,
}

impl Drop for ModeGuard<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.term.restore(&saved);
        }
    }
}

#[cfg(test)]
impl Terminal {
    /// A handle whose commits are recorded instead of written to the
    /// console, starting from the given native state.
    fn recording(initial: TermState) -> Self {
        Self {
            inner: Mutex::new(Some(Inner {
                initial: initial.clone(),
                current: initial,
                sink: Sink::Recorder(Vec::new()),
            })),
        }
    }

    fn committed(&self) -> Vec<TermState> {
        match self.lock().as_ref() {
            Some(Inner {
                sink: Sink::Recorder(log),
                ..
            }) => log.clone(),
            _ => Vec::new(),
        }
    }

    fn current_state(&self) -> Option<TermState> {
        self.lock().as_ref().map(|inner| inner.current.clone())
    }
}
