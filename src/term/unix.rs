// src/term/unix.rs

//! termios translation of the portable mode bitmask.
//!
//! Canonical mode is reported as both `LINE_INPUT` and `INSERT`; terminals
//! on this side don't have a separate insert flag, so only `LINE_INPUT`
//! drives `ICANON` when writing a state back. ANSI processing cannot be
//! toggled through termios, so `VPROC` is always reported as on and is
//! ignored on the write side.

use anyhow::{Context, Result};
use nix::sys::termios::{self, LocalFlags, SetArg, Termios};

use super::TermMode;

pub type TermState = Termios;

pub fn get_state() -> Result<TermState> {
    termios::tcgetattr(std::io::stdin()).context("reading terminal attributes")
}

pub fn set_state(state: &TermState) -> Result<()> {
    termios::tcsetattr(std::io::stdin(), SetArg::TCSANOW, state)
        .context("writing terminal attributes")
}

pub fn state_mode(state: &TermState) -> TermMode {
    mode_from_flags(state.local_flags)
}

pub fn state_with_mode(state: &TermState, mode: TermMode) -> TermState {
    let mut next = state.clone();
    next.local_flags = flags_with_mode(next.local_flags, mode);
    next
}

fn mode_from_flags(flags: LocalFlags) -> TermMode {
    let mut mode = TermMode::VPROC;
    if flags.contains(LocalFlags::ECHO) {
        mode |= TermMode::ECHO;
    }
    if flags.contains(LocalFlags::ICANON) {
        mode |= TermMode::LINE_INPUT | TermMode::INSERT;
    }
    if flags.contains(LocalFlags::ISIG) {
        mode |= TermMode::CTRL_PROC;
    }
    mode
}

/// Build a state exhibiting the given mode without touching a real tty.
#[cfg(test)]
pub(super) fn test_state(mode: TermMode) -> TermState {
    let mut state: Termios = unsafe { std::mem::zeroed::<nix::libc::termios>() }.into();
    state.local_flags = flags_with_mode(LocalFlags::empty(), mode);
    state
}

fn flags_with_mode(mut flags: LocalFlags, mode: TermMode) -> LocalFlags {
    flags.set(
        LocalFlags::ECHO | LocalFlags::ECHONL,
        mode.contains(TermMode::ECHO),
    );
    flags.set(LocalFlags::ICANON, mode.contains(TermMode::LINE_INPUT));
    flags.set(LocalFlags::ISIG, mode.contains(TermMode::CTRL_PROC));
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooked_flags_map_to_full_mode() {
        let flags = LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG;
        let mode = mode_from_flags(flags);
        assert!(mode.contains(TermMode::ECHO));
        assert!(mode.contains(TermMode::LINE_INPUT));
        assert!(mode.contains(TermMode::INSERT));
        assert!(mode.contains(TermMode::CTRL_PROC));
        assert!(mode.contains(TermMode::VPROC));
    }

    #[test]
    fn raw_baseline_clears_canon_and_echo() {
        let flags = LocalFlags::ECHO | LocalFlags::ECHONL | LocalFlags::ICANON | LocalFlags::ISIG;
        let baseline =
            (mode_from_flags(flags) | TermMode::VPROC) - TermMode::LINE_INPUT - TermMode::ECHO;
        let raw = flags_with_mode(flags, baseline);
        assert!(!raw.contains(LocalFlags::ECHO));
        assert!(!raw.contains(LocalFlags::ECHONL));
        assert!(!raw.contains(LocalFlags::ICANON));
        assert!(raw.contains(LocalFlags::ISIG));
    }

    #[test]
    fn round_trip_preserves_observed_mode() {
        let flags = LocalFlags::ICANON | LocalFlags::ISIG;
        let mode = mode_from_flags(flags);
        assert_eq!(mode_from_flags(flags_with_mode(flags, mode)), mode);
    }
}
