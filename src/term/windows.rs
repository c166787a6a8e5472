// src/term/windows.rs

//! Console-mode translation of the portable mode bitmask.
//!
//! One mode word per standard handle. `VPROC` requires processed output and
//! virtual-terminal processing on both stdout and stderr.

use anyhow::{Context, Result, bail};
use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Console::{
    CONSOLE_MODE, ENABLE_ECHO_INPUT, ENABLE_INSERT_MODE, ENABLE_LINE_INPUT, ENABLE_MOUSE_INPUT,
    ENABLE_PROCESSED_INPUT, ENABLE_PROCESSED_OUTPUT, ENABLE_VIRTUAL_TERMINAL_PROCESSING,
    GetConsoleMode, GetStdHandle, STD_ERROR_HANDLE, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE,
    SetConsoleMode,
};

use super::TermMode;

const VPROC_OUT: CONSOLE_MODE = ENABLE_PROCESSED_OUTPUT | ENABLE_VIRTUAL_TERMINAL_PROCESSING;

/// Console mode words for stdin, stdout and stderr.
#[derive(Debug, Clone)]
pub struct TermState {
    input: CONSOLE_MODE,
    output: CONSOLE_MODE,
    error: CONSOLE_MODE,
}

fn std_handle(which: u32) -> Result<HANDLE> {
    let handle = unsafe { GetStdHandle(which) };
    if handle == INVALID_HANDLE_VALUE {
        bail!(
            "could not get standard console handle: {}",
            std::io::Error::last_os_error()
        );
    }
    Ok(handle)
}

fn console_mode(handle: HANDLE) -> Result<CONSOLE_MODE> {
    let mut mode = 0;
    if unsafe { GetConsoleMode(handle, &mut mode) } == 0 {
        bail!(
            "could not read console mode: {}",
            std::io::Error::last_os_error()
        );
    }
    Ok(mode)
}

fn commit(handle: HANDLE, mode: CONSOLE_MODE) -> Result<()> {
    if unsafe { SetConsoleMode(handle, mode) } == 0 {
        bail!(
            "could not set console mode: {}",
            std::io::Error::last_os_error()
        );
    }
    Ok(())
}

pub fn get_state() -> Result<TermState> {
    Ok(TermState {
        input: console_mode(std_handle(STD_INPUT_HANDLE)?).context("stdin")?,
        output: console_mode(std_handle(STD_OUTPUT_HANDLE)?).context("stdout")?,
        error: console_mode(std_handle(STD_ERROR_HANDLE)?).context("stderr")?,
    })
}

pub fn set_state(state: &TermState) -> Result<()> {
    commit(std_handle(STD_INPUT_HANDLE)?, state.input).context("stdin")?;
    commit(std_handle(STD_OUTPUT_HANDLE)?, state.output).context("stdout")?;
    commit(std_handle(STD_ERROR_HANDLE)?, state.error).context("stderr")?;
    Ok(())
}

pub fn state_mode(state: &TermState) -> TermMode {
    let mut mode = TermMode::empty();
    if state.input & ENABLE_ECHO_INPUT != 0 {
        mode |= TermMode::ECHO;
    }
    if state.input & ENABLE_LINE_INPUT != 0 {
        mode |= TermMode::LINE_INPUT;
    }
    if state.input & ENABLE_INSERT_MODE != 0 {
        mode |= TermMode::INSERT;
    }
    if state.input & ENABLE_MOUSE_INPUT != 0 {
        mode |= TermMode::MOUSE;
    }
    if state.input & ENABLE_PROCESSED_INPUT != 0 {
        mode |= TermMode::CTRL_PROC;
    }
    if state.output & VPROC_OUT == VPROC_OUT && state.error & VPROC_OUT == VPROC_OUT {
        mode |= TermMode::VPROC;
    }
    mode
}

pub fn state_with_mode(state: &TermState, mode: TermMode) -> TermState {
    let mut next = state.clone();
    set_bit(&mut next.input, ENABLE_ECHO_INPUT, mode.contains(TermMode::ECHO));
    set_bit(&mut next.input, ENABLE_LINE_INPUT, mode.contains(TermMode::LINE_INPUT));
    set_bit(&mut next.input, ENABLE_INSERT_MODE, mode.contains(TermMode::INSERT));
    set_bit(&mut next.input, ENABLE_MOUSE_INPUT, mode.contains(TermMode::MOUSE));
    set_bit(
        &mut next.input,
        ENABLE_PROCESSED_INPUT,
        mode.contains(TermMode::CTRL_PROC),
    );
    let vproc = mode.contains(TermMode::VPROC);
    set_bit(&mut next.output, VPROC_OUT, vproc);
    set_bit(&mut next.error, VPROC_OUT, vproc);
    next
}

/// Build a state exhibiting the given mode without touching a real console.
#[cfg(test)]
pub(super) fn test_state(mode: TermMode) -> TermState {
    let zero = TermState {
        input: 0,
        output: 0,
        error: 0,
    };
    state_with_mode(&zero, mode)
}

fn set_bit(word: &mut CONSOLE_MODE, bit: CONSOLE_MODE, on: bool) {
    if on {
        *word |= bit;
    } else {
        *word &= !bit;
    }
}
