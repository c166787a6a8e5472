// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The formatter produces the single-line, colour-prefixed protocol the
//! program presents to the user:
//!
//! - `[ERROR]: ...` in red
//! - `[WARN]: ...` in yellow
//! - `[INFO]: ...` uncoloured
//! - `[SUCC]: ...` in green (info-level events with target `"succ"`)
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `WATCHCMD_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`

use std::fmt;

use anyhow::Result;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::cli::LogLevel;

/// Target used to mark an info event as a success line.
///
/// Use the [`succ!`](crate::succ) macro rather than spelling this out.
pub const SUCCESS_TARGET: &str = "succ";

/// Log a green `[SUCC]` line.
#[macro_export]
macro_rules! succ {
    ($($arg:tt)*) => {
        tracing::info!(target: $crate::logging::SUCCESS_TARGET, $($arg)*)
    };
}

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Event formatter for the `[LEVEL]: message` protocol.
pub struct PrefixFormat;

impl<S, N> FormatEvent<S, N> for PrefixFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let (prefix, colour) = if meta.target() == SUCCESS_TARGET {
            ("[SUCC]", Some(GREEN))
        } else {
            match *meta.level() {
                Level::ERROR => ("[ERROR]", Some(RED)),
                Level::WARN => ("[WARN]", Some(YELLOW)),
                Level::INFO => ("[INFO]", None),
                Level::DEBUG => ("[DEBUG]", None),
                Level::TRACE => ("[TRACE]", None),
            }
        };

        if let Some(colour) = colour {
            write!(writer, "{colour}")?;
        }
        write!(writer, "{prefix}: ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        if colour.is_some() {
            write!(writer, "{RESET}")?;
        }
        writeln!(writer)
    }
}

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("WATCHCMD_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(Level::INFO),
    };

    tracing_subscriber::fmt()
        .event_format(PrefixFormat)
        .with_max_level(level)
        .with_writer(std::io::stdout)
        .init();

    Ok(())
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
