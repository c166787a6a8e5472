// src/cli.rs

//! Command-line parsing.
//!
//! Three usage variants, each more powerful than the previous:
//!
//! 1. `watchcmd <dir> <cmd>`
//! 2. `watchcmd <dir> <glob> <cmd> [<cmd>]*`
//! 3. `watchcmd [<flag>]+` with repeatable `-d/-g/-r/-c`
//!
//! The first argument decides: if it starts with `-`, the flag form is
//! parsed with `clap`; otherwise the positional variants apply. Flags
//! accept both `flag=value` and `flag value [value]*` syntax (the latter
//! falls out of `num_args(1..)`), and each flag may be given several times.
//!
//! Exit codes: 0 for help/version, 1 for any usage or pattern error.

use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{Command, WatchConfig};
use crate::errors::UsageError;
use crate::watch::patterns::PatternSpec;

const AFTER_HELP: &str = "\
Usage variants:
  1. watchcmd <dir> <cmd>
  2. watchcmd <dir> <glob> <cmd> [<cmd>]*
  3. watchcmd [<flag>]+

Each flag may be provided several times, as either `flag=value` or
`flag value [value]*`. Option order doesn't matter except for commands:
all commands run in the order they were provided in.

Supported glob syntax: '*', '?', '[abc]', '[a-zA-Z]'.
Supported regex syntax: '.', '^', '$', '*', '+', '?', '[abc]', '[^abc]',
ranges, and '\\s', '\\S', '\\w', '\\W', '\\d', '\\D'.

While the program is running:
  'q': quit the program
  'r': rerun all commands immediately";

/// Flag form of the command line (usage variant 3).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchcmd",
    about = "Execute commands whenever specific files are changed.",
    after_help = AFTER_HELP
)]
struct FlagForm {
    /// Directory to match files inside of.
    #[arg(short = 'd', long = "dir", value_name = "DIR", num_args = 1.., action = ArgAction::Append)]
    dirs: Vec<String>,

    /// Glob pattern to match file names against.
    #[arg(short = 'g', long = "glob", value_name = "PATTERN", num_args = 1.., action = ArgAction::Append)]
    globs: Vec<String>,

    /// Regular expression to match file names against.
    #[arg(short = 'r', long = "regex", value_name = "PATTERN", num_args = 1.., action = ArgAction::Append)]
    regexes: Vec<String>,

    /// Command to execute when a matching file was changed.
    #[arg(short = 'c', long = "cmd", value_name = "CMD", num_args = 1.., action = ArgAction::Append)]
    cmds: Vec<String>,

    /// Show the program's version.
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHCMD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// A fully parsed invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub dirs: Vec<String>,
    pub globs: Vec<String>,
    pub regexes: Vec<String>,
    pub cmds: Vec<String>,
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Build the resolved configuration: globs first, then regexes, in the
    /// order each was supplied; command order is execution order.
    pub fn to_config(&self) -> WatchConfig {
        let mut patterns: Vec<PatternSpec> =
            self.globs.iter().map(PatternSpec::glob).collect();
        patterns.extend(self.regexes.iter().map(PatternSpec::regex));

        WatchConfig {
            dirs: self.dirs.iter().map(PathBuf::from).collect(),
            patterns,
            commands: self.cmds.iter().map(|c| Command::parse(c)).collect(),
        }
    }
}

/// What `parse_args` decided the process should do.
#[derive(Debug)]
pub enum Invocation {
    Run(CliArgs),
    /// Help or version was printed; exit with this code.
    Exit(i32),
}

/// The two-line `-v/--version` output.
pub fn version_banner() -> String {
    format!(
        "watchcmd v{}\n{}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
    )
}

/// Argument parsing proper, separated from process exit so the caller
/// controls how errors are reported.
pub fn parse_args<I>(args: I) -> Result<Invocation>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    if args.len() < 2 {
        return Err(UsageError::TooFewArguments.into());
    }

    let parsed = if args[1].starts_with('-') {
        parse_flag_form(&args)?
    } else {
        parse_positional_form(&args)?
    };

    if let Invocation::Run(cli) = &parsed {
        check_no_empty_values(cli)?;
    }
    Ok(parsed)
}

fn parse_flag_form(args: &[String]) -> Result<Invocation> {
    let form = match FlagForm::try_parse_from(args) {
        Ok(form) => form,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            err.print()?;
            return Ok(Invocation::Exit(0));
        }
        Err(err) => return Err(err.into()),
    };

    if form.version {
        println!("{}", version_banner());
        return Ok(Invocation::Exit(0));
    }

    Ok(Invocation::Run(CliArgs {
        dirs: form.dirs,
        globs: form.globs,
        regexes: form.regexes,
        cmds: form.cmds,
        log_level: form.log_level,
    }))
}

fn parse_positional_form(args: &[String]) -> Result<Invocation> {
    match args.len() {
        // `watchcmd <dir>` is missing the command.
        2 => Err(UsageError::TooFewArguments.into()),
        // Variant 1: <dir> <cmd>
        3 => Ok(Invocation::Run(CliArgs {
            dirs: vec![args[1].clone()],
            cmds: vec![args[2].clone()],
            ..CliArgs::default()
        })),
        // Variant 2: <dir> <glob> <cmd> [<cmd>]*
        _ => Ok(Invocation::Run(CliArgs {
            dirs: vec![args[1].clone()],
            globs: vec![args[2].clone()],
            cmds: args[3..].to_vec(),
            ..CliArgs::default()
        })),
    }
}

fn check_no_empty_values(cli: &CliArgs) -> Result<()> {
    for (flag, values) in [
        ("-d", &cli.dirs),
        ("-g", &cli.globs),
        ("-r", &cli.regexes),
        ("-c", &cli.cmds),
    ] {
        if values.iter().any(String::is_empty) {
            return Err(UsageError::EmptyFlagValue(format!("{flag}=")).into());
        }
    }
    Ok(())
}
