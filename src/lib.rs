// src/lib.rs

//! Run commands whenever watched files change.
//!
//! The pipeline, start to finish:
//!
//! 1. [`cli`] resolves the command line into a [`config::WatchConfig`].
//! 2. [`watch`] compiles the patterns, spawns one filesystem watcher per
//!    directory, and turns matching changes into trigger events.
//! 3. [`input`] reads raw keystrokes (`q` quits, `r` reruns).
//! 4. [`engine`] drains all trigger sources through a single event loop and
//!    executes the configured commands in order, stopping at the first
//!    failure.
//! 5. [`exec`] runs each command, captures its output, and replays it with
//!    disruptive escape sequences scrubbed.
//! 6. [`term`] keeps the terminal in raw mode for the duration and restores
//!    it exactly on the way out.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod input;
pub mod logging;
pub mod term;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::engine::{CancelFlag, RunQueue, Runtime, RuntimeEvent, WakeEvent};
use crate::term::Terminal;
use crate::watch::{Dispatcher, PatternSet};

/// Capacity of the trigger channel. Triggers that arrive while a run is in
/// flight queue up here and each produce their own run afterwards.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Watch, trigger, execute. Blocks until `q` is pressed.
pub async fn run(args: cli::CliArgs) -> Result<()> {
    let config = args.to_config();
    config::validate_config(&config)?;

    let patterns = Arc::new(PatternSet::compile(&config.patterns)?);
    let queue = RunQueue::new(config.commands.clone());

    let (events_tx, events_rx) = mpsc::channel::<RuntimeEvent>(EVENT_CHANNEL_CAPACITY);
    let cancel = CancelFlag::new();
    let run_finished = WakeEvent::new();

    // Watchers first: they can fail (missing permissions, exhausted inotify
    // instances) and nothing should have touched the terminal yet then.
    let mut watchers = Vec::with_capacity(config.dirs.len());
    for dir in &config.dirs {
        let dispatcher = Dispatcher::new(Arc::clone(&patterns), events_tx.clone());
        watchers.push(watch::spawn_watcher(dir, dispatcher)?);
    }

    let terminal = Arc::new(Terminal::init()?);

    info!("Quit with 'q', rerun all commands with 'r'");

    let keys = input::spawn_key_listener(Arc::clone(&terminal), cancel.clone(), events_tx);

    let runtime = Runtime::new(
        queue,
        Arc::clone(&terminal),
        cancel,
        events_rx,
        run_finished,
    );
    let result = runtime.run().await;

    drop(watchers);
    drop(keys);
    terminal.deinit()?;

    result
}
