// src/exec/windows.rs

//! Pseudo-console subprocess backend.
//!
//! Spawns the child attached to a ConPTY via `portable-pty` so its own
//! ANSI formatting and interactive behaviour survive capture. The console
//! output is read off the master side in fixed-size chunks into a growable
//! buffer on a dedicated thread; waiting for the child happens on the
//! blocking pool.

use std::io::Read;

use anyhow::{Context, Result, anyhow};
use portable_pty::{CommandBuilder, PtySize, native_pty_system};

use crate::engine::CancelFlag;
use crate::exec::RunOutput;

const READ_CHUNK: usize = 2048;

pub(crate) async fn run(argv: &[String], cancel: &CancelFlag) -> Result<RunOutput> {
    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(PtySize {
            rows: 24,
            cols: 80,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|err| anyhow!("Could not open a pseudo console: {err}"))?;

    let mut builder = CommandBuilder::new(&argv[0]);
    builder.args(&argv[1..]);

    let mut child = pair
        .slave
        .spawn_command(builder)
        .map_err(|err| anyhow!("Could not create child process '{}': {err}", argv[0]))?;
    // Close our copy of the slave so the reader sees EOF when the child exits.
    drop(pair.slave);

    let mut reader = pair
        .master
        .try_clone_reader()
        .map_err(|err| anyhow!("Could not read from the pseudo console: {err}"))?;
    let mut killer = child.clone_killer();

    let reader_thread = std::thread::spawn(move || {
        let mut output = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => output.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        output
    });

    let mut wait = tokio::task::spawn_blocking(move || child.wait());
    let status = tokio::select! {
        res = &mut wait => Some(res),
        () = cancel.raised() => None,
    };

    let status = match status {
        Some(res) => res
            .context("wait task panicked")?
            .context("Failed to wait for child process to exit")?,
        None => {
            let _ = killer.kill();
            // Reap the child so the console handles can be released.
            let _ = wait.await;
            drop(pair.master);
            let _ = tokio::task::spawn_blocking(move || reader_thread.join()).await;
            return Ok(RunOutput::Terminated);
        }
    };

    // Dropping the master unblocks the reader thread if the pipe is still
    // open on our side.
    drop(pair.master);
    let output = tokio::task::spawn_blocking(move || reader_thread.join())
        .await
        .context("join task panicked")?
        .map_err(|_| anyhow!("Failed to read output from child process"))?;

    Ok(RunOutput::Exited {
        exit_code: status.exit_code() as i32,
        output,
    })
}
