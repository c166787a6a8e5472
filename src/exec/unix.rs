// src/exec/unix.rs

//! Pipe-based subprocess backend.
//!
//! Spawns the child with both output streams piped, drains them
//! concurrently into one growable buffer, then collects the exit status.
//! Draining before waiting matters: a child that fills its pipe while
//! nobody reads would never exit.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::engine::CancelFlag;
use crate::exec::RunOutput;

pub(crate) async fn run(argv: &[String], cancel: &CancelFlag) -> Result<RunOutput> {
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("Could not create child process '{}'", argv[0]))?;

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    let driven = {
        let drive = async {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let read_out = async {
                if let Some(pipe) = stdout.as_mut() {
                    let _ = pipe.read_to_end(&mut out).await;
                }
            };
            let read_err = async {
                if let Some(pipe) = stderr.as_mut() {
                    let _ = pipe.read_to_end(&mut err).await;
                }
            };
            tokio::join!(read_out, read_err);

            let status = child
                .wait()
                .await
                .context("Failed to wait for child process to exit")?;
            out.extend_from_slice(&err);
            anyhow::Ok((status, out))
        };
        tokio::pin!(drive);
        tokio::select! {
            res = &mut drive => Some(res),
            () = cancel.raised() => None,
        }
    };

    match driven {
        Some(res) => {
            let (status, output) = res?;
            Ok(RunOutput::Exited {
                exit_code: status.code().unwrap_or(-1),
                output,
            })
        }
        None => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            Ok(RunOutput::Terminated)
        }
    }
}
