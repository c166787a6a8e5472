#![cfg(unix)]

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use watchcmd::config::Command;
use watchcmd::engine::{CancelFlag, QueueResult, RunQueue, StopReason};
use watchcmd::term::Terminal;

type TestResult = Result<(), Box<dyn Error>>;

fn touch_cmd(path: &Path) -> Command {
    Command::parse(&format!("touch {}", path.display()))
}

#[tokio::test]
async fn all_commands_succeeding_runs_every_one() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    let queue = RunQueue::new(vec![touch_cmd(&a), touch_cmd(&b)]);

    let result = queue
        .execute(&Terminal::disconnected(), &CancelFlag::new())
        .await;

    assert_eq!(result, QueueResult::AllSucceeded);
    assert!(a.exists());
    assert!(b.exists());
    Ok(())
}

#[tokio::test]
async fn nonzero_exit_stops_the_queue_at_that_index() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let first = tmp.path().join("first");
    let third = tmp.path().join("third");
    let queue = RunQueue::new(vec![
        touch_cmd(&first),
        Command::parse("false"),
        touch_cmd(&third),
    ]);

    let result = queue
        .execute(&Terminal::disconnected(), &CancelFlag::new())
        .await;

    assert_eq!(
        result,
        QueueResult::StoppedAt {
            index: 1,
            reason: StopReason::NonZeroExit(1),
        }
    );
    assert!(first.exists());
    assert!(!third.exists(), "command after the failure must not run");
    Ok(())
}

#[tokio::test]
async fn launch_failure_stops_the_queue() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let after = tmp.path().join("after");
    let queue = RunQueue::new(vec![
        Command::parse("definitely-not-a-real-binary-zzz"),
        touch_cmd(&after),
    ]);

    let result = queue
        .execute(&Terminal::disconnected(), &CancelFlag::new())
        .await;

    assert_eq!(
        result,
        QueueResult::StoppedAt {
            index: 0,
            reason: StopReason::LaunchFailed,
        }
    );
    assert!(!after.exists());
    Ok(())
}

#[tokio::test]
async fn executing_twice_runs_the_same_commands_again() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let marker = tmp.path().join("marker");
    let queue = RunQueue::new(vec![touch_cmd(&marker)]);
    let terminal = Terminal::disconnected();
    let cancel = CancelFlag::new();

    assert_eq!(
        queue.execute(&terminal, &cancel).await,
        QueueResult::AllSucceeded
    );
    std::fs::remove_file(&marker)?;
    assert_eq!(
        queue.execute(&terminal, &cancel).await,
        QueueResult::AllSucceeded
    );
    assert!(marker.exists());
    Ok(())
}

#[tokio::test]
async fn a_raised_flag_skips_the_whole_queue() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let marker = tmp.path().join("marker");
    let queue = RunQueue::new(vec![touch_cmd(&marker)]);
    let cancel = CancelFlag::new();
    cancel.raise();

    let result = queue.execute(&Terminal::disconnected(), &cancel).await;

    assert_eq!(
        result,
        QueueResult::StoppedAt {
            index: 0,
            reason: StopReason::Cancelled,
        }
    );
    assert!(!marker.exists());
    Ok(())
}

#[tokio::test]
async fn raising_the_flag_mid_run_kills_the_child_and_cancels() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let after = tmp.path().join("after");
    let queue = RunQueue::new(vec![Command::parse("sleep 30"), touch_cmd(&after)]);
    let cancel = CancelFlag::new();

    let raiser = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.raise();
        })
    };

    let result = queue.execute(&Terminal::disconnected(), &cancel).await;
    raiser.await?;

    assert_eq!(
        result,
        QueueResult::StoppedAt {
            index: 0,
            reason: StopReason::Cancelled,
        }
    );
    assert!(!after.exists());
    Ok(())
}
