use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use watchcmd::engine::{RuntimeEvent, TriggerSource};
use watchcmd::watch::{Dispatcher, PatternSet, PatternSpec, spawn_watcher};

type TestResult = Result<(), Box<dyn Error>>;

async fn recv_trigger(rx: &mut mpsc::Receiver<RuntimeEvent>) -> Option<RuntimeEvent> {
    tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn creating_a_matching_file_produces_a_trigger() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let patterns = Arc::new(PatternSet::compile(&[PatternSpec::glob("*.c")])?);
    let (tx, mut rx) = mpsc::channel(8);
    let _watcher = spawn_watcher(tmp.path(), Dispatcher::new(patterns, tx))?;

    // Give the backend a moment to arm before producing the change.
    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(tmp.path().join("main.c"), b"int main(void) { return 0; }")?;

    let event = recv_trigger(&mut rx).await;
    assert_eq!(
        event,
        Some(RuntimeEvent::Triggered {
            source: TriggerSource::FileChange,
        })
    );
    Ok(())
}

#[tokio::test]
async fn non_matching_changes_produce_no_trigger() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let patterns = Arc::new(PatternSet::compile(&[PatternSpec::glob("*.c")])?);
    let (tx, mut rx) = mpsc::channel(8);
    let _watcher = spawn_watcher(tmp.path(), Dispatcher::new(patterns, tx))?;

    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(tmp.path().join("notes.txt"), b"nothing to see")?;

    let got = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
    assert!(got.is_err(), "expected no trigger, got {got:?}");
    Ok(())
}
