// src/watch/dispatch.rs

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::engine::{RuntimeEvent, TriggerSource};
use crate::watch::patterns::PatternSet;
use crate::watch::watcher::{WatchAction, WatchEvent};

/// Filters detected changes against the configured patterns and turns each
/// match into a run trigger.
///
/// There is deliberately no deduplication or time-window coalescing here:
/// every matching event produces one full queue execution. Serialisation of
/// those executions is the runtime's job.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    patterns: Arc<PatternSet>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl Dispatcher {
    pub fn new(patterns: Arc<PatternSet>, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            patterns,
            runtime_tx,
        }
    }

    /// Handle one detected change. Returns false once the runtime is gone
    /// and the caller should stop delivering events.
    pub async fn on_event(&self, event: WatchEvent) -> bool {
        if !should_trigger(&self.patterns, &event) {
            return true;
        }

        info!("{}", describe(&event));

        if let Err(err) = self
            .runtime_tx
            .send(RuntimeEvent::Triggered {
                source: TriggerSource::FileChange,
            })
            .await
        {
            warn!("failed to deliver trigger to runtime: {err}");
            return false;
        }
        true
    }
}

/// A change triggers iff the pattern set is empty or some pattern matches
/// the changed path. A moved path triggers if either its old or its new
/// location matches.
pub fn should_trigger(patterns: &PatternSet, event: &WatchEvent) -> bool {
    if patterns.matches(&event.path) {
        return true;
    }
    event
        .old_path
        .as_deref()
        .is_some_and(|old| patterns.matches(old))
}

/// The categorised log line for a matching change.
pub fn describe(event: &WatchEvent) -> String {
    let full = display_path(&event.root, &event.path);
    match event.action {
        WatchAction::Created => format!("Created {full}..."),
        WatchAction::Deleted => format!("Deleted {full}..."),
        WatchAction::Modified => format!("Modified {full}..."),
        WatchAction::Moved => {
            let old = event
                .old_path
                .as_deref()
                .map(|p| display_path(&event.root, p))
                .unwrap_or_default();
            format!("Renamed {old} to {full}...")
        }
    }
}

fn display_path(root: &Path, rel: &str) -> String {
    root.join(rel).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::patterns::{PatternSet, PatternSpec};

    fn event(action: WatchAction, path: &str, old_path: Option<&str>) -> WatchEvent {
        WatchEvent {
            action,
            root: "/watched".into(),
            path: path.to_string(),
            old_path: old_path.map(str::to_string),
        }
    }

    #[test]
    fn empty_pattern_set_triggers_on_every_event_kind() {
        let patterns = PatternSet::compile(&[]).expect("empty");
        for action in [
            WatchAction::Created,
            WatchAction::Deleted,
            WatchAction::Modified,
        ] {
            assert!(should_trigger(&patterns, &event(action, "any/file", None)));
        }
        assert!(should_trigger(
            &patterns,
            &event(WatchAction::Moved, "b", Some("a"))
        ));
    }

    #[test]
    fn non_matching_path_does_not_trigger() {
        let patterns = PatternSet::compile(&[PatternSpec::glob("*.c")]).expect("glob");
        assert!(!should_trigger(
            &patterns,
            &event(WatchAction::Modified, "notes.txt", None)
        ));
    }

    #[test]
    fn moved_triggers_if_either_side_matches() {
        let patterns = PatternSet::compile(&[PatternSpec::glob("*.c")]).expect("glob");
        // New path matches.
        assert!(should_trigger(
            &patterns,
            &event(WatchAction::Moved, "foo.c", Some("foo.txt"))
        ));
        // Only the old path matches.
        assert!(should_trigger(
            &patterns,
            &event(WatchAction::Moved, "foo.txt", Some("foo.c"))
        ));
        // Neither side matches.
        assert!(!should_trigger(
            &patterns,
            &event(WatchAction::Moved, "a.txt", Some("b.txt"))
        ));
    }

    #[test]
    fn describe_formats_each_action() {
        assert_eq!(
            describe(&event(WatchAction::Modified, "src/foo.c", None)),
            "Modified /watched/src/foo.c..."
        );
        assert_eq!(
            describe(&event(WatchAction::Moved, "new.c", Some("old.c"))),
            "Renamed /watched/old.c to /watched/new.c..."
        );
    }
}
