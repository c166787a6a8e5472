// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::watch::dispatch::Dispatcher;

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchAction {
    Created,
    Deleted,
    Modified,
    Moved,
}

/// One detected filesystem change, with paths relative to the watch root
/// (forward slashes). `old_path` is only present for [`WatchAction::Moved`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub action: WatchAction,
    pub root: PathBuf,
    pub path: String,
    pub old_path: Option<String>,
}

/// Handle for one directory's filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher observing `root` recursively, forwarding each
/// detected change to the dispatcher.
pub fn spawn_watcher(root: impl Into<PathBuf>, dispatcher: Dispatcher) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // Can't log via tracing from this thread reliably.
                        eprintln!("watchcmd: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("watchcmd: file watch error: {err}");
                }
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("Watching {} for file changes...", root.display());

    let async_root = root.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            for watch_event in translate(&async_root, &event) {
                if !dispatcher.on_event(watch_event).await {
                    // Runtime channel closed; no point keeping this loop alive.
                    debug!("runtime gone, stopping watcher loop");
                    return;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Map one notify event onto our event model, relativising paths against
/// the watch root. An event with several unrelated paths yields one
/// `WatchEvent` per path; a rename with both ends yields a single Moved.
fn translate(root: &Path, event: &Event) -> Vec<WatchEvent> {
    let action = match event.kind {
        EventKind::Create(_) => WatchAction::Created,
        EventKind::Remove(_) => WatchAction::Deleted,
        EventKind::Modify(ModifyKind::Name(_)) => WatchAction::Moved,
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => WatchAction::Modified,
        EventKind::Access(_) => return Vec::new(),
    };

    if action == WatchAction::Moved {
        if matches!(
            event.kind,
            EventKind::Modify(ModifyKind::Name(RenameMode::Both))
        ) && event.paths.len() == 2
        {
            if let (Some(old), Some(new)) = (
                relative_str(root, &event.paths[0]),
                relative_str(root, &event.paths[1]),
            ) {
                return vec![WatchEvent {
                    action: WatchAction::Moved,
                    root: root.to_path_buf(),
                    path: new,
                    old_path: Some(old),
                }];
            }
        }
        // One-sided rename: the path either appeared or vanished here, which
        // is all a downstream consumer can act on anyway.
        return per_path_events(root, event, WatchAction::Modified);
    }

    per_path_events(root, event, action)
}

fn per_path_events(root: &Path, event: &Event, action: WatchAction) -> Vec<WatchEvent> {
    let mut events = Vec::with_capacity(event.paths.len());
    for path in &event.paths {
        match relative_str(root, path) {
            Some(rel) => events.push(WatchEvent {
                action,
                root: root.to_path_buf(),
                path: rel,
                old_path: None,
            }),
            None => warn!(
                "could not relativize path {:?} against root {:?}",
                path, root
            ),
        }
    }
    events
}

/// Convert a path into a string relative to `root`, with forward slashes.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RenameMode};

    fn ev(kind: EventKind, paths: Vec<PathBuf>) -> Event {
        let mut event = Event::new(kind);
        event.paths = paths;
        event
    }

    #[test]
    fn create_maps_to_created_with_relative_path() {
        let root = PathBuf::from("/watched");
        let event = ev(
            EventKind::Create(CreateKind::File),
            vec!["/watched/src/foo.c".into()],
        );
        let out = translate(&root, &event);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].action, WatchAction::Created);
        assert_eq!(out[0].path, "src/foo.c");
        assert_eq!(out[0].old_path, None);
    }

    #[test]
    fn two_sided_rename_becomes_one_moved_event() {
        let root = PathBuf::from("/watched");
        let event = ev(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            vec!["/watched/old.c".into(), "/watched/new.c".into()],
        );
        let out = translate(&root, &event);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].action, WatchAction::Moved);
        assert_eq!(out[0].path, "new.c");
        assert_eq!(out[0].old_path.as_deref(), Some("old.c"));
    }

    #[test]
    fn access_events_are_ignored() {
        let root = PathBuf::from("/watched");
        let event = ev(
            EventKind::Access(notify::event::AccessKind::Read),
            vec!["/watched/foo.c".into()],
        );
        assert!(translate(&root, &event).is_empty());
    }

    #[test]
    fn paths_outside_the_root_are_dropped() {
        let root = PathBuf::from("/watched");
        let event = ev(
            EventKind::Create(CreateKind::File),
            vec!["/elsewhere/foo.c".into()],
        );
        assert!(translate(&root, &event).is_empty());
    }
}
