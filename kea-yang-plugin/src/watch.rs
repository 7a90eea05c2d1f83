//! Change notifications for file-backed snapshots.
//!
//! The snapshot's parent directory is watched rather than the file itself,
//! since editors often replace the file instead of writing it in place.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};
use yang_tree_core::SnapshotStore;

use crate::delivery::ConfigSink;
use crate::plugin::Plugin;

/// Events arriving within this window after a change are folded into it.
const SETTLE: Duration = Duration::from_millis(200);
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// True when `event` modifies or creates the file named `file_name`.
pub fn is_change(event: &Event, file_name: &OsStr) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name))
}

/// Run `on_change` once per burst of matching events until the sender
/// side of `events` goes away. Returns how many changes were handled.
pub fn handle_events<K: ConfigSink>(
    plugin: &mut Plugin<K>,
    store: &mut SnapshotStore,
    events: &Receiver<notify::Result<Event>>,
    file_name: &OsStr,
) -> usize {
    let mut handled = 0;
    while let Ok(received) = events.recv() {
        let event = match received {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "watch error");
                continue;
            }
        };
        if !is_change(&event, file_name) {
            continue;
        }

        let mut closed = false;
        loop {
            match events.recv_timeout(SETTLE) {
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    closed = true;
                    break;
                }
            }
        }

        match plugin.on_change(store) {
            Ok(outcome) => debug!(?outcome, "change handled"),
            Err(err) => error!(error = %err, "failed to deliver configuration"),
        }
        handled += 1;
        if closed {
            break;
        }
    }
    handled
}

/// Watch the snapshot behind `store` and re-deliver on every change.
/// Blocks until the watcher shuts down.
pub fn watch_snapshot<K: ConfigSink>(
    plugin: &mut Plugin<K>,
    store: &mut SnapshotStore,
) -> Result<()> {
    let snapshot = store.path().to_path_buf();
    let file_name = snapshot
        .file_name()
        .with_context(|| format!("snapshot path {} has no file name", snapshot.display()))?
        .to_os_string();
    let dir = match snapshot.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (tx, rx) = mpsc::channel();
    let config = Config::default().with_poll_interval(POLL_INTERVAL);
    let mut watcher =
        RecommendedWatcher::new(tx, config).context("failed to create file watcher")?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;
    info!(snapshot = %snapshot.display(), "watching snapshot for changes");

    let handled = handle_events(plugin, store, &rx, &file_name);
    info!(changes = handled, "snapshot watcher stopped");
    Ok(())
}
