use chrono::{DateTime, Utc};
use notify_debouncer_full::{
    new_debouncer,
    notify::{RecommendedWatcher, RecursiveMode, Watcher},
    DebounceEventResult, DebouncedEvent, Debouncer, FileIdMap,
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::state::ProxyState;

/// Directories whose changes never trigger a reload
pub const IGNORED_DIRS: &[&str] = &["target", "node_modules", ".git"];

/// Pushed to connected clients when watched sources change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReloadEvent {
    pub paths: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

pub fn is_ignored(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => IGNORED_DIRS.iter().any(|dir| name == *dir),
        _ => false,
    })
}

/// Paths touched by create, modify or remove events, outside ignored directories.
pub fn relevant_paths(events: &[DebouncedEvent]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = events
        .iter()
        .filter(|e| e.kind.is_create() || e.kind.is_modify() || e.kind.is_remove())
        .flat_map(|e| e.paths.iter().cloned())
        .filter(|p| !is_ignored(p))
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Debounced recursive watch; stops when dropped.
pub struct SourceWatcher {
    _debouncer: Debouncer<RecommendedWatcher, FileIdMap>,
    task: JoinHandle<()>,
}

impl SourceWatcher {
    pub fn start(path: &Path, debounce: Duration, state: ProxyState) -> Result<Self> {
        tracing::info!(path = %path.display(), "Starting source watcher");

        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let paths = relevant_paths(&events);
                    if !paths.is_empty() {
                        if let Err(e) = tx.send(paths) {
                            tracing::error!("Failed to forward change event: {}", e);
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        tracing::error!("Source watch error: {:?}", error);
                    }
                }
            }
        })?;

        debouncer.watcher().watch(path, RecursiveMode::Recursive)?;

        let task = tokio::spawn(async move {
            while let Some(paths) = rx.recv().await {
                let event = state.publish_reload(
                    paths.iter().map(|p| p.display().to_string()).collect(),
                );
                tracing::info!(
                    changed = event.paths.len(),
                    clients = state.reload_clients(),
                    "Sources changed, reload pushed"
                );
            }
        });

        Ok(Self {
            _debouncer: debouncer,
            task,
        })
    }
}

impl Drop for SourceWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
