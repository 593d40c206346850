//! Configuration file watcher for hot reload.
//!
//! One watcher thread per store. The loop waits on filesystem notifications
//! with a bounded timeout, so a stop request is observed within one poll
//! interval. The notify handle lives inside the loop and is dropped on every
//! exit path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::store::ConfigStore;

/// Bounded wait on the notification channel.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(25);

/// A watcher that reloads a [`ConfigStore`] when its file is modified.
pub struct ConfigWatcher {
    store: Arc<ConfigStore>,
    stop: Arc<AtomicBool>,
}

/// Handle on a running watcher thread.
pub struct WatcherHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    /// Ask the watcher to stop. Observed at the next loop iteration.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the watcher and wait for its thread to exit.
    pub fn join(mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Config watcher thread panicked");
            }
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ConfigWatcher {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start watching in a dedicated thread.
    ///
    /// Failing to start the thread is logged; the store keeps serving its
    /// current snapshot either way.
    pub fn spawn(self) -> WatcherHandle {
        let stop = self.stop.clone();
        let thread = thread::Builder::new()
            .name("config-watcher".into())
            .spawn(move || self.run())
            .map_err(|e| tracing::error!(error = %e, "Could not start config watcher thread"))
            .ok();
        WatcherHandle { stop, thread }
    }

    /// Watch loop. Returns when stopped, when the notification channel
    /// closes, or when the watch cannot be established.
    pub fn run(self) {
        let path = self.store.path().to_path_buf();
        let Some(file_name) = path.file_name().map(OsString::from) else {
            tracing::error!(path = %path.display(), "Configuration path has no file name, not watching");
            return;
        };

        let (tx, rx) = mpsc::channel();
        let watcher = match open_watch(&path, tx) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "An error occurred while watching the configuration file"
                );
                return;
            }
        };
        tracing::info!(path = %path.display(), "Config watcher started");

        while !self.stop.load(Ordering::SeqCst) {
            match rx.recv_timeout(POLL_TIMEOUT) {
                Ok(Ok(event)) => {
                    if is_tracked_modification(&event, &file_name) {
                        tracing::info!(path = %path.display(), "Config file change detected, reloading");
                        self.store.reload();
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Watch error");
                }
                Err(RecvTimeoutError::Timeout) => thread::yield_now(),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::warn!("Config watch channel closed");
                    break;
                }
            }
        }

        drop(watcher);
        tracing::info!(path = %path.display(), "Config watcher stopped");
    }
}

/// Watch the parent directory so replace-by-rename saves are seen too.
fn open_watch(
    path: &Path,
    tx: mpsc::Sender<notify::Result<Event>>,
) -> notify::Result<RecommendedWatcher> {
    let directory = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })?;
    watcher.watch(&directory, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Only modifications of the tracked file count. Rescan (overflow)
/// notifications are ignored.
fn is_tracked_modification(event: &Event, file_name: &OsString) -> bool {
    if event.need_rescan() {
        return false;
    }
    matches!(event.kind, EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
