//! Background polling of a clipboard source.
//!
//! The watcher runs on its own thread, reads the clipboard every poll
//! interval and sends a [`ClipboardEvent`] whenever the text changes.
//! Non-text contents and read errors are skipped.

use super::{ClipboardEvent, ClipboardSource};
use crate::history::HistoryError;
use chrono::Utc;
use crossbeam::channel::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default delay between two clipboard reads.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Detects clipboard text changes.
#[derive(Debug, Clone)]
pub struct ClipboardWatcher {
    poll_interval: Duration,
    last_text: Option<String>,
}

impl Default for ClipboardWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl ClipboardWatcher {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            last_text: None,
        }
    }

    /// Treats `text` as already seen, e.g. the head of a freshly loaded
    /// history, so it is not reported again on startup.
    pub fn with_last_text(mut self, text: Option<String>) -> Self {
        self.last_text = text;
        self
    }

    /// Reads `source` once and returns an event if the text changed since
    /// the previous read.
    pub fn poll_once(&mut self, source: &mut dyn ClipboardSource) -> Option<ClipboardEvent> {
        let text = match source.read_text() {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                log::debug!("Clipboard read failed: {}", err);
                return None;
            }
        };

        if self.last_text.as_deref() == Some(text.as_str()) {
            return None;
        }

        self.last_text = Some(text.clone());
        Some(ClipboardEvent {
            text,
            observed_at: Utc::now(),
        })
    }

    /// Starts polling `source` on a background thread, sending every change
    /// on `events`.
    ///
    /// The thread ends when the returned handle is stopped or dropped, or
    /// when the receiving side of `events` is dropped.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the thread cannot be spawned.
    pub fn spawn<S>(self, source: S, events: Sender<ClipboardEvent>) -> Result<WatcherHandle, HistoryError>
    where
        S: ClipboardSource + 'static,
    {
        let (stop_sender, stop_receiver) = channel::bounded::<()>(1);
        let mut watcher = self;
        let mut source = source;

        let thread = thread::Builder::new()
            .name("clip-history-watcher".to_string())
            .spawn(move || loop {
                if let Some(event) = watcher.poll_once(&mut source) {
                    if events.send(event).is_err() {
                        log::debug!("Clipboard event receiver dropped, stopping watcher");
                        break;
                    }
                }

                match stop_receiver.recv_timeout(watcher.poll_interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(WatcherHandle {
            stop: Some(stop_sender),
            thread: Some(thread),
        })
    }
}

/// Controls a running watcher thread.
#[derive(Debug)]
pub struct WatcherHandle {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    /// Stops the watcher and waits for its thread to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.try_send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Clipboard watcher thread panicked");
            }
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
