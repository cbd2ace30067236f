//! Clipboard access.
//!
//! The history never talks to the operating system directly. It receives
//! [`ClipboardEvent`]s produced by a [`watcher::ClipboardWatcher`] polling a
//! [`ClipboardSource`], and writes text back through a [`ClipboardSink`].
//! The `system-clipboard` feature provides [`SystemClipboard`], which
//! implements both on top of `arboard`.

pub mod watcher;

#[cfg(feature = "system-clipboard")]
pub mod system;

pub use watcher::{ClipboardWatcher, WatcherHandle, DEFAULT_POLL_INTERVAL};

#[cfg(feature = "system-clipboard")]
pub use system::SystemClipboard;

use crate::history::HistoryError;
use chrono::{DateTime, Utc};

/// New clipboard text was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEvent {
    /// The text currently on the clipboard.
    pub text: String,

    /// When the watcher saw it.
    pub observed_at: DateTime<Utc>,
}

/// Something the watcher can read clipboard text from.
pub trait ClipboardSource: Send {
    /// Returns the current clipboard text, or `None` when the clipboard
    /// holds something that is not text.
    fn read_text(&mut self) -> Result<Option<String>, HistoryError>;
}

/// Something clipboard text can be written to.
pub trait ClipboardSink {
    /// Replaces the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), HistoryError>;
}
