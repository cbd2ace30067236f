//! Data models for clipboard history.
//!
//! This module defines the core data structures for storing and managing
//! captured clipboard text.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Default number of characters shown by [`ClipEntry::preview`].
pub const DEFAULT_PREVIEW_LENGTH: usize = 80;

/// Minimum number of digits for content to be classified as a number.
const MIN_NUMBER_DIGITS: usize = 6;

/// In-memory handle for a single history entry.
///
/// Ids are generated when an entry is captured or loaded and are never
/// written to disk. They stay valid for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Creates a fresh, unique id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single captured clipboard value.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipEntry {
    /// Handle used by the view layer to refer to this entry.
    pub id: EntryId,

    /// The captured text, stored verbatim.
    pub content: String,

    /// When the text was observed on the clipboard.
    pub captured_at: DateTime<Utc>,

    /// Set only by explicit user action. Favorites never expire.
    pub is_favorite: bool,
}

impl ClipEntry {
    /// Creates a new, non-favorite entry captured at `captured_at`.
    pub fn new(content: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            content: content.into(),
            captured_at,
            is_favorite: false,
        }
    }

    /// Returns the first `max_chars` characters of the content, followed by
    /// `...` when the content is longer.
    ///
    /// # Arguments
    ///
    /// * `max_chars` - Number of characters kept before the ellipsis
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }

    /// Classifies the content by its shape.
    pub fn kind(&self) -> ContentKind {
        ContentKind::classify(&self.content)
    }

    /// Age of the entry relative to `now`. Never negative.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.captured_at)
            .max(chrono::Duration::zero())
    }

    /// Case-insensitive substring match against an already lowercased needle.
    pub(crate) fn contains_lowercase(&self, needle_lower: &str) -> bool {
        self.content.to_lowercase().contains(needle_lower)
    }
}

/// Coarse classification of clipboard text, used for icons and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Starts with `http://` or `https://`.
    Url,
    /// Exactly one `@` and at least one `.`.
    Email,
    /// Only ASCII digits, longer than five characters.
    Number,
    /// Anything else.
    Text,
}

impl ContentKind {
    /// Infers the kind from the shape of `content`. Rules are checked in
    /// declaration order.
    pub fn classify(content: &str) -> Self {
        if content.starts_with("http://") || content.starts_with("https://") {
            return ContentKind::Url;
        }

        if content.contains('.') && content.matches('@').count() == 1 {
            return ContentKind::Email;
        }

        if content.len() >= MIN_NUMBER_DIGITS && content.chars().all(|c| c.is_ascii_digit()) {
            return ContentKind::Number;
        }

        ContentKind::Text
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Url => "URL",
            ContentKind::Email => "Email",
            ContentKind::Number => "Number",
            ContentKind::Text => "Text",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// File I/O failed while reading or writing the history.
    #[error("History storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The history file could not be encoded or decoded.
    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No per-user data directory exists on this platform.
    #[error("Could not determine a per-user data directory for the history file")]
    StoragePathUnavailable,

    /// The system clipboard rejected a read or write.
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}
