//! Clipboard history tracker
//!
//! This crate records text copied to the system clipboard into a bounded,
//! newest-first history, keeps favorite entries pinned, and persists the
//! history as JSON so it survives restarts.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **history**: The history store, retention rules, search filter, JSON
//!   persistence and display helpers
//! - **clipboard**: Clipboard access traits, the polling watcher and the
//!   system clipboard backend (feature `system-clipboard`)
//! - **config**: User settings loaded from JSON and merged with defaults
//!
//! # Capture Flow
//!
//! 1. The watcher polls a [`clipboard::ClipboardSource`] and emits an event
//!    when the text changes
//! 2. [`HistoryStore::insert`] drops blank text and repeats of the head entry
//! 3. The new entry goes to the front and the retention policy is applied
//! 4. The history is saved, on a background thread when wrapped in
//!    [`history::QueuedStorage`]
//!
//! # Retention
//!
//! Entries older than `maxAgeDays` are removed, then the oldest entries are
//! dropped until at most `maxEntries` remain. Favorites are never removed
//! by either rule, so a history full of favorites may exceed the limit.
//!
//! # Usage
//!
//! ```
//! use chrono::Utc;
//! use clip_history::{HistoryFilter, HistoryStore, MemoryStorage, RetentionPolicy};
//!
//! let mut store = HistoryStore::open(MemoryStorage::new(), RetentionPolicy::default(), Utc::now());
//! store.insert("hello", Utc::now());
//! store.insert("world", Utc::now());
//! store.insert("world", Utc::now());
//!
//! let contents: Vec<&str> = store
//!     .query(&HistoryFilter::all())
//!     .map(|entry| entry.content.as_str())
//!     .collect();
//! assert_eq!(contents, vec!["world", "hello"]);
//! ```

pub mod clipboard;
pub mod config;
pub mod history;

pub use config::{load_config, load_config_file, ClipHistoryConfig, ConfigError};
pub use history::{
    ClipEntry, ContentKind, EntryId, HistoryError, HistoryFilter, HistoryStats, HistoryStore,
    JsonFileStorage, MemoryStorage, QueuedStorage, RetentionPolicy,
};
