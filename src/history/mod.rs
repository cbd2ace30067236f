//! Clipboard history tracking and persistence.
//!
//! This module keeps a bounded, newest-first log of captured clipboard text
//! and persists it across restarts.
//!
//! # Features
//!
//! - Head-only deduplication of repeated captures
//! - Count and age limits, with favorites exempt from both
//! - Case-insensitive search and a favorites filter
//! - JSON persistence with write-then-rename saves
//! - Optional background writer that keeps saves in order
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use clip_history::history::{HistoryFilter, HistoryStore, JsonFileStorage, RetentionPolicy};
//!
//! let storage = JsonFileStorage::new("/tmp/history.json");
//! let mut store = HistoryStore::open(storage, RetentionPolicy::default(), Utc::now());
//!
//! if let Some(id) = store.insert("hello", Utc::now()) {
//!     store.toggle_favorite(id);
//! }
//!
//! for entry in store.query(&HistoryFilter::favorites()) {
//!     println!("{}", entry.preview(80));
//! }
//! ```

pub mod models;
pub mod search;
pub mod storage;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use models::{ClipEntry, ContentKind, EntryId, HistoryError, DEFAULT_PREVIEW_LENGTH};
pub use search::{HistoryFilter, Matches};
pub use storage::{
    default_history_path, HistoryStorage, JsonFileStorage, MemoryStorage, QueuedStorage,
};
pub use store::{HistoryStats, HistoryStore, RetentionPolicy};
pub use ui::{format_entry_line, format_entry_list, format_relative_time, format_status};
