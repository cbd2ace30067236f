//! The in-memory clipboard history and its retention policy.
//!
//! [`HistoryStore`] owns the newest-first log of entries. Every mutation is
//! followed by a save through the configured [`HistoryStorage`]; a failed
//! save is logged and the in-memory log stays authoritative.

use super::models::{ClipEntry, EntryId};
use super::search::{HistoryFilter, Matches};
use super::storage::HistoryStorage;
use crate::clipboard::ClipboardSink;
use chrono::{DateTime, Duration, Utc};

/// Default maximum number of entries kept in the history.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default maximum age of a non-favorite entry, in days.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Limits enforced by [`HistoryStore::prune`].
///
/// Favorites are exempt from both limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum number of entries.
    pub max_entries: usize,

    /// Entries older than this are removed.
    pub max_age: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
        }
    }
}

/// Entry counts shown in the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total: usize,
    pub favorites: usize,
}

/// Clipboard history with deduplication, eviction and persistence.
pub struct HistoryStore {
    entries: Vec<ClipEntry>,
    policy: RetentionPolicy,
    storage: Box<dyn HistoryStorage>,
}

impl HistoryStore {
    /// Loads the history from `storage` and prunes it at `now`.
    ///
    /// Load failures are not fatal: a missing, unreadable or malformed
    /// history is logged and replaced with an empty one.
    ///
    /// # Arguments
    ///
    /// * `storage` - Where the history is loaded from and saved to
    /// * `policy` - Count and age limits
    /// * `now` - Reference time for age-based pruning
    pub fn open(
        storage: impl HistoryStorage + 'static,
        policy: RetentionPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let loaded = match storage.load() {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Could not load clipboard history, starting empty: {}", err);
                Vec::new()
            }
        };

        let loaded_count = loaded.len();
        let entries: Vec<ClipEntry> = loaded
            .into_iter()
            .filter(|entry| !entry.content.trim().is_empty())
            .collect();
        if entries.len() < loaded_count {
            log::debug!(
                "Dropped {} blank entries from the stored history",
                loaded_count - entries.len()
            );
        }

        let mut store = Self {
            entries,
            policy,
            storage: Box::new(storage),
        };
        let expired = store.prune_entries(now);
        log::debug!(
            "Opened clipboard history with {} entries ({} pruned)",
            store.entries.len(),
            expired
        );
        store
    }

    /// Records newly observed clipboard text.
    ///
    /// Blank text and text identical to the current head entry are ignored.
    /// Only the head is compared: text that matches an older entry is added
    /// again at the front.
    ///
    /// # Returns
    ///
    /// The id of the new entry, or `None` if nothing was recorded. The new
    /// entry can itself be evicted when every other slot holds a favorite,
    /// in which case `None` is returned as well.
    pub fn insert(&mut self, text: &str, now: DateTime<Utc>) -> Option<EntryId> {
        if text.trim().is_empty() {
            log::trace!("Ignoring blank clipboard text");
            return None;
        }

        if self
            .entries
            .first()
            .is_some_and(|head| head.content == text)
        {
            log::trace!("Ignoring repeated clipboard text");
            return None;
        }

        let entry = ClipEntry::new(text, now);
        let id = entry.id;
        self.entries.insert(0, entry);
        self.prune_entries(now);
        self.persist();

        self.get(id).map(|entry| entry.id)
    }

    /// Enforces the retention policy at `now`.
    ///
    /// Removes every non-favorite entry older than the maximum age, then
    /// removes the oldest non-favorites until the count limit holds.
    /// Saves when anything was removed.
    ///
    /// # Returns
    ///
    /// The number of removed entries.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let removed = self.prune_entries(now);
        if removed > 0 {
            self.persist();
        }
        removed
    }

    fn prune_entries(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let max_age = self.policy.max_age;

        self.entries.retain(|entry| {
            entry.is_favorite || now.signed_duration_since(entry.captured_at) <= max_age
        });

        let mut excess = self.entries.len().saturating_sub(self.policy.max_entries);
        let mut index = self.entries.len();
        while excess > 0 && index > 0 {
            index -= 1;
            if !self.entries[index].is_favorite {
                self.entries.remove(index);
                excess -= 1;
            }
        }

        before - self.entries.len()
    }

    /// Flips the favorite flag of an entry.
    ///
    /// # Returns
    ///
    /// The new flag, or `None` if the entry no longer exists.
    pub fn toggle_favorite(&mut self, id: EntryId) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        entry.is_favorite = !entry.is_favorite;
        let is_favorite = entry.is_favorite;
        self.persist();
        Some(is_favorite)
    }

    /// Removes an entry, favorite or not.
    ///
    /// # Returns
    ///
    /// `true` if the entry existed. Deleting an unknown entry is not an
    /// error.
    pub fn delete(&mut self, id: EntryId) -> bool {
        let Some(position) = self.entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        self.entries.remove(position);
        self.persist();
        true
    }

    /// Removes every entry, including favorites, and saves the empty log.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Returns the entries matching `filter`, newest first.
    pub fn query(&self, filter: &HistoryFilter) -> Matches<'_> {
        Matches::new(&self.entries, filter)
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&ClipEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }

    /// The most recent entry.
    pub fn head(&self) -> Option<&ClipEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Counts all entries and favorites.
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total: self.entries.len(),
            favorites: self.entries.iter().filter(|entry| entry.is_favorite).count(),
        }
    }

    /// Puts an entry's text back on the clipboard.
    ///
    /// This is fire-and-forget: a clipboard failure is logged, not returned.
    /// The log is not reordered here; the watcher sees the new clipboard
    /// value like any other.
    ///
    /// # Returns
    ///
    /// `true` if the entry exists and the sink accepted the text.
    pub fn copy_to_clipboard(&self, id: EntryId, sink: &mut dyn ClipboardSink) -> bool {
        let Some(entry) = self.get(id) else {
            return false;
        };

        match sink.set_text(&entry.content) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Could not copy history entry to the clipboard: {}", err);
                false
            }
        }
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save(&self.entries) {
            log::warn!(
                "Could not save clipboard history ({} entries kept in memory): {}",
                self.entries.len(),
                err
            );
        }
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("entries", &self.entries)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
