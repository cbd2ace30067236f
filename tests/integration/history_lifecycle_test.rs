//! End-to-end behaviour of the history store: capture, dedup, favorites,
//! search and clearing.

use super::{at, memory_store};
use chrono::Duration;
use clip_history::clipboard::{ClipboardEvent, ClipboardSink, ClipboardSource, ClipboardWatcher};
use clip_history::history::{format_status, HistoryError, HistoryFilter, RetentionPolicy};

fn contents(filter: &HistoryFilter, store: &clip_history::HistoryStore) -> Vec<String> {
    store
        .query(filter)
        .map(|entry| entry.content.clone())
        .collect()
}

#[test]
fn test_hello_world_scenario() {
    let (mut store, _storage) = memory_store(RetentionPolicy::default());

    store.insert("hello", at(1));
    store.insert("world", at(2));
    store.insert("world", at(3));

    assert_eq!(contents(&HistoryFilter::all(), &store), vec!["world", "hello"]);
    assert_eq!(store.head().unwrap().captured_at, at(2));

    let hello = store.entries()[1].id;
    assert_eq!(store.toggle_favorite(hello), Some(true));

    assert_eq!(contents(&HistoryFilter::favorites(), &store), vec!["hello"]);
    assert_eq!(
        contents(&HistoryFilter::all().with_search("WOR"), &store),
        vec!["world"]
    );
    assert_eq!(format_status(store.stats(), false), "2 items · 1 favorites");
}

#[test]
fn test_dedup_is_head_only() {
    let (mut store, _storage) = memory_store(RetentionPolicy::default());

    store.insert("a", at(1));
    store.insert("b", at(2));
    let repeated = store.insert("a", at(3));

    assert!(repeated.is_some());
    assert_eq!(contents(&HistoryFilter::all(), &store), vec!["a", "b", "a"]);
}

#[test]
fn test_filter_composition() {
    let (mut store, _storage) = memory_store(RetentionPolicy::default());

    let foo_fav = store.insert("Foo bar", at(1)).unwrap();
    store.insert("foo baz", at(2));
    let other_fav = store.insert("qux", at(3)).unwrap();
    store.toggle_favorite(foo_fav);
    store.toggle_favorite(other_fav);

    let filter = HistoryFilter::favorites().with_search("foo");
    assert_eq!(contents(&filter, &store), vec!["Foo bar"]);

    // Whitespace-only search text is no filter at all
    let filter = HistoryFilter::all().with_search("   ");
    assert_eq!(store.query(&filter).count(), 3);
}

#[test]
fn test_delete_and_clear_all() {
    let (mut store, storage) = memory_store(RetentionPolicy::default());

    let first = store.insert("first", at(1)).unwrap();
    let second = store.insert("second", at(2)).unwrap();
    store.toggle_favorite(second);

    assert!(store.delete(first));
    assert!(!store.delete(first));
    assert_eq!(store.len(), 1);

    store.clear_all();
    assert!(store.is_empty());
    assert!(storage.snapshot().is_empty());
    assert_eq!(format_status(store.stats(), false), "Empty");
}

#[test]
fn test_mutations_on_removed_entry_are_noops() {
    let (mut store, storage) = memory_store(RetentionPolicy::default());

    let id = store.insert("gone soon", at(1)).unwrap();
    store.delete(id);
    let saves = storage.save_count();

    assert_eq!(store.toggle_favorite(id), None);
    assert!(!store.delete(id));
    assert_eq!(storage.save_count(), saves);
}

#[test]
fn test_failed_saves_keep_memory_state() {
    let (mut store, storage) = memory_store(RetentionPolicy::default());
    storage.set_fail_saves(true);

    store.insert("kept", at(1));
    assert_eq!(store.len(), 1);
    assert!(storage.snapshot().is_empty());

    storage.set_fail_saves(false);
    store.insert("saved", at(2));
    assert_eq!(storage.snapshot().len(), 2);
}

#[test]
fn test_age_eviction_spares_favorites() {
    let policy = RetentionPolicy {
        max_entries: 10,
        max_age: Duration::days(7),
    };
    let (mut store, _storage) = memory_store(policy);

    let old_favorite = store.insert("pinned", at(0)).unwrap();
    store.toggle_favorite(old_favorite);
    store.insert("stale", at(1));

    let later = at(0) + Duration::days(8);
    assert_eq!(store.prune(later), 1);
    assert_eq!(contents(&HistoryFilter::all(), &store), vec!["pinned"]);
}

struct ScriptedClipboard {
    reads: Vec<Option<String>>,
    written: Vec<String>,
}

impl ClipboardSource for ScriptedClipboard {
    fn read_text(&mut self) -> Result<Option<String>, HistoryError> {
        if self.reads.is_empty() {
            return Ok(None);
        }
        Ok(self.reads.remove(0))
    }
}

impl ClipboardSink for ScriptedClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), HistoryError> {
        self.written.push(text.to_string());
        Ok(())
    }
}

#[test]
fn test_watcher_feeds_store() {
    let (mut store, _storage) = memory_store(RetentionPolicy::default());
    let mut clipboard = ScriptedClipboard {
        reads: vec![
            Some("one".to_string()),
            Some("one".to_string()),
            None,
            Some("two".to_string()),
        ],
        written: Vec::new(),
    };
    let mut watcher = ClipboardWatcher::default();

    let events: Vec<ClipboardEvent> = (0..4)
        .filter_map(|_| watcher.poll_once(&mut clipboard))
        .collect();
    for event in &events {
        store.insert(&event.text, event.observed_at);
    }

    assert_eq!(contents(&HistoryFilter::all(), &store), vec!["two", "one"]);

    // Copying an older entry back does not reorder the history
    let one = store.entries()[1].id;
    assert!(store.copy_to_clipboard(one, &mut clipboard));
    assert_eq!(clipboard.written, vec!["one"]);
    assert_eq!(contents(&HistoryFilter::all(), &store), vec!["two", "one"]);
}
