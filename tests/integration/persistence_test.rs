//! File-backed persistence across store restarts.

use super::{at, TempHistory};
use clip_history::history::{
    HistoryFilter, HistoryStorage, HistoryStore, JsonFileStorage, QueuedStorage, RetentionPolicy,
};
use std::fs;

#[test]
fn test_round_trip_through_file() {
    let history = TempHistory::new();

    let mut store = history.open(RetentionPolicy::default(), at(0));
    store.insert("alpha", at(10));
    let beta = store.insert("beta", at(20)).unwrap();
    store.insert("gamma", at(30));
    store.toggle_favorite(beta);
    let saved: Vec<_> = store
        .entries()
        .iter()
        .map(|entry| (entry.content.clone(), entry.captured_at, entry.is_favorite))
        .collect();
    drop(store);

    let reopened = history.open(RetentionPolicy::default(), at(60));
    let loaded: Vec<_> = reopened
        .entries()
        .iter()
        .map(|entry| (entry.content.clone(), entry.captured_at, entry.is_favorite))
        .collect();

    assert_eq!(loaded, saved);
}

#[test]
fn test_clear_all_persists_empty_log() {
    let history = TempHistory::new();

    let mut store = history.open(RetentionPolicy::default(), at(0));
    let id = store.insert("secret", at(1)).unwrap();
    store.toggle_favorite(id);
    store.clear_all();
    drop(store);

    let raw = fs::read_to_string(&history.path).unwrap();
    assert_eq!(raw.trim(), "[]");

    let reopened = history.open(RetentionPolicy::default(), at(2));
    assert!(reopened.is_empty());
}

#[test]
fn test_missing_file_opens_empty_without_writing() {
    let history = TempHistory::new();

    let store = history.open(RetentionPolicy::default(), at(0));

    assert!(store.is_empty());
    assert!(!history.path.exists());
}

#[test]
fn test_malformed_file_opens_empty() {
    let history = TempHistory::new();
    fs::create_dir_all(history.path.parent().unwrap()).unwrap();
    fs::write(&history.path, "{ not json").unwrap();

    let mut store = history.open(RetentionPolicy::default(), at(0));
    assert!(store.is_empty());

    // The next mutation replaces the damaged file
    store.insert("fresh", at(1));
    drop(store);
    let reopened = history.open(RetentionPolicy::default(), at(2));
    assert_eq!(reopened.head().unwrap().content, "fresh");
}

#[test]
fn test_legacy_pascal_case_file_loads() {
    let history = TempHistory::new();
    fs::create_dir_all(history.path.parent().unwrap()).unwrap();
    fs::write(
        &history.path,
        r#"[
            {"Content": "https://example.com", "Timestamp": "2023-11-14T22:13:20Z", "IsFavorite": true},
            {"Content": "plain", "Timestamp": "2023-11-14T22:13:10Z", "IsFavorite": false}
        ]"#,
    )
    .unwrap();

    let store = history.open(RetentionPolicy::default(), at(0));

    assert_eq!(store.len(), 2);
    let favorites: Vec<_> = store.query(&HistoryFilter::favorites()).collect();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].content, "https://example.com");
    assert_eq!(favorites[0].captured_at, at(0));
}

#[test]
fn test_open_prunes_expired_entries() {
    let history = TempHistory::new();

    let mut store = history.open(RetentionPolicy::default(), at(0));
    store.insert("old", at(0));
    drop(store);

    let week_and_a_day = 8 * 24 * 60 * 60;
    let reopened = history.open(RetentionPolicy::default(), at(week_and_a_day));
    assert!(reopened.is_empty());
}

#[test]
fn test_queued_storage_writes_in_order() {
    let history = TempHistory::new();

    let storage = QueuedStorage::new(JsonFileStorage::new(&history.path)).unwrap();
    let mut store = HistoryStore::open(storage, RetentionPolicy::default(), at(0));
    for i in 0..50 {
        store.insert(&format!("item {}", i), at(i));
    }
    // Dropping the store drains the writer
    drop(store);

    let loaded = JsonFileStorage::new(&history.path).load().unwrap();
    assert_eq!(loaded.len(), 50);
    assert_eq!(loaded[0].content, "item 49");
    assert_eq!(loaded[49].content, "item 0");
}
