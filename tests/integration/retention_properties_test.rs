//! Property tests for the retention rules.

use super::{at, memory_store};
use chrono::Duration;
use clip_history::history::{HistoryFilter, RetentionPolicy};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Favorite(usize),
    Delete(usize),
    Advance(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..20).prop_map(Op::Insert),
        1 => (0usize..32).prop_map(Op::Favorite),
        1 => (0usize..32).prop_map(Op::Delete),
        1 => (0i64..3 * 24 * 60 * 60).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn bounded_count_evicts_oldest(max in 1usize..20, extra in 0usize..20) {
        let policy = RetentionPolicy { max_entries: max, max_age: Duration::days(7) };
        let (mut store, _storage) = memory_store(policy);

        let total = max + extra;
        for i in 0..total {
            store.insert(&format!("entry {}", i), at(i as i64));
        }

        let kept: Vec<String> = store
            .query(&HistoryFilter::all())
            .map(|entry| entry.content.clone())
            .collect();
        let expected: Vec<String> = (extra..total).rev().map(|i| format!("entry {}", i)).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn store_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let policy = RetentionPolicy { max_entries: 8, max_age: Duration::days(7) };
        let (mut store, storage) = memory_store(policy);
        let mut now = at(0);

        for op in ops {
            let pruned = match op {
                Op::Insert(n) => store.insert(&format!("text {}", n), now).is_some(),
                Op::Favorite(i) => {
                    if let Some(id) = store.entries().get(i).map(|entry| entry.id) {
                        store.toggle_favorite(id);
                    }
                    false
                }
                Op::Delete(i) => {
                    if let Some(id) = store.entries().get(i).map(|entry| entry.id) {
                        store.delete(id);
                    }
                    false
                }
                Op::Advance(secs) => {
                    now = now + Duration::seconds(secs);
                    store.prune(now);
                    true
                }
            };

            let entries = store.entries();

            // Newest first
            prop_assert!(entries
                .windows(2)
                .all(|pair| pair[0].captured_at >= pair[1].captured_at));

            // Persisted state mirrors memory after every mutation
            let saved: Vec<String> = storage.snapshot().into_iter().map(|entry| entry.content).collect();
            let current: Vec<String> = entries.iter().map(|entry| entry.content.clone()).collect();
            prop_assert_eq!(saved, current);

            // Unfavoriting does not evict, so the limits are checked after a prune
            if pruned {
                let favorites = entries.iter().filter(|entry| entry.is_favorite).count();
                prop_assert!(entries.len() <= policy.max_entries.max(favorites));
                prop_assert!(entries
                    .iter()
                    .all(|entry| entry.is_favorite || now - entry.captured_at <= policy.max_age));
            }
        }
    }
}
