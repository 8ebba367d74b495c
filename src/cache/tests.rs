use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::{TempDir, tempdir};

use super::{Cache, MAX_ITEM, MESSAGE_CACHE_KEY, MemoryCache, RecentMessages};
use crate::persistence::{MessageStore, Persistence, StoreResult, StoredMessage};

/// Store whose every `recent` call returns a different single message and
/// counts how often it was queried.
#[derive(Default)]
struct CountingStore {
    queries: AtomicUsize,
}

impl MessageStore for CountingStore {
    fn append(&self, text: &str) -> StoreResult<StoredMessage> {
        Ok(StoredMessage {
            text: text.to_string(),
            arrival_time: 0,
        })
    }

    fn recent(&self, _limit: usize) -> StoreResult<Vec<StoredMessage>> {
        let n = self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(vec![StoredMessage {
            text: format!("query-{n}"),
            arrival_time: n as i64,
        }])
    }
}

fn sled_backed() -> (RecentMessages, Arc<Persistence>, Arc<MemoryCache>, TempDir) {
    let dir = tempdir().unwrap();
    let store = Arc::new(Persistence::open(dir.path()).unwrap());
    let cache = Arc::new(MemoryCache::new());
    let recent = RecentMessages::new(cache.clone(), store.clone(), MAX_ITEM);
    (recent, store, cache, dir)
}

#[test]
fn test_put_if_absent_first_writer_wins() {
    let cache = MemoryCache::new();

    assert!(cache.put_if_absent("k", vec!["first".into()]));
    assert!(!cache.put_if_absent("k", vec!["second".into()]));
    assert_eq!(cache.get("k"), Some(vec!["first".to_string()]));
}

#[test]
fn test_invalidate_removes_entry() {
    let cache = MemoryCache::new();
    cache.put_if_absent("k", vec!["v".into()]);

    cache.invalidate("k");
    assert_eq!(cache.get("k"), None);

    // Invalidating a missing key is a no-op.
    cache.invalidate("k");
    assert!(cache.put_if_absent("k", vec!["again".into()]));
}

#[test]
fn test_miss_populates_then_hit_skips_store() {
    let store = Arc::new(CountingStore::default());
    let cache = Arc::new(MemoryCache::new());
    let recent = RecentMessages::new(cache.clone(), store.clone(), MAX_ITEM);

    let first = recent.fetch_recent().unwrap();
    let second = recent.fetch_recent().unwrap();

    assert_eq!(first, vec!["query-0"]);
    assert_eq!(second, first);
    assert_eq!(store.queries.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get(MESSAGE_CACHE_KEY), Some(first));
}

#[test]
fn test_invalidate_forces_reload() {
    let store = Arc::new(CountingStore::default());
    let recent = RecentMessages::new(Arc::new(MemoryCache::new()), store.clone(), MAX_ITEM);

    recent.fetch_recent().unwrap();
    recent.invalidate();
    let reloaded = recent.fetch_recent().unwrap();

    assert_eq!(reloaded, vec!["query-1"]);
    assert_eq!(store.queries.load(Ordering::SeqCst), 2);
}

#[test]
fn test_empty_store_is_cached_as_empty() {
    let (recent, store, cache, _dir) = sled_backed();

    assert!(recent.fetch_recent().unwrap().is_empty());
    assert_eq!(cache.get(MESSAGE_CACHE_KEY), Some(Vec::new()));

    store.append("late").unwrap();
    // Nothing invalidated the entry, so the empty list is still served.
    assert!(recent.fetch_recent().unwrap().is_empty());
}

#[test]
fn test_fetch_returns_most_recent_first() {
    let (recent, store, _cache, _dir) = sled_backed();

    for text in ["a", "b", "c"] {
        store.append(text).unwrap();
    }

    assert_eq!(recent.fetch_recent().unwrap(), vec!["c", "b", "a"]);
}

#[test]
fn test_fetch_never_exceeds_max_items() {
    let (recent, store, _cache, _dir) = sled_backed();

    for i in 0..(MAX_ITEM + 7) {
        store.append(&format!("msg{i}")).unwrap();
    }

    let texts = recent.fetch_recent().unwrap();
    let expected: Vec<String> = (7..MAX_ITEM + 7)
        .rev()
        .map(|i| format!("msg{i}"))
        .collect();
    assert_eq!(texts, expected);
}

#[test]
fn test_concurrent_population_converges_on_one_value() {
    let store = Arc::new(CountingStore::default());
    let recent = RecentMessages::new(Arc::new(MemoryCache::new()), store, MAX_ITEM);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let recent = recent.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                recent.fetch_recent().unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.iter().all(|r| r == &results[0]));
    assert_eq!(recent.fetch_recent().unwrap(), results[0]);
}
