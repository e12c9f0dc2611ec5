use sidetree::cache::{CachePolicy, LazyLoadCache};
use sidetree::clock::ManualClock;
use sidetree::store::{KeyValueStore, SledStore, HUGE_REPOS_KEY};
use std::sync::Arc;
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000_000;

#[test]
fn test_cache_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store");
    let clock = Arc::new(ManualClock::new(NOW));
    {
        let store = Arc::new(SledStore::open(&path).unwrap());
        let cache = LazyLoadCache::new(store, clock.clone(), CachePolicy::default());
        cache.record_large("octo/monorepo", NOW);
    }

    let store = Arc::new(SledStore::open(&path).unwrap());
    let raw = store.get(HUGE_REPOS_KEY).unwrap().unwrap();
    let map: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(map, serde_json::json!({ "octo/monorepo": NOW }));

    let cache = LazyLoadCache::new(store, clock, CachePolicy::default());
    assert!(cache.should_lazy_load("octo/monorepo", false, false));
}

#[test]
fn test_default_capacity_evicts_the_fifty_first() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SledStore::open(&temp_dir.path().join("store")).unwrap());
    let clock = Arc::new(ManualClock::new(NOW));
    let cache = LazyLoadCache::new(store, clock, CachePolicy::default());

    for i in 0..50 {
        cache.record_large(&format!("owner/repo{}", i), NOW - 1_000 + i);
    }
    assert_eq!(cache.size(), 50);

    cache.record_large("owner/newcomer", NOW);
    assert_eq!(cache.size(), 50);
    assert!(!cache.contains_valid("owner/repo0"));
    assert!(cache.contains_valid("owner/repo1"));
    assert!(cache.contains_valid("owner/newcomer"));
}

#[test]
fn test_concurrent_records_respect_capacity() {
    let store = Arc::new(sidetree::store::MemoryStore::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let policy = CachePolicy {
        capacity: 8,
        ..CachePolicy::default()
    };
    let cache = Arc::new(LazyLoadCache::new(store, clock, policy));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for i in 0..20 {
                    cache.record_large(&format!("t{}/r{}", t, i), NOW - 100 + i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.size(), 8);
}
