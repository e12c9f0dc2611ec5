//! Bounded lazy-load decision cache
//!
//! Remembers which repositories returned a truncated listing, keyed by
//! repository and stamped with the last time each was seen. The map is
//! persisted as one JSON object (`{"owner/name": ms}`) under
//! [`HUGE_REPOS_KEY`] and is re-read from the store on every operation.
//! When a new repository arrives at capacity, the least recently seen entry
//! is evicted first.

pub mod entry;

use crate::clock::Clock;
use crate::store::{get_json, set_json, KeyValueStore, HUGE_REPOS_KEY};
use crate::types::Timestamp;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use entry::{is_plausible_timestamp, LazyLoadCacheEntry};

/// Default number of repositories remembered
pub const DEFAULT_CAPACITY: usize = 50;
/// Default tolerance for timestamps ahead of the local clock (one day)
pub const DEFAULT_MAX_FUTURE_SKEW_MS: i64 = 86_400_000;

/// Size and validity limits for [`LazyLoadCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub capacity: usize,
    pub max_future_skew_ms: i64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_future_skew_ms: DEFAULT_MAX_FUTURE_SKEW_MS,
        }
    }
}

pub struct LazyLoadCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl LazyLoadCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, policy: CachePolicy) -> Self {
        Self {
            store,
            clock,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Eager/lazy decision for one repository.
    ///
    /// A pull-request view always loads eagerly. Otherwise the global flag
    /// forces lazy loading, and failing that a valid cached entry does.
    pub fn should_lazy_load(&self, repo_key: &str, global_lazy_load: bool, is_pr_context: bool) -> bool {
        if is_pr_context {
            return false;
        }
        if global_lazy_load {
            return true;
        }
        self.contains_valid(repo_key)
    }

    pub fn contains_valid(&self, repo_key: &str) -> bool {
        self.load_valid().contains_key(repo_key)
    }

    /// Insert or refresh `repo_key`, evicting the least recently seen entry
    /// when a new key arrives at capacity.
    pub fn record_large(&self, repo_key: &str, now: Timestamp) {
        if self.policy.capacity == 0 {
            tracing::debug!(repo = repo_key, "Cache capacity is zero, not recording");
            return;
        }

        let _guard = self.write_lock.lock();
        let mut map = self.load_valid();
        if !map.contains_key(repo_key) {
            while map.len() >= self.policy.capacity {
                let Some(oldest) = Self::oldest_key(&map) else {
                    break;
                };
                tracing::debug!(repo = %oldest, "Evicting least recently seen repository");
                map.remove(&oldest);
            }
        }
        map.insert(repo_key.to_string(), now);
        tracing::info!(repo = repo_key, size = map.len(), "Recorded large repository");
        self.persist(&map);
    }

    /// Refresh an existing valid entry. Returns whether one was refreshed;
    /// unknown keys are never created.
    pub fn touch(&self, repo_key: &str, now: Timestamp) -> bool {
        let _guard = self.write_lock.lock();
        let mut map = self.load_valid();
        match map.get_mut(repo_key) {
            Some(last_seen_at) => {
                *last_seen_at = now;
                self.persist(&map);
                true
            }
            None => false,
        }
    }

    /// Number of valid entries
    pub fn size(&self) -> usize {
        self.load_valid().len()
    }

    /// Valid entries, most recently seen first.
    pub fn entries(&self) -> Vec<LazyLoadCacheEntry> {
        let mut entries: Vec<LazyLoadCacheEntry> = self
            .load_valid()
            .into_iter()
            .map(|(repo_key, last_seen_at)| LazyLoadCacheEntry::new(repo_key, last_seen_at))
            .collect();
        entries.sort_by(|a, b| {
            b.last_seen_at
                .cmp(&a.last_seen_at)
                .then_with(|| a.repo_key.cmp(&b.repo_key))
        });
        entries
    }

    /// Smallest timestamp; ties go to the smallest key.
    fn oldest_key(map: &BTreeMap<String, Timestamp>) -> Option<String> {
        map.iter()
            .min_by_key(|(_, last_seen_at)| **last_seen_at)
            .map(|(key, _)| key.clone())
    }

    /// Current map with invalid or non-integer values dropped.
    fn load_valid(&self) -> BTreeMap<String, Timestamp> {
        let raw: BTreeMap<String, serde_json::Value> =
            match get_json(self.store.as_ref(), HUGE_REPOS_KEY) {
                Ok(Some(raw)) => raw,
                Ok(None) => return BTreeMap::new(),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read lazy-load cache, treating as empty");
                    return BTreeMap::new();
                }
            };

        let now = self.clock.now_ms();
        raw.into_iter()
            .filter_map(|(key, value)| {
                let ts = value.as_i64()?;
                is_plausible_timestamp(ts, now, self.policy.max_future_skew_ms).then_some((key, ts))
            })
            .collect()
    }

    fn persist(&self, map: &BTreeMap<String, Timestamp>) {
        if let Err(e) = set_json(self.store.as_ref(), HUGE_REPOS_KEY, map) {
            tracing::warn!(error = %e, "Failed to persist lazy-load cache");
            return;
        }
        if let Err(e) = self.store.flush() {
            tracing::warn!(error = %e, "Failed to flush lazy-load cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StorageError;
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    const NOW: Timestamp = 1_700_000_000_000;

    fn cache_with(capacity: usize) -> (LazyLoadCache, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(NOW));
        let policy = CachePolicy {
            capacity,
            ..CachePolicy::default()
        };
        let cache = LazyLoadCache::new(store.clone(), clock.clone(), policy);
        (cache, store, clock)
    }

    /// Store whose reads and writes always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }
        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_should_lazy_load_truth_table() {
        let (cache, _, _) = cache_with(DEFAULT_CAPACITY);
        cache.record_large("big/repo", NOW);

        // PR context wins over everything
        assert!(!cache.should_lazy_load("big/repo", true, true));
        assert!(!cache.should_lazy_load("small/repo", true, true));
        // global flag forces lazy
        assert!(cache.should_lazy_load("small/repo", true, false));
        // cached and valid
        assert!(cache.should_lazy_load("big/repo", false, false));
        // never observed
        assert!(!cache.should_lazy_load("small/repo", false, false));
    }

    #[test]
    fn test_record_refreshes_existing_key() {
        let (cache, _, _) = cache_with(2);
        cache.record_large("a/a", NOW - 10);
        cache.record_large("b/b", NOW - 5);
        cache.record_large("a/a", NOW);
        assert_eq!(cache.size(), 2);
        assert_eq!(cache.entries()[0], LazyLoadCacheEntry::new("a/a", NOW));
    }

    #[test]
    fn test_new_key_at_capacity_evicts_oldest() {
        let (cache, _, _) = cache_with(2);
        cache.record_large("a/a", NOW - 10);
        cache.record_large("b/b", NOW - 20);
        cache.record_large("c/c", NOW);
        assert_eq!(cache.size(), 2);
        assert!(!cache.contains_valid("b/b"));
        assert!(cache.contains_valid("a/a"));
        assert!(cache.contains_valid("c/c"));
    }

    #[test]
    fn test_eviction_ties_go_to_smallest_key() {
        let (cache, _, _) = cache_with(2);
        cache.record_large("zed/repo", NOW - 1);
        cache.record_large("abc/repo", NOW - 1);
        cache.record_large("new/repo", NOW);
        assert!(!cache.contains_valid("abc/repo"));
        assert!(cache.contains_valid("zed/repo"));
    }

    #[test]
    fn test_touch_never_creates() {
        let (cache, _, _) = cache_with(DEFAULT_CAPACITY);
        assert!(!cache.touch("ghost/repo", NOW));
        assert_eq!(cache.size(), 0);

        cache.record_large("real/repo", NOW - 100);
        assert!(cache.touch("real/repo", NOW));
        assert_eq!(cache.entries(), vec![LazyLoadCacheEntry::new("real/repo", NOW)]);
    }

    #[test]
    fn test_touch_protects_from_eviction() {
        let (cache, _, _) = cache_with(2);
        cache.record_large("old/one", NOW - 100);
        cache.record_large("mid/one", NOW - 50);
        cache.touch("old/one", NOW - 1);
        cache.record_large("new/one", NOW);
        assert!(cache.contains_valid("old/one"));
        assert!(!cache.contains_valid("mid/one"));
    }

    #[test]
    fn test_invalid_entries_are_absent() {
        let (cache, store, _) = cache_with(DEFAULT_CAPACITY);
        let far_future = NOW + DEFAULT_MAX_FUTURE_SKEW_MS + 1;
        let raw = serde_json::json!({
            "neg/repo": -5,
            "future/repo": far_future,
            "text/repo": "yesterday",
            "fine/repo": NOW - 1,
        });
        set_json(&*store, HUGE_REPOS_KEY, &raw).unwrap();

        assert_eq!(cache.size(), 1);
        assert!(cache.contains_valid("fine/repo"));
        assert!(!cache.should_lazy_load("neg/repo", false, false));
        assert!(!cache.should_lazy_load("future/repo", false, false));
        assert!(!cache.touch("text/repo", NOW));
    }

    #[test]
    fn test_invalid_entries_pruned_on_write() {
        let (cache, store, _) = cache_with(DEFAULT_CAPACITY);
        let raw = serde_json::json!({ "neg/repo": -5 });
        set_json(&*store, HUGE_REPOS_KEY, &raw).unwrap();

        cache.record_large("new/repo", NOW);
        let persisted: BTreeMap<String, i64> =
            get_json(&*store, HUGE_REPOS_KEY).unwrap().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted.get("new/repo"), Some(&NOW));
    }

    #[test]
    fn test_entry_becomes_valid_as_clock_catches_up() {
        let (cache, _, clock) = cache_with(DEFAULT_CAPACITY);
        let later = NOW + DEFAULT_MAX_FUTURE_SKEW_MS + 10;
        cache.record_large("early/repo", later);
        assert!(!cache.contains_valid("early/repo"));
        clock.set(later);
        assert!(cache.contains_valid("early/repo"));
    }

    #[test]
    fn test_garbage_document_reads_as_empty() {
        let (cache, store, _) = cache_with(DEFAULT_CAPACITY);
        store.set(HUGE_REPOS_KEY, b"[1, 2, 3]").unwrap();
        assert_eq!(cache.size(), 0);
        assert!(!cache.should_lazy_load("any/repo", false, false));
        // the next write replaces the garbage
        cache.record_large("any/repo", NOW);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_storage_failures_are_not_fatal() {
        let clock = Arc::new(ManualClock::new(NOW));
        let cache = LazyLoadCache::new(Arc::new(BrokenStore), clock, CachePolicy::default());
        cache.record_large("any/repo", NOW);
        assert!(!cache.touch("any/repo", NOW));
        assert_eq!(cache.size(), 0);
        assert!(!cache.should_lazy_load("any/repo", false, false));
        assert!(cache.should_lazy_load("any/repo", true, false));
    }

    #[test]
    fn test_state_shared_through_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(NOW));
        let first = LazyLoadCache::new(store.clone(), clock.clone(), CachePolicy::default());
        let second = LazyLoadCache::new(store, clock, CachePolicy::default());
        first.record_large("shared/repo", NOW);
        assert!(second.contains_valid("shared/repo"));
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let (cache, store, _) = cache_with(0);
        cache.record_large("any/repo", NOW);
        assert_eq!(cache.size(), 0);
        assert!(store.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_size_never_exceeds_capacity(
            capacity in 1usize..8,
            inserts in prop::collection::vec((0u8..16, 0i64..1_000), 0..64)
        ) {
            let (cache, _, _) = cache_with(capacity);
            for (repo, offset) in inserts {
                cache.record_large(&format!("owner/{}", repo), NOW - offset);
                prop_assert!(cache.size() <= capacity);
            }
        }

        #[test]
        fn prop_new_key_at_capacity_evicts_global_minimum(
            capacity in 1usize..8,
            stamps in prop::collection::btree_map(0u8..32, 0i64..1_000, 1..16)
        ) {
            let (cache, _, _) = cache_with(capacity);
            for (repo, offset) in &stamps {
                cache.record_large(&format!("owner/{}", repo), NOW - 1_000 + offset);
            }
            let before = cache.entries();
            prop_assume!(before.len() == capacity);

            let oldest = before
                .iter()
                .min_by(|a, b| a.last_seen_at.cmp(&b.last_seen_at).then_with(|| a.repo_key.cmp(&b.repo_key)))
                .map(|e| e.repo_key.clone())
                .unwrap();
            cache.record_large("fresh/repo", NOW);

            prop_assert_eq!(cache.size(), capacity);
            prop_assert!(!cache.contains_valid(&oldest));
            prop_assert!(cache.contains_valid("fresh/repo"));
        }
    }
}
