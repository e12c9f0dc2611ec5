use sidetree::cache::CachePolicy;
use sidetree::clock::ManualClock;
use sidetree::config::LocalConfig;
use sidetree::service::{DecisionReason, TreeService};
use sidetree::source::{LocalSource, StaticSource};
use sidetree::store::MemoryStore;
use sidetree::RepoRef;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000_000;

#[tokio::test]
async fn test_truncated_local_listing_switches_repository_to_lazy() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(temp_dir.path().join(name), "").unwrap();
    }
    let config = LocalConfig {
        max_entries: 2,
        include_hidden: true,
    };
    let source = LocalSource::new(temp_dir.path(), &config).unwrap();
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let service = TreeService::new(Arc::new(source), store, clock, CachePolicy::default());

    let repo = RepoRef::new("local", "big");
    assert!(service.should_load_entire_tree(&repo));

    let load = service.load_tree(&repo).await.unwrap();
    assert!(load.truncated);
    assert_eq!(load.nodes.len(), 2);

    assert!(!service.should_load_entire_tree(&repo));
    assert_eq!(service.decide(&repo).reason, DecisionReason::KnownLarge);
}

#[tokio::test]
async fn test_pull_request_view_stays_eager_for_large_repository() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let service = TreeService::new(
        Arc::new(StaticSource::new(vec!["x".to_string()]).truncated(true)),
        store,
        clock,
        CachePolicy::default(),
    );
    let repo = RepoRef::new("octo", "huge");
    service.load_tree(&repo).await.unwrap();

    let pr = repo.clone().with_pull_number(99);
    assert!(service.should_load_entire_tree(&pr));
    assert!(!service.should_load_entire_tree(&repo));
}

#[tokio::test]
async fn test_settings_shared_with_cache_store() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let service = TreeService::new(
        Arc::new(StaticSource::default()),
        store.clone(),
        clock,
        CachePolicy::default(),
    );
    service.settings().set_lazy_load(true).unwrap();
    service.cache().record_large("octo/cat", NOW);
    assert_eq!(store.len(), 2);
}
