use super::support::{eventually, MemoryCache, MemoryIndex};
use planar::plane::ALL_SCOPE;
use planar::{CacheMode, Capability, PaginationOptions, Provider, Record, Wallet, WalletError};
use serde_json::json;

fn query() -> serde_json::Value {
    json!({"type": "VerifiableCredential"})
}

#[tokio::test]
async fn get_populates_cache_under_provider_scope() {
    let cache = MemoryCache::default();
    let index = MemoryIndex::with(vec![json!({"id": "a"})]);
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(index.clone()),
    ]);

    let records = wallet
        .indexing()
        .provider("Cloud")
        .unwrap()
        .get(&query(), CacheMode::CacheFirst)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(cache.index("Cloud", &query()).map(|r| r.len()), Some(1));
    assert_eq!(index.read_count(), 1);
}

#[tokio::test]
async fn cache_first_hit_is_served_then_refreshed() {
    let cache = MemoryCache::default();
    cache.put_index("Cloud", &query(), vec![Record::new(json!({"id": "stale"}))]);
    let index = MemoryIndex::with(vec![json!({"id": "a"}), json!({"id": "b"})]);
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(index.clone()),
    ]);

    let records = wallet
        .indexing()
        .provider("Cloud")
        .unwrap()
        .get(&query(), CacheMode::CacheFirst)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), Some("stale"));
    assert!(eventually(|| cache.index("Cloud", &query()).map(|r| r.len()) == Some(2)).await);
}

#[tokio::test]
async fn cache_only_index_read_without_cache_is_unavailable() {
    let wallet = Wallet::new(vec![Provider::new("Cloud").with_indexing(MemoryIndex::default())]);

    let handle = wallet.indexing().provider("Cloud").unwrap();
    assert!(matches!(
        handle.get(&query(), CacheMode::CacheOnly).await,
        Err(WalletError::CapabilityUnavailable { .. })
    ));
    assert!(matches!(
        wallet.indexing().all().get(&query(), CacheMode::CacheOnly).await,
        Err(WalletError::CapabilityUnavailable { .. })
    ));
}

#[tokio::test]
async fn cache_only_miss_reads_through_and_populates_cache() {
    let cache = MemoryCache::default();
    let index = MemoryIndex::with(vec![json!({"id": "a"})]);
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(index.clone()),
    ]);

    let records = wallet
        .indexing()
        .provider("Cloud")
        .unwrap()
        .get(&query(), CacheMode::CacheOnly)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(index.read_count(), 1);
    assert_eq!(cache.index("Cloud", &query()).map(|r| r.len()), Some(1));

    let union = wallet
        .indexing()
        .all()
        .get(&query(), CacheMode::CacheOnly)
        .await
        .unwrap();
    assert_eq!(union.len(), 1);
    assert_eq!(index.read_count(), 2);
    assert_eq!(cache.index(ALL_SCOPE, &query()).map(|r| r.len()), Some(1));
}

#[tokio::test]
async fn writes_flush_cached_index_before_delegating() {
    let cache = MemoryCache::default();
    cache.put_index("Cloud", &query(), vec![Record::new(json!({"id": "a"}))]);
    cache.put_index(ALL_SCOPE, &query(), vec![Record::new(json!({"id": "a"}))]);
    let index = MemoryIndex::with(vec![json!({"id": "a"})]).gated();
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(index.clone()),
    ]);

    let task_wallet = wallet.clone();
    let write = tokio::spawn(async move {
        task_wallet
            .indexing()
            .provider("Cloud")
            .unwrap()
            .add(&json!({"id": "b"}), CacheMode::CacheFirst)
            .await
    });

    index.entered.notified().await;
    assert!(cache.index_is_empty());
    assert_eq!(index.len(), 1);

    index.release.notify_one();
    assert!(write.await.unwrap().unwrap());
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn failed_write_leaves_cache_empty() {
    let cache = MemoryCache::default();
    cache.put_index("Cloud", &query(), vec![Record::new(json!({"id": "a"}))]);
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(MemoryIndex::default().failing()),
    ]);

    let handle = wallet.indexing().provider("Cloud").unwrap();
    assert!(handle.remove("a", CacheMode::CacheFirst).await.is_err());
    assert!(cache.index_is_empty());
}

#[tokio::test]
async fn skip_cache_write_keeps_cached_index() {
    let cache = MemoryCache::default();
    cache.put_index("Cloud", &query(), vec![Record::new(json!({"id": "a"}))]);
    let index = MemoryIndex::with(vec![json!({"id": "a", "title": "old"})]);
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(index.clone()),
    ]);

    let handle = wallet.indexing().provider("Cloud").unwrap();
    assert!(handle
        .update("a", &json!({"title": "new"}), CacheMode::SkipCache)
        .await
        .unwrap());
    assert!(cache.index("Cloud", &query()).is_some());
}

#[tokio::test]
async fn update_remove_and_remove_all_invalidate() {
    let cache = MemoryCache::default();
    let index = MemoryIndex::with(vec![json!({"id": "a"}), json!({"id": "b"})]);
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(index.clone()),
    ]);
    let handle = wallet.indexing().provider("Cloud").unwrap();

    handle.get(&query(), CacheMode::CacheFirst).await.unwrap();
    assert!(!cache.index_is_empty());
    assert!(handle.update("a", &json!({"title": "x"}), CacheMode::CacheFirst).await.unwrap());
    assert!(cache.index_is_empty());

    handle.get(&query(), CacheMode::CacheFirst).await.unwrap();
    assert!(handle.remove("b", CacheMode::CacheFirst).await.unwrap());
    assert!(cache.index_is_empty());

    handle.get(&query(), CacheMode::CacheFirst).await.unwrap();
    assert!(handle.remove_all(CacheMode::CacheFirst).await.unwrap());
    assert!(cache.index_is_empty());
    assert_eq!(index.len(), 0);
}

#[tokio::test]
async fn union_keeps_structurally_equal_records_from_different_providers() {
    let wallet = Wallet::new(vec![
        Provider::new("Cloud").with_indexing(MemoryIndex::with(vec![json!({"id": "a"})])),
        Provider::new("Local").with_indexing(MemoryIndex::with(vec![json!({"id": "a"})])),
    ]);

    let records = wallet
        .indexing()
        .all()
        .get(&query(), CacheMode::SkipCache)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn union_collapses_shared_records() {
    let shared = MemoryIndex::with(vec![json!({"id": "a"})]);
    let wallet = Wallet::new(vec![
        Provider::new("Cloud").with_indexing(shared.clone()),
        Provider::new("Mirror").with_indexing(shared.clone()),
    ]);

    let records = wallet
        .indexing()
        .all()
        .get(&query(), CacheMode::SkipCache)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn union_preserves_provider_order_and_caches_under_all() {
    let cache = MemoryCache::default();
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(MemoryIndex::with(vec![json!({"id": "1"})])),
        Provider::new("Local").with_indexing(MemoryIndex::with(vec![json!({"id": "2"}), json!({"id": "3"})])),
    ]);

    let records = wallet
        .indexing()
        .all()
        .get(&query(), CacheMode::CacheFirst)
        .await
        .unwrap();

    let ids: Vec<_> = records.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(cache.index(ALL_SCOPE, &query()).map(|r| r.len()), Some(3));
}

#[tokio::test]
async fn union_tolerates_partial_failure() {
    let wallet = Wallet::new(vec![
        Provider::new("Broken").with_indexing(MemoryIndex::default().failing()),
        Provider::new("Local").with_indexing(MemoryIndex::with(vec![json!({"id": "2"})])),
    ]);

    let records = wallet
        .indexing()
        .all()
        .get(&query(), CacheMode::SkipCache)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn union_fails_when_every_provider_fails() {
    let wallet = Wallet::new(vec![
        Provider::new("A").with_indexing(MemoryIndex::default().failing()),
        Provider::new("B").with_indexing(MemoryIndex::default().failing()),
    ]);

    match wallet.indexing().all().get(&query(), CacheMode::SkipCache).await {
        Err(WalletError::AggregateFailure { capability, errors }) => {
            assert_eq!(capability, Capability::Indexing);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected aggregate failure, got {:?}", other),
    }
}

#[tokio::test]
async fn union_over_no_providers_is_empty() {
    let records = Wallet::default()
        .indexing()
        .all()
        .get(&query(), CacheMode::SkipCache)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn pages_are_cached_per_options() {
    let cache = MemoryCache::default();
    let index = MemoryIndex::with(vec![json!({"id": "1"}), json!({"id": "2"}), json!({"id": "3"})]);
    let wallet = Wallet::new(vec![
        Provider::new("Cache").with_caching(cache.clone()),
        Provider::new("Cloud").with_indexing(index.clone()),
    ]);
    let handle = wallet.indexing().provider("Cloud").unwrap();
    let options = PaginationOptions {
        limit: 2,
        cursor: None,
    };

    let first = handle.get_page(&query(), &options, CacheMode::CacheFirst).await.unwrap();
    assert_eq!(first.records.len(), 2);
    assert!(first.has_more);
    assert_eq!(first.cursor.as_deref(), Some("2"));
    assert_eq!(index.read_count(), 1);

    let cached = handle.get_page(&query(), &options, CacheMode::CacheOnly).await.unwrap();
    assert_eq!(cached.records.len(), 2);
    assert_eq!(index.read_count(), 1);

    let next = PaginationOptions {
        limit: 2,
        cursor: first.cursor.clone(),
    };
    let second = handle.get_page(&query(), &next, CacheMode::SkipCache).await.unwrap();
    assert_eq!(second.records.len(), 1);
    assert!(!second.has_more);
}

#[tokio::test]
async fn count_and_unsupported_batch_add() {
    let index = MemoryIndex::with(vec![json!({"id": "1"}), json!({"id": "2"})]);
    let wallet = Wallet::new(vec![Provider::new("Cloud").with_indexing(index)]);
    let handle = wallet.indexing().provider("Cloud").unwrap();

    assert_eq!(handle.get_count(&query()).await.unwrap(), 2);
    assert!(matches!(
        handle.add_many(&[json!({"id": "3"})], CacheMode::CacheFirst).await,
        Err(WalletError::Provider(planar::ProviderError::Unsupported("addMany")))
    ));
}
