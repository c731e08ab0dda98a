use super::support::{eventually, FailingRetrieval, GatedRetrieval, MemoryCache, StaticRetrieval};
use planar::{CacheMode, Capability, Provider, Wallet, WalletConfig, WalletError};
use serde_json::json;

fn cache_provider(cache: &MemoryCache) -> Provider {
    Provider::new("Cache").with_caching(cache.clone())
}

#[tokio::test]
async fn empty_uri_consults_no_provider() {
    let source = StaticRetrieval::with([("lc:1", json!({"id": "1"}))]);
    let wallet = Wallet::new(vec![Provider::new("Source").with_retrieval(source.clone())]);

    let result = wallet.retrieval().get("", CacheMode::CacheFirst).await.unwrap();

    assert!(result.is_none());
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn first_provider_with_an_answer_wins() {
    let wallet = Wallet::new(vec![
        Provider::new("Empty").with_retrieval(StaticRetrieval::default()),
        Provider::new("Broken").with_retrieval(FailingRetrieval),
        Provider::new("Ledger").with_retrieval(StaticRetrieval::with([("lc:1", json!({"id": "1"}))])),
    ]);

    let result = wallet.retrieval().get("lc:1", CacheMode::SkipCache).await.unwrap();
    assert_eq!(result, Some(json!({"id": "1"})));
}

#[tokio::test]
async fn every_provider_failing_is_an_error() {
    let wallet = Wallet::new(vec![
        Provider::new("A").with_retrieval(FailingRetrieval),
        Provider::new("B").with_retrieval(FailingRetrieval),
    ]);

    let err = wallet
        .retrieval()
        .get("lc:1", CacheMode::CacheFirst)
        .await
        .unwrap_err();

    match err {
        WalletError::AggregateFailure { capability, errors } => {
            assert_eq!(capability, Capability::Retrieval);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected aggregate failure, got {:?}", other),
    }
}

#[tokio::test]
async fn no_retrieval_providers_is_an_error() {
    let wallet = Wallet::default();
    assert!(matches!(
        wallet.retrieval().get("lc:1", CacheMode::SkipCache).await,
        Err(WalletError::AggregateFailure { .. })
    ));
}

#[tokio::test]
async fn unknown_uri_resolves_to_none() {
    let wallet = Wallet::new(vec![
        Provider::new("Ledger").with_retrieval(StaticRetrieval::default()),
        Provider::new("Broken").with_retrieval(FailingRetrieval),
    ]);
    let result = wallet.retrieval().get("lc:missing", CacheMode::SkipCache).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn cache_only_without_caching_provider_is_unavailable() {
    let wallet = Wallet::new(vec![
        Provider::new("Ledger").with_retrieval(StaticRetrieval::with([("lc:1", json!(1))])),
    ]);

    let err = wallet
        .retrieval()
        .get("lc:1", CacheMode::CacheOnly)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WalletError::CapabilityUnavailable {
            capability: Capability::Caching,
            ..
        }
    ));
}

#[tokio::test]
async fn cache_only_miss_fetches_and_stores() {
    let cache = MemoryCache::default();
    let source = StaticRetrieval::with([("lc:1", json!("fresh"))]);
    let wallet = Wallet::new(vec![
        cache_provider(&cache),
        Provider::new("Ledger").with_retrieval(source.clone()),
    ]);

    let result = wallet.retrieval().get("lc:1", CacheMode::CacheOnly).await.unwrap();

    assert_eq!(result, Some(json!("fresh")));
    assert_eq!(source.call_count(), 1);
    assert_eq!(cache.vc("lc:1"), Some(json!("fresh")));
}

#[tokio::test]
async fn cache_only_hit_skips_refresh() {
    let cache = MemoryCache::default();
    cache.put_vc("lc:1", json!("cached"));
    let source = StaticRetrieval::with([("lc:1", json!("fresh"))]);
    let wallet = Wallet::new(vec![
        cache_provider(&cache),
        Provider::new("Ledger").with_retrieval(source.clone()),
    ]);

    let result = wallet.retrieval().get("lc:1", CacheMode::CacheOnly).await.unwrap();
    assert_eq!(result, Some(json!("cached")));

    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
    assert_eq!(source.call_count(), 0);
    assert_eq!(cache.vc("lc:1"), Some(json!("cached")));
}

#[tokio::test]
async fn cache_first_hit_returns_cached_then_refreshes() {
    let cache = MemoryCache::default();
    cache.put_vc("lc:1", json!({"v": "stale"}));
    let source = GatedRetrieval::new(json!({"v": "fresh"}));
    let wallet = Wallet::new(vec![
        cache_provider(&cache),
        Provider::new("Ledger").with_retrieval(source.clone()),
    ]);

    let result = wallet.retrieval().get("lc:1", CacheMode::CacheFirst).await.unwrap();

    assert_eq!(result, Some(json!({"v": "stale"})));
    assert_eq!(cache.vc("lc:1"), Some(json!({"v": "stale"})));

    source.gate.notify_one();
    assert!(eventually(|| cache.vc("lc:1") == Some(json!({"v": "fresh"}))).await);
}

#[tokio::test]
async fn background_refresh_can_be_disabled() {
    let cache = MemoryCache::default();
    cache.put_vc("lc:1", json!("stale"));
    let source = StaticRetrieval::with([("lc:1", json!("fresh"))]);
    let config = WalletConfig {
        background_refresh: false,
        ..WalletConfig::default()
    };
    let wallet = Wallet::with_config(
        vec![
            cache_provider(&cache),
            Provider::new("Ledger").with_retrieval(source.clone()),
        ],
        config,
    );

    let result = wallet.retrieval().get("lc:1", CacheMode::CacheFirst).await.unwrap();
    assert_eq!(result, Some(json!("stale")));

    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn miss_is_fetched_and_written_back() {
    let cache = MemoryCache::default();
    let source = StaticRetrieval::with([("lc:1", json!("fresh"))]);
    let wallet = Wallet::new(vec![
        cache_provider(&cache),
        Provider::new("Ledger").with_retrieval(source.clone()),
    ]);

    let result = wallet.retrieval().get("lc:1", CacheMode::CacheFirst).await.unwrap();

    assert_eq!(result, Some(json!("fresh")));
    assert_eq!(cache.vc("lc:1"), Some(json!("fresh")));
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn skip_cache_neither_reads_nor_writes_cache() {
    let cache = MemoryCache::default();
    cache.put_vc("lc:1", json!("cached"));
    let source = StaticRetrieval::with([("lc:1", json!("fresh")), ("lc:2", json!("two"))]);
    let wallet = Wallet::new(vec![
        cache_provider(&cache),
        Provider::new("Ledger").with_retrieval(source.clone()),
    ]);

    let first = wallet.retrieval().get("lc:1", CacheMode::SkipCache).await.unwrap();
    let second = wallet.retrieval().get("lc:2", CacheMode::SkipCache).await.unwrap();

    assert_eq!(first, Some(json!("fresh")));
    assert_eq!(second, Some(json!("two")));
    assert_eq!(cache.vc("lc:1"), Some(json!("cached")));
    assert_eq!(cache.vc("lc:2"), None);
}
