//! Cache overlay for cache-aware reads.
//!
//! Read policy shared by Retrieval and Indexing reads:
//!
//! | mode          | no caching provider        | hit                         | miss                 |
//! |---------------|----------------------------|-----------------------------|----------------------|
//! | `cache-first` | fetch                      | return hit, refresh later   | fetch, then store    |
//! | `cache-only`  | `CapabilityUnavailable`    | return hit, no refresh      | fetch, then store    |
//! | `skip-cache`  | fetch                      | not consulted               | fetch, never store   |
//!
//! The refresh after a `cache-first` hit is spawned on the ambient tokio
//! runtime and never awaited. It may interleave with explicit writes to the
//! same key; whichever write lands last is what the cache holds.

use crate::error::WalletError;
use crate::provider::Capability;
use crate::types::CacheMode;
use crate::wallet::Wallet;
use async_trait::async_trait;
use tracing::{debug, warn};

/// One cacheable read: where it lives in the cache and how to fetch it fresh.
#[async_trait]
pub(crate) trait CacheSlot: Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    /// Short description for log events.
    fn describe(&self) -> String;

    async fn lookup(&self, wallet: &Wallet) -> Option<Self::Value>;

    async fn store(&self, wallet: &Wallet, value: &Self::Value) -> bool;

    /// Fetch from the source of truth, bypassing the cache.
    async fn fetch(&self, wallet: &Wallet) -> Result<Option<Self::Value>, WalletError>;
}

/// Apply the three-mode cache policy to `slot`.
pub(crate) async fn read_through<S: CacheSlot>(
    wallet: &Wallet,
    slot: S,
    mode: CacheMode,
    operation: &'static str,
) -> Result<Option<S::Value>, WalletError> {
    let cache_composed = wallet.has_capability(Capability::Caching);

    if mode == CacheMode::CacheOnly && !cache_composed {
        return Err(WalletError::CapabilityUnavailable {
            capability: Capability::Caching,
            operation,
        });
    }

    let use_cache = cache_composed && mode.uses_cache();

    if use_cache {
        if let Some(hit) = slot.lookup(wallet).await {
            debug!(slot = %slot.describe(), mode = %mode, "cache hit");
            if mode == CacheMode::CacheFirst {
                revalidate(wallet, slot);
            }
            return Ok(Some(hit));
        }
        debug!(slot = %slot.describe(), mode = %mode, "cache miss");
    }

    let fresh = slot.fetch(wallet).await?;

    if use_cache {
        if let Some(value) = &fresh {
            if !slot.store(wallet, value).await {
                warn!(slot = %slot.describe(), "no caching provider accepted the write");
            }
        }
    }

    Ok(fresh)
}

/// Stale-while-revalidate: fetch `slot` again in the background and write the
/// result back into the cache.
fn revalidate<S: CacheSlot>(wallet: &Wallet, slot: S) {
    if !wallet.config().background_refresh {
        return;
    }

    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            debug!(slot = %slot.describe(), "no async runtime; skipping background refresh");
            return;
        }
    };

    let wallet = wallet.clone();
    handle.spawn(async move {
        match slot.fetch(&wallet).await {
            Ok(Some(value)) => {
                slot.store(&wallet, &value).await;
                debug!(slot = %slot.describe(), "background refresh stored");
            }
            Ok(None) => {
                debug!(slot = %slot.describe(), "background refresh found nothing");
            }
            Err(e) => {
                warn!(slot = %slot.describe(), error = %e, "background refresh failed");
            }
        }
    });
}
