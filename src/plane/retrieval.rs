//! Retrieval plane: content lookup by URI.

use super::overlay::{read_through, CacheSlot};
use crate::concurrency::{race_first, RaceOutcome};
use crate::error::WalletError;
use crate::provider::{Capability, ProviderInfo};
use crate::types::{CacheMode, Content};
use crate::wallet::Wallet;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

pub struct RetrievalPlane<'a> {
    wallet: &'a Wallet,
}

impl<'a> RetrievalPlane<'a> {
    pub(crate) fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Retrieval providers by name (last registration wins).
    pub fn providers(&self) -> BTreeMap<String, ProviderInfo> {
        self.wallet.plane_index(Capability::Retrieval).infos()
    }

    /// Resolve `uri` through the cache overlay and the retrieval providers.
    ///
    /// An empty URI resolves to `None` without consulting anything. When every
    /// provider fails the call fails with [`WalletError::AggregateFailure`];
    /// providers that merely do not know the URI make it resolve to `None`.
    pub async fn get(&self, uri: &str, mode: CacheMode) -> Result<Option<Content>, WalletError> {
        if uri.is_empty() {
            return Ok(None);
        }
        debug!(uri, mode = %mode, "retrieval get");
        read_through(
            self.wallet,
            ContentSlot {
                uri: uri.to_string(),
            },
            mode,
            "retrieval get",
        )
        .await
    }
}

/// Race every retrieval provider for `uri`.
pub(crate) async fn fetch(wallet: &Wallet, uri: &str) -> Result<Option<Content>, WalletError> {
    let calls = wallet
        .plane_index(Capability::Retrieval)
        .ordered()
        .iter()
        .filter_map(|provider| provider.retrieval.as_ref())
        .map(|retrieval| retrieval.get(wallet, uri));

    match race_first(calls).await {
        RaceOutcome::Found(content) => Ok(Some(content)),
        RaceOutcome::Exhausted { errors, misses: 0 } => Err(WalletError::AggregateFailure {
            capability: Capability::Retrieval,
            errors,
        }),
        RaceOutcome::Exhausted { errors, misses } => {
            debug!(uri, misses, failures = errors.len(), "no retrieval provider knows uri");
            Ok(None)
        }
    }
}

struct ContentSlot {
    uri: String,
}

#[async_trait]
impl CacheSlot for ContentSlot {
    type Value = Content;

    fn describe(&self) -> String {
        format!("vc:{}", self.uri)
    }

    async fn lookup(&self, wallet: &Wallet) -> Option<Content> {
        wallet.caching().get_vc(&self.uri).await
    }

    async fn store(&self, wallet: &Wallet, value: &Content) -> bool {
        wallet.caching().set_vc(&self.uri, value).await
    }

    async fn fetch(&self, wallet: &Wallet) -> Result<Option<Content>, WalletError> {
        fetch(wallet, &self.uri).await
    }
}
