//! Indexing plane: per-provider record sets plus a cross-provider union.
//!
//! Reads go through the cache overlay keyed by `(scope, query)`, where scope
//! is the provider name or [`ALL_SCOPE`]. Writes flush the cached index
//! *before* delegating, so a write that fails midway leaves the cache empty
//! rather than stale.

use super::overlay::{read_through, CacheSlot};
use crate::concurrency::broadcast;
use crate::error::WalletError;
use crate::provider::{Capability, Indexing, ProviderInfo};
use crate::types::{dedup_records, CacheMode, Content, Page, PaginationOptions, Query, Record};
use crate::wallet::Wallet;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache scope used for the cross-provider union.
pub const ALL_SCOPE: &str = "all";

pub struct IndexingPlane<'a> {
    wallet: &'a Wallet,
}

impl<'a> IndexingPlane<'a> {
    pub(crate) fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Indexing providers by name (last registration wins).
    pub fn providers(&self) -> BTreeMap<String, ProviderInfo> {
        self.wallet.plane_index(Capability::Indexing).infos()
    }

    /// The index of the last provider registered as `name`.
    pub fn provider(&self, name: &str) -> Option<IndexHandle<'a>> {
        let wallet = self.wallet;
        let provider = wallet.plane_index(Capability::Indexing).named(name)?;
        let index = provider.indexing.as_ref()?;
        Some(IndexHandle {
            wallet,
            name: provider.name(),
            index,
        })
    }

    /// Union over every indexing provider, duplicates by name included.
    pub fn all(&self) -> IndexUnion<'a> {
        IndexUnion {
            wallet: self.wallet,
        }
    }
}

/// Cache-aware index operations for one provider.
pub struct IndexHandle<'a> {
    wallet: &'a Wallet,
    name: &'a str,
    index: &'a Arc<dyn Indexing>,
}

impl<'a> IndexHandle<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub async fn get(&self, query: &Query, mode: CacheMode) -> Result<Vec<Record>, WalletError> {
        debug!(provider = self.name, mode = %mode, "index get");
        let slot = IndexSlot {
            scope: IndexScope::Provider(self.name.to_string()),
            query: query.clone(),
        };
        Ok(read_through(self.wallet, slot, mode, "index get")
            .await?
            .unwrap_or_default())
    }

    /// Paged read, cached per `(provider, query, options)`.
    pub async fn get_page(
        &self,
        query: &Query,
        options: &PaginationOptions,
        mode: CacheMode,
    ) -> Result<Page, WalletError> {
        debug!(provider = self.name, mode = %mode, limit = options.limit, "index get_page");
        let slot = PageSlot {
            provider: self.name.to_string(),
            query: query.clone(),
            options: options.clone(),
        };
        Ok(read_through(self.wallet, slot, mode, "index get_page")
            .await?
            .unwrap_or_default())
    }

    /// Number of records matching `query`. Never cached.
    pub async fn get_count(&self, query: &Query) -> Result<usize, WalletError> {
        Ok(self.index.get_count(self.wallet, query).await?)
    }

    pub async fn add(&self, record: &Content, mode: CacheMode) -> Result<bool, WalletError> {
        self.invalidate(mode, "add").await;
        Ok(self.index.add(self.wallet, record).await?)
    }

    pub async fn add_many(&self, records: &[Content], mode: CacheMode) -> Result<bool, WalletError> {
        self.invalidate(mode, "add_many").await;
        Ok(self.index.add_many(self.wallet, records).await?)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: &Content,
        mode: CacheMode,
    ) -> Result<bool, WalletError> {
        self.invalidate(mode, "update").await;
        Ok(self.index.update(self.wallet, id, patch).await?)
    }

    pub async fn remove(&self, id: &str, mode: CacheMode) -> Result<bool, WalletError> {
        self.invalidate(mode, "remove").await;
        Ok(self.index.remove(self.wallet, id).await?)
    }

    pub async fn remove_all(&self, mode: CacheMode) -> Result<bool, WalletError> {
        self.invalidate(mode, "remove_all").await;
        Ok(self.index.remove_all(self.wallet).await?)
    }

    async fn invalidate(&self, mode: CacheMode, operation: &'static str) {
        debug!(provider = self.name, mode = %mode, operation, "index write");
        if !mode.uses_cache() || !self.wallet.has_capability(Capability::Caching) {
            return;
        }
        if !self.wallet.caching().flush_index().await {
            warn!(provider = self.name, operation, "cached index could not be flushed");
        }
    }
}

/// Cross-provider index reads.
pub struct IndexUnion<'a> {
    wallet: &'a Wallet,
}

impl<'a> IndexUnion<'a> {
    /// Query every indexing provider concurrently, concatenate their records
    /// in provider order, and drop records that are the same record as an
    /// earlier one (see [`Record::same_as`]).
    pub async fn get(&self, query: &Query, mode: CacheMode) -> Result<Vec<Record>, WalletError> {
        debug!(mode = %mode, "index all get");
        let slot = IndexSlot {
            scope: IndexScope::All,
            query: query.clone(),
        };
        Ok(read_through(self.wallet, slot, mode, "index all get")
            .await?
            .unwrap_or_default())
    }
}

/// Union of every indexing provider's results for `query`.
///
/// Partial failure is tolerated; the union fails only when every provider
/// failed.
async fn fetch_union(wallet: &Wallet, query: &Query) -> Result<Vec<Record>, WalletError> {
    let indexes: Vec<(&str, &Arc<dyn Indexing>)> = wallet
        .plane_index(Capability::Indexing)
        .ordered()
        .iter()
        .filter_map(|provider| {
            provider
                .indexing
                .as_ref()
                .map(|index| (provider.name(), index))
        })
        .collect();

    let results = broadcast(indexes.iter().map(|(_, index)| index.get(wallet, query))).await;

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for ((name, _), result) in indexes.iter().zip(results) {
        match result {
            Ok(found) => records.extend(found),
            Err(e) => {
                warn!(provider = *name, error = %e, "index provider failed during union");
                errors.push(e);
            }
        }
    }

    if !indexes.is_empty() && errors.len() == indexes.len() {
        return Err(WalletError::AggregateFailure {
            capability: Capability::Indexing,
            errors,
        });
    }

    Ok(dedup_records(records))
}

enum IndexScope {
    Provider(String),
    All,
}

impl IndexScope {
    fn key(&self) -> &str {
        match self {
            IndexScope::Provider(name) => name,
            IndexScope::All => ALL_SCOPE,
        }
    }
}

struct IndexSlot {
    scope: IndexScope,
    query: Query,
}

#[async_trait]
impl CacheSlot for IndexSlot {
    type Value = Vec<Record>;

    fn describe(&self) -> String {
        format!("index:{}:{}", self.scope.key(), self.query)
    }

    async fn lookup(&self, wallet: &Wallet) -> Option<Vec<Record>> {
        wallet.caching().get_index(self.scope.key(), &self.query).await
    }

    async fn store(&self, wallet: &Wallet, value: &Vec<Record>) -> bool {
        wallet
            .caching()
            .set_index(self.scope.key(), &self.query, value)
            .await
    }

    async fn fetch(&self, wallet: &Wallet) -> Result<Option<Vec<Record>>, WalletError> {
        match &self.scope {
            IndexScope::All => fetch_union(wallet, &self.query).await.map(Some),
            IndexScope::Provider(name) => {
                let Some(index) = wallet.indexing().provider(name) else {
                    return Ok(None);
                };
                let records = index.index.get(wallet, &self.query).await?;
                Ok(Some(records))
            }
        }
    }
}

struct PageSlot {
    provider: String,
    query: Query,
    options: PaginationOptions,
}

#[async_trait]
impl CacheSlot for PageSlot {
    type Value = Page;

    fn describe(&self) -> String {
        format!(
            "page:{}:{}:{}:{}",
            self.provider,
            self.query,
            self.options.limit,
            self.options.cursor.as_deref().unwrap_or("")
        )
    }

    async fn lookup(&self, wallet: &Wallet) -> Option<Page> {
        wallet
            .caching()
            .get_index_page(&self.provider, &self.query, &self.options)
            .await
    }

    async fn store(&self, wallet: &Wallet, value: &Page) -> bool {
        wallet
            .caching()
            .set_index_page(&self.provider, &self.query, &self.options, value)
            .await
    }

    async fn fetch(&self, wallet: &Wallet) -> Result<Option<Page>, WalletError> {
        let Some(index) = wallet.indexing().provider(&self.provider) else {
            return Ok(None);
        };
        let page = index
            .index
            .get_page(wallet, &self.query, &self.options)
            .await?;
        Ok(Some(page))
    }
}
