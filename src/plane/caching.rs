//! Caching plane: the wallet-wide cache.
//!
//! Reads race every caching provider and settle on the first hit; a failed
//! or absent cache reads as a miss. Writes and flushes go to every caching
//! provider and report `true` when at least one of them succeeded.

use crate::concurrency::{any_succeeded, broadcast, race_first, RaceOutcome};
use crate::error::ProviderError;
use crate::provider::{Caching, Capability, ProviderInfo};
use crate::types::{Content, Page, PaginationOptions, Query, Record};
use crate::wallet::Wallet;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct CachingPlane<'a> {
    wallet: &'a Wallet,
}

impl<'a> CachingPlane<'a> {
    pub(crate) fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Caching providers by name (last registration wins).
    pub fn providers(&self) -> BTreeMap<String, ProviderInfo> {
        self.wallet.plane_index(Capability::Caching).infos()
    }

    fn caches(&self) -> impl Iterator<Item = &'a Arc<dyn Caching>> + 'a {
        self.wallet
            .plane_index(Capability::Caching)
            .ordered()
            .iter()
            .filter_map(|provider| provider.caching.as_ref())
    }

    pub async fn get_vc(&self, uri: &str) -> Option<Content> {
        let wallet = self.wallet;
        let outcome = race_first(self.caches().map(|cache| cache.get_vc(wallet, uri))).await;
        settle_read("getVc", outcome)
    }

    pub async fn set_vc(&self, uri: &str, value: &Content) -> bool {
        let wallet = self.wallet;
        let results = broadcast(self.caches().map(|cache| cache.set_vc(wallet, uri, value))).await;
        settle_write("setVc", &results)
    }

    pub async fn flush_vc(&self) -> bool {
        let wallet = self.wallet;
        let results = broadcast(self.caches().map(|cache| cache.flush_vc(wallet))).await;
        settle_write("flushVc", &results)
    }

    pub async fn get_index(&self, scope: &str, query: &Query) -> Option<Vec<Record>> {
        let wallet = self.wallet;
        let outcome =
            race_first(self.caches().map(|cache| cache.get_index(wallet, scope, query))).await;
        settle_read("getIndex", outcome)
    }

    pub async fn set_index(&self, scope: &str, query: &Query, records: &[Record]) -> bool {
        let wallet = self.wallet;
        let results = broadcast(
            self.caches()
                .map(|cache| cache.set_index(wallet, scope, query, records)),
        )
        .await;
        settle_write("setIndex", &results)
    }

    pub async fn flush_index(&self) -> bool {
        let wallet = self.wallet;
        let results = broadcast(self.caches().map(|cache| cache.flush_index(wallet))).await;
        settle_write("flushIndex", &results)
    }

    pub async fn get_index_page(
        &self,
        scope: &str,
        query: &Query,
        options: &PaginationOptions,
    ) -> Option<Page> {
        let wallet = self.wallet;
        let outcome = race_first(
            self.caches()
                .map(|cache| cache.get_index_page(wallet, scope, query, options)),
        )
        .await;
        settle_read("getIndexPage", outcome)
    }

    pub async fn set_index_page(
        &self,
        scope: &str,
        query: &Query,
        options: &PaginationOptions,
        page: &Page,
    ) -> bool {
        let wallet = self.wallet;
        let results = broadcast(
            self.caches()
                .map(|cache| cache.set_index_page(wallet, scope, query, options, page)),
        )
        .await;
        settle_write("setIndexPage", &results)
    }
}

fn settle_read<T>(operation: &'static str, outcome: RaceOutcome<T>) -> Option<T> {
    match outcome {
        RaceOutcome::Found(value) => Some(value),
        RaceOutcome::Exhausted { errors, misses } => {
            for error in &errors {
                debug!(operation, error = %error, "cache read failed");
            }
            debug!(operation, misses, failures = errors.len(), "cache miss");
            None
        }
    }
}

fn settle_write(operation: &'static str, results: &[Result<bool, ProviderError>]) -> bool {
    for error in results.iter().filter_map(|result| result.as_ref().err()) {
        warn!(operation, error = %error, "cache write failed");
    }
    any_succeeded(results)
}
