//! Persistence plane: uploads, addressed to one named provider.
//!
//! Uploads are never fanned out. Each provider's `upload` is wrapped so the
//! uploaded content is written into the cache under the returned URI.

use crate::error::WalletError;
use crate::provider::{Capability, Persistence, ProviderInfo};
use crate::types::{CacheMode, Content};
use crate::wallet::Wallet;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct PersistencePlane<'a> {
    wallet: &'a Wallet,
}

impl<'a> PersistencePlane<'a> {
    pub(crate) fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Persistence providers by name (last registration wins).
    pub fn providers(&self) -> BTreeMap<String, ProviderInfo> {
        self.wallet.plane_index(Capability::Persistence).infos()
    }

    /// The persistence entry point of the last provider registered as `name`.
    pub fn provider(&self, name: &str) -> Option<PersistenceHandle<'a>> {
        let wallet = self.wallet;
        let provider = wallet.plane_index(Capability::Persistence).named(name)?;
        let persistence = provider.persistence.as_ref()?;
        Some(PersistenceHandle {
            wallet,
            name: provider.name(),
            persistence,
        })
    }
}

/// Cache-wrapped persistence calls for one provider.
pub struct PersistenceHandle<'a> {
    wallet: &'a Wallet,
    name: &'a str,
    persistence: &'a Arc<dyn Persistence>,
}

impl<'a> PersistenceHandle<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    /// Upload `content` and return its URI. Unless `mode` is `skip-cache`,
    /// the content is cached under that URI before returning.
    pub async fn upload(&self, content: &Content, mode: CacheMode) -> Result<String, WalletError> {
        debug!(provider = self.name, mode = %mode, "persistence upload");
        let uri = self.persistence.upload(self.wallet, content).await?;
        self.cache_upload(&uri, content, mode).await;
        Ok(uri)
    }

    /// Upload `content` encrypted for `recipients`; cached like [`upload`](Self::upload).
    pub async fn upload_encrypted(
        &self,
        content: &Content,
        recipients: &[String],
        mode: CacheMode,
    ) -> Result<String, WalletError> {
        debug!(provider = self.name, mode = %mode, "persistence upload_encrypted");
        let uri = self
            .persistence
            .upload_encrypted(self.wallet, content, recipients)
            .await?;
        self.cache_upload(&uri, content, mode).await;
        Ok(uri)
    }

    /// Batch upload, passed straight through. Batch results are not cached.
    pub async fn upload_many(&self, contents: &[Content]) -> Result<Vec<String>, WalletError> {
        debug!(provider = self.name, count = contents.len(), "persistence upload_many");
        Ok(self.persistence.upload_many(self.wallet, contents).await?)
    }

    async fn cache_upload(&self, uri: &str, content: &Content, mode: CacheMode) {
        if !mode.uses_cache() || !self.wallet.has_capability(Capability::Caching) {
            return;
        }
        if !self.wallet.caching().set_vc(uri, content).await {
            warn!(provider = self.name, uri, "uploaded content was not cached");
        }
    }
}
