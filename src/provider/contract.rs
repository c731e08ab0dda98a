//! Capability contracts a provider may implement.
//!
//! Every operation receives the composed [`Wallet`] first so an
//! implementation can reach capabilities and methods contributed by any other
//! installed provider. Optional operations default to
//! [`ProviderError::Unsupported`].

use crate::error::ProviderError;
use crate::types::{Content, Keypair, Page, PaginationOptions, Query, Record};
use crate::wallet::Wallet;
use async_trait::async_trait;

/// Content lookup by URI.
#[async_trait]
pub trait Retrieval: Send + Sync {
    /// Resolve `uri`. `Ok(None)` means this provider does not know the URI.
    async fn get(&self, wallet: &Wallet, uri: &str) -> Result<Option<Content>, ProviderError>;
}

/// Content upload to a single backend.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Store `content` and return the URI it can be retrieved by.
    async fn upload(&self, wallet: &Wallet, content: &Content) -> Result<String, ProviderError>;

    async fn upload_many(
        &self,
        _wallet: &Wallet,
        _contents: &[Content],
    ) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Unsupported("uploadMany"))
    }

    /// Store `content` encrypted for `recipients` (DIDs).
    async fn upload_encrypted(
        &self,
        _wallet: &Wallet,
        _content: &Content,
        _recipients: &[String],
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Unsupported("uploadEncrypted"))
    }
}

/// A queryable set of records.
#[async_trait]
pub trait Indexing: Send + Sync {
    async fn get(&self, wallet: &Wallet, query: &Query) -> Result<Vec<Record>, ProviderError>;

    async fn add(&self, wallet: &Wallet, record: &Content) -> Result<bool, ProviderError>;

    async fn update(
        &self,
        wallet: &Wallet,
        id: &str,
        patch: &Content,
    ) -> Result<bool, ProviderError>;

    async fn remove(&self, wallet: &Wallet, id: &str) -> Result<bool, ProviderError>;

    async fn get_page(
        &self,
        _wallet: &Wallet,
        _query: &Query,
        _options: &PaginationOptions,
    ) -> Result<Page, ProviderError> {
        Err(ProviderError::Unsupported("getPage"))
    }

    async fn get_count(&self, _wallet: &Wallet, _query: &Query) -> Result<usize, ProviderError> {
        Err(ProviderError::Unsupported("getCount"))
    }

    async fn add_many(&self, _wallet: &Wallet, _records: &[Content]) -> Result<bool, ProviderError> {
        Err(ProviderError::Unsupported("addMany"))
    }

    async fn remove_all(&self, _wallet: &Wallet) -> Result<bool, ProviderError> {
        Err(ProviderError::Unsupported("removeAll"))
    }
}

/// Local cache of content and index results.
///
/// `scope` is the name of the indexing provider a result came from, or
/// `all` for the cross-provider union.
#[async_trait]
pub trait Caching: Send + Sync {
    async fn get_vc(&self, wallet: &Wallet, uri: &str) -> Result<Option<Content>, ProviderError>;

    async fn set_vc(
        &self,
        wallet: &Wallet,
        uri: &str,
        value: &Content,
    ) -> Result<bool, ProviderError>;

    async fn flush_vc(&self, wallet: &Wallet) -> Result<bool, ProviderError>;

    async fn get_index(
        &self,
        wallet: &Wallet,
        scope: &str,
        query: &Query,
    ) -> Result<Option<Vec<Record>>, ProviderError>;

    async fn set_index(
        &self,
        wallet: &Wallet,
        scope: &str,
        query: &Query,
        records: &[Record],
    ) -> Result<bool, ProviderError>;

    async fn flush_index(&self, wallet: &Wallet) -> Result<bool, ProviderError>;

    async fn get_index_page(
        &self,
        _wallet: &Wallet,
        _scope: &str,
        _query: &Query,
        _options: &PaginationOptions,
    ) -> Result<Option<Page>, ProviderError> {
        Err(ProviderError::Unsupported("getIndexPage"))
    }

    async fn set_index_page(
        &self,
        _wallet: &Wallet,
        _scope: &str,
        _query: &Query,
        _options: &PaginationOptions,
        _page: &Page,
    ) -> Result<bool, ProviderError> {
        Err(ProviderError::Unsupported("setIndexPage"))
    }
}

/// DID and key material resolution.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Resolve the DID for `method` (the provider's default when `None`).
    async fn resolve_identity(
        &self,
        wallet: &Wallet,
        method: Option<&str>,
    ) -> Result<Option<String>, ProviderError>;

    async fn resolve_keypair(
        &self,
        wallet: &Wallet,
        algorithm: &str,
    ) -> Result<Option<Keypair>, ProviderError>;
}
