//! The composite wallet
//!
//! A [`Wallet`] is an immutable, append-only composition of providers. It is
//! a cheap handle; cloning shares the same composition. [`Wallet::extend`]
//! builds a brand-new wallet and leaves the receiver untouched.

pub mod binder;

pub use binder::BoundMethod;

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::plane::{
    CachingPlane, IdentityPlane, IndexingPlane, PersistencePlane, PlaneIndex, Planes,
    RetrievalPlane,
};
use crate::provider::{Capability, Provider};
use binder::MethodTable;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

struct WalletInner {
    providers: Vec<Arc<Provider>>,
    planes: Planes,
    methods: MethodTable,
    config: WalletConfig,
}

/// Ordered providers plus the planes and method surface generated from them.
#[derive(Clone)]
pub struct Wallet {
    inner: Arc<WalletInner>,
}

impl Wallet {
    /// Compose a wallet from an ordered provider list (possibly empty).
    pub fn new(providers: impl IntoIterator<Item = Provider>) -> Self {
        Self::with_config(providers, WalletConfig::default())
    }

    pub fn with_config(providers: impl IntoIterator<Item = Provider>, config: WalletConfig) -> Self {
        let providers = providers.into_iter().map(Arc::new).collect();
        Self::assemble(providers, config)
    }

    fn assemble(providers: Vec<Arc<Provider>>, config: WalletConfig) -> Self {
        let methods = MethodTable::bind(&providers);
        let planes = Planes::build(&providers);
        debug!(
            providers = providers.len(),
            methods = methods.names().count(),
            "Wallet assembled"
        );
        Self {
            inner: Arc::new(WalletInner {
                providers,
                planes,
                methods,
                config,
            }),
        }
    }

    /// Return a new wallet with `provider` appended. Every plane and the
    /// method surface are rebuilt; `self` is not modified.
    pub fn extend(&self, provider: Provider) -> Wallet {
        info!(
            provider = provider.name(),
            capabilities = ?provider.capabilities(),
            "Extending wallet"
        );
        let mut providers = self.inner.providers.clone();
        providers.push(Arc::new(provider));
        Self::assemble(providers, self.inner.config.clone())
    }

    pub fn providers(&self) -> &[Arc<Provider>] {
        &self.inner.providers
    }

    pub fn config(&self) -> &WalletConfig {
        &self.inner.config
    }

    /// Whether at least one provider implements `capability`.
    pub fn has_capability(&self, capability: Capability) -> bool {
        !self.plane_index(capability).is_empty()
    }

    pub(crate) fn plane_index(&self, capability: Capability) -> &PlaneIndex {
        self.inner.planes.get(capability)
    }

    pub fn retrieval(&self) -> RetrievalPlane<'_> {
        RetrievalPlane::new(self)
    }

    pub fn persistence(&self) -> PersistencePlane<'_> {
        PersistencePlane::new(self)
    }

    pub fn indexing(&self) -> IndexingPlane<'_> {
        IndexingPlane::new(self)
    }

    pub fn caching(&self) -> CachingPlane<'_> {
        CachingPlane::new(self)
    }

    pub fn identity(&self) -> IdentityPlane<'_> {
        IdentityPlane::new(self)
    }

    /// Call the method exported under `name` with this wallet as its first
    /// argument.
    pub async fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value, WalletError> {
        let method = self
            .inner
            .methods
            .get(name)
            .ok_or_else(|| WalletError::UnknownMethod(name.to_string()))?;
        debug!(method = name, "invoke");
        method(self.clone(), args).await.map_err(WalletError::from)
    }

    /// Look up a method bound to this wallet.
    pub fn method(&self, name: &str) -> Option<BoundMethod> {
        self.inner
            .methods
            .get(name)
            .map(|method| BoundMethod::new(name, self.clone(), method.clone()))
    }

    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.methods.names().map(str::to_string).collect();
        names.sort();
        names
    }

    /// Whether two handles share the same composition.
    pub fn ptr_eq(&self, other: &Wallet) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("providers", &self.inner.providers)
            .field("methods", &self.inner.methods)
            .finish()
    }
}
