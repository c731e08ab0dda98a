//! Capability planes
//!
//! A plane is the wallet-wide entry point for one capability. Each plane is
//! generated from the same ordered provider list, folded two ways:
//!
//! - `ordered`: every provider implementing the capability, in registration
//!   order, duplicates included. Used for fan-out (races, broadcasts, unions,
//!   first-match walks).
//! - `by_name`: last provider with a given name wins. Used for per-provider
//!   addressing and introspection.
//!
//! The two views diverge when names collide; both are kept.

pub mod caching;
pub mod identity;
pub mod indexing;
pub(crate) mod overlay;
pub mod persistence;
pub mod retrieval;

pub use caching::CachingPlane;
pub use identity::IdentityPlane;
pub use indexing::{IndexHandle, IndexUnion, IndexingPlane, ALL_SCOPE};
pub use persistence::{PersistenceHandle, PersistencePlane};
pub use retrieval::RetrievalPlane;

use crate::provider::{Capability, Provider, ProviderInfo};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Both folds of the provider list for a single capability.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlaneIndex {
    ordered: Vec<Arc<Provider>>,
    by_name: HashMap<String, Arc<Provider>>,
}

impl PlaneIndex {
    pub(crate) fn build(providers: &[Arc<Provider>], capability: Capability) -> Self {
        let ordered: Vec<Arc<Provider>> = providers
            .iter()
            .filter(|provider| provider.implements(capability))
            .cloned()
            .collect();
        let by_name = ordered.iter().fold(HashMap::new(), |mut map, provider| {
            map.insert(provider.name().to_string(), provider.clone());
            map
        });
        Self { ordered, by_name }
    }

    pub(crate) fn ordered(&self) -> &[Arc<Provider>] {
        &self.ordered
    }

    pub(crate) fn named(&self, name: &str) -> Option<&Arc<Provider>> {
        self.by_name.get(name)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub(crate) fn infos(&self) -> BTreeMap<String, ProviderInfo> {
        self.by_name
            .iter()
            .map(|(name, provider)| (name.clone(), provider.info()))
            .collect()
    }
}

/// The five generated plane indexes of a wallet.
#[derive(Debug, Clone, Default)]
pub(crate) struct Planes {
    retrieval: PlaneIndex,
    persistence: PlaneIndex,
    indexing: PlaneIndex,
    caching: PlaneIndex,
    identity: PlaneIndex,
}

impl Planes {
    pub(crate) fn build(providers: &[Arc<Provider>]) -> Self {
        Self {
            retrieval: PlaneIndex::build(providers, Capability::Retrieval),
            persistence: PlaneIndex::build(providers, Capability::Persistence),
            indexing: PlaneIndex::build(providers, Capability::Indexing),
            caching: PlaneIndex::build(providers, Capability::Caching),
            identity: PlaneIndex::build(providers, Capability::Identity),
        }
    }

    pub(crate) fn get(&self, capability: Capability) -> &PlaneIndex {
        match capability {
            Capability::Retrieval => &self.retrieval,
            Capability::Persistence => &self.persistence,
            Capability::Indexing => &self.indexing,
            Capability::Caching => &self.caching,
            Capability::Identity => &self.identity,
        }
    }
}
