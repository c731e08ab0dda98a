//! Providers: named bundles of capability implementations and methods.

pub mod contract;
pub mod method;

pub use contract::{Caching, Identity, Indexing, Persistence, Retrieval};
pub use method::{method, Method};

use crate::error::ProviderError;
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The five cross-cutting capabilities a provider may contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Retrieval,
    Persistence,
    Indexing,
    Caching,
    Identity,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Retrieval,
        Capability::Persistence,
        Capability::Indexing,
        Capability::Caching,
        Capability::Identity,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Retrieval => "Retrieval",
            Capability::Persistence => "Persistence",
            Capability::Indexing => "Indexing",
            Capability::Caching => "Caching",
            Capability::Identity => "Identity",
        };
        f.write_str(name)
    }
}

/// Descriptive provider metadata, as listed by each plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An installable unit contributing capabilities and named methods.
///
/// Providers own whatever state their implementations need; the wallet only
/// ever reads them.
#[derive(Clone)]
pub struct Provider {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    pub(crate) retrieval: Option<Arc<dyn Retrieval>>,
    pub(crate) persistence: Option<Arc<dyn Persistence>>,
    pub(crate) indexing: Option<Arc<dyn Indexing>>,
    pub(crate) caching: Option<Arc<dyn Caching>>,
    pub(crate) identity: Option<Arc<dyn Identity>>,
    pub(crate) methods: HashMap<String, Method>,
}

impl Provider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            retrieval: None,
            persistence: None,
            indexing: None,
            caching: None,
            identity: None,
            methods: HashMap::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_retrieval(mut self, retrieval: impl Retrieval + 'static) -> Self {
        self.retrieval = Some(Arc::new(retrieval));
        self
    }

    pub fn with_persistence(mut self, persistence: impl Persistence + 'static) -> Self {
        self.persistence = Some(Arc::new(persistence));
        self
    }

    pub fn with_indexing(mut self, indexing: impl Indexing + 'static) -> Self {
        self.indexing = Some(Arc::new(indexing));
        self
    }

    pub fn with_caching(mut self, caching: impl Caching + 'static) -> Self {
        self.caching = Some(Arc::new(caching));
        self
    }

    pub fn with_identity(mut self, identity: impl Identity + 'static) -> Self {
        self.identity = Some(Arc::new(identity));
        self
    }

    /// Export a named method. A later call with the same name replaces it.
    pub fn with_method<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Wallet, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ProviderError>> + Send + 'static,
    {
        self.methods.insert(name.into(), method(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: self.description.clone(),
        }
    }

    /// Whether this provider carries an implementation for `capability`.
    pub fn implements(&self, capability: Capability) -> bool {
        match capability {
            Capability::Retrieval => self.retrieval.is_some(),
            Capability::Persistence => self.persistence.is_some(),
            Capability::Indexing => self.indexing.is_some(),
            Capability::Caching => self.caching.is_some(),
            Capability::Identity => self.identity.is_some(),
        }
    }

    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|capability| self.implements(*capability))
            .collect()
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}
