//! Error types for providers and the composed wallet.

use crate::provider::Capability;
use thiserror::Error;

/// Errors returned by provider implementations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider does not implement an optional operation
    #[error("operation '{0}' is not supported by this provider")]
    Unsupported(&'static str),

    /// The provider has nothing stored under the requested key
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend or implementation failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProviderError {
    /// Build an [`ProviderError::Other`] from a plain message.
    pub fn msg(message: impl std::fmt::Display) -> Self {
        ProviderError::Other(anyhow::anyhow!("{}", message))
    }
}

/// Errors surfaced by wallet planes and the method surface.
#[derive(Debug, Error)]
pub enum WalletError {
    /// A cache-only read was requested but no caching provider is composed
    #[error("{capability} capability is unavailable for cache-only {operation}")]
    CapabilityUnavailable {
        capability: Capability,
        operation: &'static str,
    },

    /// Every provider racing for a capability-wide read failed
    #[error("all {capability} providers failed ({} errors)", errors.len())]
    AggregateFailure {
        capability: Capability,
        errors: Vec<ProviderError>,
    },

    /// No identity provider could answer for the requested method or algorithm
    #[error("no provider for {parameter}")]
    NoProviderFor { parameter: String },

    /// No provider exported a method with this name
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Error from a single addressed provider, passed through as-is
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Configuration or logging setup failed
    #[error("configuration error: {0}")]
    Config(String),
}
