//! Identity plane: DID and keypair resolution.
//!
//! Providers are asked one at a time in registration order. The first defined
//! answer wins; a provider that fails is treated as having no answer.

use crate::error::WalletError;
use crate::provider::{Capability, Identity, ProviderInfo};
use crate::types::Keypair;
use crate::wallet::Wallet;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub struct IdentityPlane<'a> {
    wallet: &'a Wallet,
}

impl<'a> IdentityPlane<'a> {
    pub(crate) fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Identity providers by name (last registration wins).
    pub fn providers(&self) -> BTreeMap<String, ProviderInfo> {
        self.wallet.plane_index(Capability::Identity).infos()
    }

    fn identities(&self) -> impl Iterator<Item = (&'a str, &'a Arc<dyn Identity>)> + 'a {
        self.wallet
            .plane_index(Capability::Identity)
            .ordered()
            .iter()
            .filter_map(|provider| {
                provider
                    .identity
                    .as_ref()
                    .map(|identity| (provider.name(), identity))
            })
    }

    /// Resolve the DID for `method`, or the providers' default when `None`.
    pub async fn resolve_identity(&self, method: Option<&str>) -> Result<String, WalletError> {
        for (name, identity) in self.identities() {
            match identity.resolve_identity(self.wallet, method).await {
                Ok(Some(did)) => return Ok(did),
                Ok(None) => {}
                Err(e) => debug!(provider = name, error = %e, "identity provider failed"),
            }
        }
        Err(WalletError::NoProviderFor {
            parameter: method.unwrap_or("default").to_string(),
        })
    }

    /// Resolve key material for `algorithm` (e.g. `ed25519`).
    pub async fn resolve_keypair(&self, algorithm: &str) -> Result<Keypair, WalletError> {
        for (name, identity) in self.identities() {
            match identity.resolve_keypair(self.wallet, algorithm).await {
                Ok(Some(keypair)) => return Ok(keypair),
                Ok(None) => {}
                Err(e) => debug!(provider = name, error = %e, "keypair provider failed"),
            }
        }
        Err(WalletError::NoProviderFor {
            parameter: algorithm.to_string(),
        })
    }
}
