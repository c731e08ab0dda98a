//! Method binder: one flat, name-addressable call surface over every
//! provider's exported methods.

use crate::error::WalletError;
use crate::provider::{Method, Provider};
use crate::wallet::Wallet;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Provider methods merged in registration order; later names override.
#[derive(Clone, Default)]
pub(crate) struct MethodTable {
    methods: HashMap<String, Method>,
}

impl MethodTable {
    pub(crate) fn bind(providers: &[Arc<Provider>]) -> Self {
        let mut methods = HashMap::new();
        for provider in providers {
            for (name, method) in &provider.methods {
                methods.insert(name.clone(), method.clone());
            }
        }
        Self { methods }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.methods.keys()).finish()
    }
}

/// A method paired with the wallet it was looked up on.
#[derive(Clone)]
pub struct BoundMethod {
    name: String,
    wallet: Wallet,
    method: Method,
}

impl BoundMethod {
    pub(crate) fn new(name: &str, wallet: Wallet, method: Method) -> Self {
        Self {
            name: name.to_string(),
            wallet,
            method,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the method; the bound wallet is passed as the first argument.
    pub async fn call(&self, args: Vec<Value>) -> Result<Value, WalletError> {
        (self.method)(self.wallet.clone(), args)
            .await
            .map_err(WalletError::from)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod").field("name", &self.name).finish()
    }
}
