//! Named provider operations.

use crate::error::ProviderError;
use crate::wallet::Wallet;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// A provider-exported operation. The first argument is always the wallet the
/// call is made through.
pub type Method =
    Arc<dyn Fn(Wallet, Vec<Value>) -> BoxFuture<'static, Result<Value, ProviderError>> + Send + Sync>;

/// Box an async closure into a [`Method`].
pub fn method<F, Fut>(f: F) -> Method
where
    F: Fn(Wallet, Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ProviderError>> + Send + 'static,
{
    Arc::new(move |wallet: Wallet, args: Vec<Value>| f(wallet, args).boxed())
}
