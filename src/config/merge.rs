//! Source composition for [`WalletConfig`](super::WalletConfig).

pub(crate) mod merge_policy;
pub mod service;
