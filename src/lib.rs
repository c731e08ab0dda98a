//! Planar: Composable Capability Planes
//!
//! A pluggable runtime where independently written providers contribute
//! retrieval, persistence, indexing, caching, and identity behavior to a
//! single composite [`Wallet`]. Each capability is exposed through a plane
//! that fans out over every provider implementing it, with a cache overlay in
//! front of the read paths.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod plane;
pub mod provider;
pub mod types;
pub mod wallet;

pub use config::{ConfigLoader, WalletConfig};
pub use error::{ProviderError, WalletError};
pub use provider::{
    Caching, Capability, Identity, Indexing, Method, Persistence, Provider, ProviderInfo,
    Retrieval,
};
pub use types::{CacheMode, Content, Keypair, Page, PaginationOptions, Query, Record};
pub use wallet::{BoundMethod, Wallet};
