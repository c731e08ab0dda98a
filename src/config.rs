//! Wallet configuration.
//!
//! Loaded with the `config` crate from defaults, an optional global file, an
//! optional explicit file, and `PLANAR__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Runtime settings for a composed wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Refresh cached entries in the background after a cache-first hit
    #[serde(default = "default_true")]
    pub background_refresh: bool,

    /// Logging settings, consumed by [`crate::logging::init_logging`]
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            background_refresh: default_true(),
            logging: LoggingConfig::default(),
        }
    }
}
