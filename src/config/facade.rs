//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::WalletConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults, the global file, an optional explicit
    /// file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<WalletConfig, ConfigError> {
        MergeService::load(path)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<WalletConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> WalletConfig {
        WalletConfig::default()
    }
}
