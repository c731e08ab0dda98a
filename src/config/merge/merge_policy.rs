//! Defaults applied before any source is layered on.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the settings every wallet starts from.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("background_refresh", true)?
        .set_default("logging.enabled", true)?
        .set_default("logging.level", "info")
}
