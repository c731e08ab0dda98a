//! `PLANAR__*` environment overlay, applied last so it beats every file.
//!
//! Keys map onto [`crate::WalletConfig`] with `__` between nesting levels:
//!
//! - `PLANAR__BACKGROUND_REFRESH=false` turns off refresh after cache-first hits
//! - `PLANAR__LOGGING__LEVEL`, `PLANAR__LOGGING__FORMAT`, `PLANAR__LOGGING__OUTPUT`
//!   and `PLANAR__LOGGING__FILE` override the `[logging]` table
//!
//! The single-underscore `PLANAR_LOG*` variables are a separate thing: they are
//! read by [`crate::logging::init_logging`] at subscriber setup, not here.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

const PREFIX: &str = "PLANAR";
const SEPARATOR: &str = "__";

/// Layer the process environment over `builder`. Values are parsed, so
/// `"false"` lands as a bool rather than a string.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(PREFIX)
            .prefix_separator(SEPARATOR)
            .separator(SEPARATOR)
            .try_parsing(true),
    ))
}
