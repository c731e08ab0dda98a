//! Per-user config file: `<platform config dir>/planar/config.toml`, optional.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::PathBuf;

/// Location of the global config file, if the platform has a config dir.
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "planar", "planar")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Layer the global file onto the builder when it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match global_config_path() {
        Some(path) => Ok(builder.add_source(File::from(path).required(false))),
        None => Ok(builder),
    }
}
