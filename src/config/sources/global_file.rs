//! Global config file: `<config dir>/wt5/config.toml`, optional.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::PathBuf;

/// Platform config file location, if the platform has a config directory
pub fn path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "wt5").map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match path() {
        Some(path) => Ok(builder.add_source(File::from(path).required(false))),
        None => Ok(builder),
    }
}
