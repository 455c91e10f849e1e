//! Merge policy: defaults every builder starts from.

pub mod service;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

use super::DEFAULT_TREE_DEPTH;

/// Builder seeded with the built-in defaults (lowest precedence).
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("tree.depth", DEFAULT_TREE_DEPTH as i64)?
        .set_default("output.color", false)?
        .set_default("logging.level", "warn")?
        .set_default("logging.output", "stderr")
}
