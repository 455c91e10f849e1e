//! Configuration
//!
//! Layered settings for the `wt5` tool: built-in defaults, the global config
//! file, an explicit `--config` file, then `WT5__*` environment variables.

mod facade;
mod merge;
mod sources;
mod storage;

pub use facade::ConfigLoader;
pub use storage::StorageConfig;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Default nesting depth for `wt5 tree`
pub const DEFAULT_TREE_DEPTH: usize = 9;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wt5Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub tree: TreeConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree printing defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default = "default_depth")]
    pub depth: usize,
}

fn default_depth() -> usize {
    DEFAULT_TREE_DEPTH
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
        }
    }
}

/// Terminal output options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Bold headings in text output
    #[serde(default)]
    pub color: bool,
}
