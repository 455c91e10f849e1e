//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::Wt5Config;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<Wt5Config, ConfigError> {
        MergeService::load()
    }

    /// Load configuration with a specific file layered over the global one.
    pub fn load_from_file(path: &Path) -> Result<Wt5Config, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> Wt5Config {
        Wt5Config::default()
    }
}
