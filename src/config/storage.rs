//! StorageConfig: where temporary forks are created.

use crate::tempfiles::{SystemTempFiles, TempFiles};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for temporary store forks; system temp dir when unset
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Temporary-file service for this configuration
    pub fn temp_files(&self) -> Arc<dyn TempFiles> {
        match &self.temp_dir {
            Some(dir) => Arc::new(SystemTempFiles::in_dir(dir.clone())),
            None => Arc::new(SystemTempFiles::new()),
        }
    }
}
