//! Integration tests for wt5 collections, persistence and the CLI

mod child_resolution;
mod cli_contracts;
mod collection_lifecycle;
mod persistence;
mod properties;

use std::sync::Arc;
use wt5::{ScratchTempFiles, TempFiles};

/// Temp-file service whose forks vanish with the returned handle
pub fn scratch() -> Arc<dyn TempFiles> {
    Arc::new(ScratchTempFiles::new().unwrap())
}
