//! Temporary store paths for forked (non edit-in-place) objects.

use crate::error::{ApiError, StorageError};
use crate::DEFAULT_EXTENSION;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Hands out fresh, unique paths for temporary store files
pub trait TempFiles: Send + Sync {
    fn allocate(&self) -> Result<PathBuf, ApiError>;
}

/// Temporary stores under a directory (system temp dir by default).
///
/// Files are left on disk; cleaning them up is up to the process.
#[derive(Debug, Clone)]
pub struct SystemTempFiles {
    dir: PathBuf,
}

impl SystemTempFiles {
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for SystemTempFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl TempFiles for SystemTempFiles {
    fn allocate(&self) -> Result<PathBuf, ApiError> {
        allocate_in(&self.dir)
    }
}

/// Temporary stores inside a private directory removed on drop
pub struct ScratchTempFiles {
    dir: tempfile::TempDir,
}

impl ScratchTempFiles {
    pub fn new() -> Result<Self, ApiError> {
        let dir = tempfile::Builder::new()
            .prefix("wt5-scratch-")
            .tempdir()
            .map_err(|e| StorageError::io(std::env::temp_dir(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

impl TempFiles for ScratchTempFiles {
    fn allocate(&self) -> Result<PathBuf, ApiError> {
        allocate_in(self.dir.path())
    }
}

/// Default service shared by objects that were not given one
pub fn system() -> Arc<dyn TempFiles> {
    Arc::new(SystemTempFiles::new())
}

fn allocate_in(dir: &Path) -> Result<PathBuf, ApiError> {
    std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
    let suffix = format!(".{}", DEFAULT_EXTENSION);
    let file = tempfile::Builder::new()
        .prefix("wt5-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|e| StorageError::io(dir, e))?;
    // keep the (empty) file so the name stays reserved
    let (_, path) = file.keep().map_err(|e| StorageError::io(dir, e.error))?;
    Ok(path)
}
