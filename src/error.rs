//! Error types
//!
//! `StorageError` covers the single-file store; `ApiError` is what the
//! collection/data layer and the CLI hand back to callers.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the store backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt store {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Group not found: {path}")]
    GroupNotFound { path: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Codec(err.to_string())
    }
}

/// Errors surfaced by collections, data objects and the command layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unknown entity class '{class}' at {path}")]
    UnknownEntityClass { path: String, class: String },

    #[error("Index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Duplicate item name '{name}' in {parent}")]
    DuplicateName { name: String, parent: String },

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// True when the failure came from the store backend
    pub fn is_storage(&self) -> bool {
        matches!(self, ApiError::Storage(_))
    }
}
