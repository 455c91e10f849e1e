//! Schema version tag stored on the root group.

use crate::error::StorageError;
use crate::store::{AttrValue, Store};

pub const VERSION_ATTR: &str = "__version__";

/// Version written into stores that do not carry one yet
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Read the version tag without writing anything
pub fn get(store: &Store) -> Result<Option<String>, StorageError> {
    Ok(store
        .root()
        .get_attr(VERSION_ATTR)?
        .and_then(|v| v.as_str().map(str::to_string)))
}

/// Read the version tag, writing [`DEFAULT_VERSION`] first when absent.
///
/// Side effect: marks the store dirty when the tag had to be created.
pub fn get_or_init(store: &Store) -> Result<String, StorageError> {
    if let Some(version) = get(store)? {
        return Ok(version);
    }
    store
        .root()
        .set_attr(VERSION_ATTR, AttrValue::from(DEFAULT_VERSION))?;
    Ok(DEFAULT_VERSION.to_string())
}
