//! wt5: hierarchical collections of spectroscopy data in a single-file store
//!
//! A [`Collection`] is a nestable, file-backed container mapping an ordered
//! tree of named children (sub-collections and [`Data`] objects) onto groups
//! of one store file. Children are typed lazily by their `class` tag.
//! Collections either edit their file in place or work on a temporary fork
//! that is only written back through [`Collection::save`].

pub mod collection;
pub mod config;
pub mod data;
pub mod entity;
pub mod error;
pub mod logging;
pub mod store;
pub mod tempfiles;
pub mod tooling;
pub mod tree;
pub mod units;
pub mod version;

pub use collection::{
    ClassRegistry, Collection, CollectionOptions, CollectionSource, Item, COLLECTION_CLASS,
};
pub use data::{Data, DataOptions, DATA_CLASS};
pub use error::{ApiError, StorageError};
pub use store::{AttrValue, Attributes, Group, Store};
pub use tempfiles::{ScratchTempFiles, SystemTempFiles, TempFiles};

use std::path::Path;
use std::sync::Arc;

/// File extension of store files
pub const DEFAULT_EXTENSION: &str = "wt5";

/// Open the root object of an existing store file, typed by its class tag.
///
/// Without `edit_local` the object works on a temporary fork of the file.
pub fn open(
    filepath: &Path,
    edit_local: bool,
    temp_files: Option<Arc<dyn TempFiles>>,
) -> Result<Item, ApiError> {
    if !filepath.is_file() {
        return Err(StorageError::Io {
            path: filepath.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such store file"),
        }
        .into());
    }
    let class = Store::open_or_create(filepath)?
        .root()
        .get_attr(entity::CLASS_ATTR)?;
    match class {
        Some(AttrValue::Str(class)) if class == COLLECTION_CLASS => {
            Collection::open(CollectionOptions {
                filepath: Some(filepath.to_path_buf()),
                edit_local,
                temp_files,
                ..Default::default()
            })
            .map(Item::Collection)
        }
        Some(AttrValue::Str(class)) if class == DATA_CLASS => Data::open(DataOptions {
            filepath: Some(filepath.to_path_buf()),
            edit_local,
            temp_files,
            ..Default::default()
        })
        .map(Item::Data),
        None => Err(ApiError::InvalidArgument(format!(
            "{} has no class tag at its root",
            filepath.display()
        ))),
        Some(other) => Err(ApiError::UnknownEntityClass {
            path: store::ROOT.to_string(),
            class: match other {
                AttrValue::Str(s) => s,
                other => other.to_string(),
            },
        }),
    }
}
