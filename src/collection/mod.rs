//! Collections
//!
//! A collection is a nestable, ordered container of child collections and
//! data objects, bound to one group of a store file. It holds the group
//! handle and delegates attribute and child access to it; child order lives
//! in the persisted Item Index.

mod index;
pub mod persist;
mod resolve;

pub use resolve::{ClassRegistry, Constructor, Item, COLLECTION_CLASS};

use crate::data::{Data, DataOptions, DEFAULT_DATA_NAME};
use crate::entity::{self, Binding};
use crate::error::{ApiError, StorageError};
use crate::store::{node, AttrValue, Attributes, Group};
use crate::tempfiles::{self, TempFiles};
use crate::tree::{self, TreeNode};
use crate::version;
use index::ItemIndex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_COLLECTION_NAME: &str = "collection";

/// Construction parameters for [`Collection::open`]
#[derive(Default)]
pub struct CollectionOptions {
    /// Existing store to fork (or to edit when `edit_local`)
    pub filepath: Option<PathBuf>,
    /// Internal path of the parent collection; `None` binds the root group
    pub parent: Option<String>,
    pub name: Option<String>,
    /// Edit `filepath` directly instead of a private temporary fork
    pub edit_local: bool,
    pub attrs: Attributes,
    pub temp_files: Option<Arc<dyn TempFiles>>,
    pub classes: Option<Arc<ClassRegistry>>,
}

/// What `add_collection` inserts
pub enum CollectionSource<'a> {
    /// A new, empty child collection
    Name(&'a str),
    /// A deep copy of an existing collection, from this or another file
    Copy(&'a Collection),
}

impl<'a> From<&'a str> for CollectionSource<'a> {
    fn from(name: &'a str) -> Self {
        CollectionSource::Name(name)
    }
}

impl<'a> From<&'a Collection> for CollectionSource<'a> {
    fn from(collection: &'a Collection) -> Self {
        CollectionSource::Copy(collection)
    }
}

/// Handle to a collection group
#[derive(Clone)]
pub struct Collection {
    group: Group,
    temp_files: Arc<dyn TempFiles>,
    classes: Arc<ClassRegistry>,
}

impl Collection {
    /// Open or create a collection.
    ///
    /// Without `edit_local` the collection works on a fresh temporary fork of
    /// `filepath` (or an empty store); the original file is never written.
    /// Every persisted child is resolved once, so unreadable children fail here.
    pub fn open(options: CollectionOptions) -> Result<Self, ApiError> {
        let temp_files = options.temp_files.unwrap_or_else(tempfiles::system);
        let classes = options
            .classes
            .unwrap_or_else(|| Arc::new(ClassRegistry::standard()));
        let group = entity::bind(
            Binding {
                filepath: options.filepath.as_deref(),
                parent: options.parent.as_deref(),
                name: options.name.as_deref(),
                edit_local: options.edit_local,
                attrs: &options.attrs,
                temp_files: temp_files.as_ref(),
            },
            COLLECTION_CLASS,
            DEFAULT_COLLECTION_NAME,
        )?;
        let collection = Self {
            group,
            temp_files,
            classes,
        };
        let names = ItemIndex::new(&collection.group).get_or_init()?;
        for name in &names {
            collection.get_by_name(name)?;
        }
        debug!(
            collection = %collection.group.fullpath(),
            items = names.len(),
            "Opened collection"
        );
        Ok(collection)
    }

    /// Empty root collection on a fresh temporary store
    pub fn create(temp_files: Arc<dyn TempFiles>) -> Result<Self, ApiError> {
        Self::open(CollectionOptions {
            temp_files: Some(temp_files),
            ..Default::default()
        })
    }

    /// Root collection of `filepath`, edited in place
    pub fn open_local(filepath: &Path) -> Result<Self, ApiError> {
        Self::open(CollectionOptions {
            filepath: Some(filepath.to_path_buf()),
            edit_local: true,
            ..Default::default()
        })
    }

    pub fn natural_name(&self) -> Result<String, ApiError> {
        entity::natural_name(&self.group)
    }

    /// Backing store file
    pub fn filepath(&self) -> &Path {
        self.group.filepath()
    }

    /// Internal group path
    pub fn path(&self) -> &str {
        self.group.path()
    }

    /// `<filepath>::<path>`
    pub fn fullpath(&self) -> String {
        self.group.fullpath()
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub(crate) fn temp_files(&self) -> &Arc<dyn TempFiles> {
        &self.temp_files
    }

    pub(crate) fn classes(&self) -> &Arc<ClassRegistry> {
        &self.classes
    }

    /// Store schema version. Writes the default tag if it is somehow absent.
    pub fn version(&self) -> Result<String, ApiError> {
        Ok(version::get_or_init(self.group.store())?)
    }

    /// User attributes (the managed `class`, `name`, `item_names` are omitted)
    pub fn attrs(&self) -> Result<Attributes, ApiError> {
        entity::user_attrs(&self.group)
    }

    pub fn attr(&self, key: &str) -> Result<Option<AttrValue>, ApiError> {
        Ok(self.group.get_attr(key)?)
    }

    pub fn set_attr(&self, key: &str, value: impl Into<AttrValue>) -> Result<(), ApiError> {
        let mut attrs = Attributes::new();
        attrs.insert(key.to_string(), value.into());
        entity::check_reserved(&attrs)?;
        Ok(self.group.update_attrs(&attrs)?)
    }

    /// Ordered names of the direct children
    pub fn item_names(&self) -> Result<Vec<String>, ApiError> {
        ItemIndex::new(&self.group).names()
    }

    pub fn len(&self) -> Result<usize, ApiError> {
        Ok(self.item_names()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ApiError> {
        Ok(self.len()? == 0)
    }

    /// Child at `position` in index order
    pub fn get(&self, position: usize) -> Result<Item, ApiError> {
        let name = ItemIndex::new(&self.group).name_at(position)?;
        self.get_by_name(&name)
    }

    /// Child group `name`, typed by its class tag
    pub fn get_by_name(&self, name: &str) -> Result<Item, ApiError> {
        resolve::resolve_child(self, &self.classes, name)
    }

    /// Resolve a relative or absolute internal path below this collection.
    ///
    /// Every intermediate segment must be a collection.
    pub fn get_path(&self, path: &str) -> Result<Item, ApiError> {
        let mut current = Item::Collection(self.clone());
        for segment in node::segments(path) {
            let collection = current.as_collection().ok_or_else(|| {
                ApiError::ItemNotFound(node::join(current.path(), segment))
            })?;
            current = collection.get_by_name(segment)?;
        }
        Ok(current)
    }

    /// Resolved children in index order
    pub fn items(&self) -> Result<Vec<Item>, ApiError> {
        self.iter()?.collect()
    }

    /// Lazy iterator over the children named in the index at call time
    pub fn iter(&self) -> Result<Items, ApiError> {
        Ok(Items {
            collection: self.clone(),
            names: self.item_names()?.into_iter(),
        })
    }

    /// Add a child collection at `position` (append when `None`)
    pub fn add_collection<'a>(
        &self,
        source: impl Into<CollectionSource<'a>>,
        position: Option<usize>,
        attrs: Attributes,
    ) -> Result<Collection, ApiError> {
        let source = source.into();
        let name = match &source {
            CollectionSource::Name(name) => name.to_string(),
            CollectionSource::Copy(other) => other.natural_name()?,
        };
        node::validate_name(&name)?;
        entity::check_reserved(&attrs)?;
        let index = ItemIndex::new(&self.group);
        let names = index.plan_insert(position, &name)?;

        if let CollectionSource::Copy(other) = &source {
            let copied = self.group.copy_subtree(other.group(), &name)?;
            // a copied root brings the source store's version tag along
            copied.remove_attr(version::VERSION_ATTR)?;
        }
        let child = Collection::open(CollectionOptions {
            filepath: Some(self.filepath().to_path_buf()),
            parent: Some(self.path().to_string()),
            name: Some(name.clone()),
            edit_local: true,
            attrs,
            temp_files: Some(Arc::clone(&self.temp_files)),
            classes: Some(Arc::clone(&self.classes)),
        })?;
        index.commit(names)?;
        info!(parent = %self.fullpath(), child = %name, ?position, "Added collection");
        Ok(child)
    }

    /// Add a new data object at `position` (append when `None`)
    pub fn add_data(
        &self,
        name: Option<&str>,
        position: Option<usize>,
        attrs: Attributes,
    ) -> Result<Data, ApiError> {
        let name = name.unwrap_or(DEFAULT_DATA_NAME);
        node::validate_name(name)?;
        entity::check_reserved(&attrs)?;
        let index = ItemIndex::new(&self.group);
        let names = index.plan_insert(position, name)?;

        let data = Data::open(DataOptions {
            filepath: Some(self.filepath().to_path_buf()),
            parent: Some(self.path().to_string()),
            name: Some(name.to_string()),
            edit_local: true,
            attrs,
            temp_files: Some(Arc::clone(&self.temp_files)),
        })?;
        index.commit(names)?;
        info!(parent = %self.fullpath(), child = %name, ?position, "Added data");
        Ok(data)
    }

    /// Write pending changes of the backing store to disk
    pub fn flush(&self) -> Result<(), ApiError> {
        self.group.store().flush().map_err(ApiError::from)
    }

    /// Flush, then copy the whole backing store to a permanent file.
    ///
    /// Returns the resolved destination; prints it when `verbose`.
    pub fn save(&self, filepath: Option<&Path>, verbose: bool) -> Result<PathBuf, ApiError> {
        self.flush()?;
        let cwd = std::env::current_dir().map_err(|e| StorageError::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        let home = persist::home_dir();
        let destination =
            persist::resolve_destination(filepath, &self.natural_name()?, &cwd, home.as_deref());
        crate::store::Store::copy_file(self.filepath(), &destination)?;
        info!(src = %self.filepath().display(), dst = %destination.display(), "Saved collection");
        if verbose {
            println!("{}", destination.display());
        }
        Ok(destination)
    }

    /// Tree rendering down to `depth` levels of nesting
    pub fn format_tree(&self, verbose: bool, depth: usize) -> Result<String, ApiError> {
        tree::format_collection(self, verbose, depth)
    }

    pub fn print_tree(&self, verbose: bool, depth: usize) -> Result<(), ApiError> {
        print!("{}", self.format_tree(verbose, depth)?);
        Ok(())
    }

    /// Serialisable tree down to `depth` levels
    pub fn tree_summary(&self, depth: usize) -> Result<TreeNode, ApiError> {
        tree::summarize(&Item::Collection(self.clone()), depth)
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection({})", self.group.fullpath())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .natural_name()
            .unwrap_or_else(|_| self.group.name().to_string());
        let names = self.item_names().unwrap_or_default();
        write!(
            f,
            "<Collection '{}' [{}] at {}>",
            name,
            names.join(", "),
            self.group.fullpath()
        )
    }
}

/// Iterator returned by [`Collection::iter`]
pub struct Items {
    collection: Collection,
    names: std::vec::IntoIter<String>,
}

impl Iterator for Items {
    type Item = Result<Item, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        Some(self.collection.get_by_name(&name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}
