//! Child resolution: turn a raw child group into a typed item by its class tag.

use super::{Collection, CollectionOptions};
use crate::data::{Data, DataOptions, DATA_CLASS};
use crate::entity::{self, CLASS_ATTR};
use crate::error::{ApiError, StorageError};
use crate::store::{node, AttrValue, Group};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const COLLECTION_CLASS: &str = "Collection";

/// Builds the typed handle for child `name` of a collection
pub type Constructor = fn(&Collection, &str) -> Result<Item, ApiError>;

/// A resolved child of a collection
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Collection(Collection),
    Data(Data),
    /// A group with no class tag; not managed by this crate
    Group(Group),
}

impl Item {
    pub fn natural_name(&self) -> Result<String, ApiError> {
        match self {
            Item::Collection(c) => c.natural_name(),
            Item::Data(d) => d.natural_name(),
            Item::Group(g) => entity::natural_name(g),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Item::Collection(c) => c.path(),
            Item::Data(d) => d.path(),
            Item::Group(g) => g.path(),
        }
    }

    /// Class tag, or `"Group"` for unmanaged groups
    pub fn class_name(&self) -> &'static str {
        match self {
            Item::Collection(_) => COLLECTION_CLASS,
            Item::Data(_) => DATA_CLASS,
            Item::Group(_) => "Group",
        }
    }

    pub fn group(&self) -> &Group {
        match self {
            Item::Collection(c) => c.group(),
            Item::Data(d) => d.group(),
            Item::Group(g) => g,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Item::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&Data> {
        match self {
            Item::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Item::Collection(_))
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Item::Data(_))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Collection(c) => fmt::Display::fmt(c, f),
            Item::Data(d) => fmt::Display::fmt(d, f),
            Item::Group(g) => write!(f, "<Group at {}>", g.fullpath()),
        }
    }
}

/// Maps class tags to constructors
#[derive(Clone)]
pub struct ClassRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ClassRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registry knowing `Collection` and `Data`
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(COLLECTION_CLASS, open_child_collection);
        registry.register(DATA_CLASS, open_child_data);
        registry
    }

    pub fn register(&mut self, class: &str, constructor: Constructor) {
        self.constructors.insert(class.to_string(), constructor);
    }

    pub fn get(&self, class: &str) -> Option<Constructor> {
        self.constructors.get(class).copied()
    }

    /// Registered tags, sorted
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        classes.sort_unstable();
        classes
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.classes())
            .finish()
    }
}

/// Resolve child `name` of `parent` through its class tag
pub(crate) fn resolve_child(
    parent: &Collection,
    registry: &ClassRegistry,
    name: &str,
) -> Result<Item, ApiError> {
    let group = match parent.group().child(name) {
        Ok(group) => group,
        Err(StorageError::GroupNotFound { .. }) => {
            return Err(ApiError::ItemNotFound(node::join(parent.path(), name)))
        }
        Err(e) => return Err(e.into()),
    };
    match group.get_attr(CLASS_ATTR)? {
        None => {
            debug!(group = %group.fullpath(), "Child has no class tag");
            Ok(Item::Group(group))
        }
        Some(AttrValue::Str(class)) if class.is_empty() => Ok(Item::Group(group)),
        Some(AttrValue::Str(class)) => {
            let constructor = registry.get(&class).ok_or_else(|| ApiError::UnknownEntityClass {
                path: group.path().to_string(),
                class: class.clone(),
            })?;
            constructor(parent, name)
        }
        Some(other) => Err(ApiError::UnknownEntityClass {
            path: group.path().to_string(),
            class: other.to_string(),
        }),
    }
}

fn open_child_collection(parent: &Collection, name: &str) -> Result<Item, ApiError> {
    let collection = Collection::open(CollectionOptions {
        filepath: Some(parent.filepath().to_path_buf()),
        parent: Some(parent.path().to_string()),
        name: Some(name.to_string()),
        edit_local: true,
        attrs: Default::default(),
        temp_files: Some(Arc::clone(parent.temp_files())),
        classes: Some(Arc::clone(parent.classes())),
    })?;
    Ok(Item::Collection(collection))
}

fn open_child_data(parent: &Collection, name: &str) -> Result<Item, ApiError> {
    let data = Data::open(DataOptions {
        filepath: Some(parent.filepath().to_path_buf()),
        parent: Some(parent.path().to_string()),
        name: Some(name.to_string()),
        edit_local: true,
        attrs: Default::default(),
        temp_files: Some(Arc::clone(parent.temp_files())),
    })?;
    Ok(Item::Data(data))
}

