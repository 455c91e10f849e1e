//! Single-file hierarchical store
//!
//! A store is one file holding a tree of named groups, each with a set of
//! typed attributes. Writes land in an in-memory image shared by every handle
//! opened on the same path; `flush` makes them durable.

pub mod attrs;
pub mod codec;
pub mod node;
mod open_files;

pub use attrs::{AttrValue, Attributes};
pub use node::{GroupNode, ROOT};

use crate::error::StorageError;
use parking_lot::RwLock;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared in-memory image of one store file
pub(crate) struct StoreFile {
    path: PathBuf,
    state: RwLock<StoreState>,
}

struct StoreState {
    root: GroupNode,
    dirty: bool,
}

impl Drop for StoreFile {
    fn drop(&mut self) {
        if self.state.get_mut().dirty {
            debug!(path = %self.path.display(), "Closing store with unflushed changes");
        }
    }
}

/// Handle to an open store file. Clones share the same image.
#[derive(Clone)]
pub struct Store {
    file: Arc<StoreFile>,
}

impl Store {
    /// Open `path` for read/write, creating an empty store if it is absent
    pub fn open_or_create(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
            let bytes = codec::encode(&GroupNode::new())?;
            std::fs::write(path, bytes).map_err(|e| StorageError::io(path, e))?;
            info!(path = %path.display(), "Created store");
        }
        let canonical = dunce::canonicalize(path).map_err(|e| StorageError::io(path, e))?;
        let file = open_files::get_or_open(&canonical, || {
            let bytes = std::fs::read(&canonical).map_err(|e| StorageError::io(&canonical, e))?;
            let root = codec::decode(&canonical, &bytes)?;
            debug!(path = %canonical.display(), groups = root.count(), "Loaded store");
            Ok::<_, StorageError>(Arc::new(StoreFile {
                path: canonical.clone(),
                state: RwLock::new(StoreState { root, dirty: false }),
            }))
        })?;
        Ok(Self { file })
    }

    /// Canonical path of the backing file
    pub fn path(&self) -> &Path {
        &self.file.path
    }

    /// True when the image holds writes not yet flushed
    pub fn is_dirty(&self) -> bool {
        self.file.state.read().dirty
    }

    pub fn root(&self) -> Group {
        Group {
            store: self.clone(),
            path: ROOT.to_string(),
        }
    }

    /// Handle to an existing group
    pub fn group(&self, path: &str) -> Result<Group, StorageError> {
        let path = node::normalize(path);
        if self.read(|root| root.find(&path).is_none()) {
            return Err(StorageError::GroupNotFound { path });
        }
        Ok(Group {
            store: self.clone(),
            path,
        })
    }

    /// Create the group at `path` if absent, else open it.
    ///
    /// The flag is true when a group was created.
    pub fn require_group(&self, path: &str) -> Result<(Group, bool), StorageError> {
        let path = node::normalize(path);
        let created = if self.read(|root| root.find(&path).is_some()) {
            false
        } else {
            self.write(|root| root.require(&path).1)
        };
        if created {
            debug!(store = %self.path().display(), group = %path, "Created group");
        }
        Ok((
            Group {
                store: self.clone(),
                path,
            },
            created,
        ))
    }

    /// Write the image to disk, replacing the file atomically. No-op when clean.
    pub fn flush(&self) -> Result<(), StorageError> {
        let mut state = self.file.state.write();
        if !state.dirty {
            return Ok(());
        }
        let bytes = codec::encode(&state.root)?;
        write_atomic(&self.file.path, &bytes)?;
        state.dirty = false;
        debug!(path = %self.file.path.display(), bytes = bytes.len(), "Flushed store");
        Ok(())
    }

    /// Duplicate the whole store file at `src` into `dst`.
    ///
    /// When `src` is open in this process with unflushed writes, its current
    /// image is written instead of the stale file. `dst` is replaced
    /// atomically; a live image of `dst` is reloaded from the new contents.
    /// Copying a file onto itself only flushes its live image.
    pub fn copy_file(src: &Path, dst: &Path) -> Result<(), StorageError> {
        let src_canonical = dunce::canonicalize(src).map_err(|e| StorageError::io(src, e))?;
        let live = open_files::lookup(&src_canonical);
        if dst.exists() {
            let dst_canonical = dunce::canonicalize(dst).map_err(|e| StorageError::io(dst, e))?;
            if dst_canonical == src_canonical {
                if let Some(file) = live {
                    Store { file }.flush()?;
                }
                debug!(path = %src_canonical.display(), "Copy onto itself, nothing to do");
                return Ok(());
            }
        } else if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let bytes = match live {
            Some(file) if file.state.read().dirty => codec::encode(&file.state.read().root)?,
            _ => std::fs::read(&src_canonical).map_err(|e| StorageError::io(&src_canonical, e))?,
        };
        write_atomic(dst, &bytes)?;
        info!(src = %src_canonical.display(), dst = %dst.display(), "Copied store file");

        let dst_canonical = dunce::canonicalize(dst).map_err(|e| StorageError::io(dst, e))?;
        if let Some(file) = open_files::lookup(&dst_canonical) {
            let root = codec::decode(&dst_canonical, &bytes)?;
            let mut state = file.state.write();
            state.root = root;
            state.dirty = false;
        }
        Ok(())
    }

    fn read<R>(&self, f: impl FnOnce(&GroupNode) -> R) -> R {
        f(&self.file.state.read().root)
    }

    fn write<R>(&self, f: impl FnOnce(&mut GroupNode) -> R) -> R {
        let mut state = self.file.state.write();
        state.dirty = true;
        f(&mut state.root)
    }

    fn same_file(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.file, &other.file)
    }
}

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        self.same_file(other)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("path", &self.file.path).finish()
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| StorageError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StorageError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| StorageError::io(path, e.error))?;
    Ok(())
}

/// Handle to one group inside a store: (store, absolute path)
#[derive(Clone, PartialEq)]
pub struct Group {
    store: Store,
    path: String,
}

impl Group {
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Absolute path inside the store
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Structural name (last path segment); empty for the root
    pub fn name(&self) -> &str {
        node::basename(&self.path)
    }

    pub fn filepath(&self) -> &Path {
        self.store.path()
    }

    pub fn exists(&self) -> bool {
        self.store.read(|root| root.find(&self.path).is_some())
    }

    pub fn get_attr(&self, key: &str) -> Result<Option<AttrValue>, StorageError> {
        self.with_node(|node| node.attrs.get(key).cloned())
    }

    pub fn has_attr(&self, key: &str) -> Result<bool, StorageError> {
        self.with_node(|node| node.attrs.contains_key(key))
    }

    pub fn set_attr(&self, key: &str, value: impl Into<AttrValue>) -> Result<(), StorageError> {
        let value = value.into();
        self.with_node_mut(|node| {
            node.attrs.insert(key.to_string(), value);
        })
    }

    /// Merge `attrs` into this group, last write wins per key.
    ///
    /// Keys whose stored value already matches are skipped.
    pub fn update_attrs(&self, attrs: &Attributes) -> Result<(), StorageError> {
        let changed: Vec<(String, AttrValue)> = self.with_node(|node| {
            attrs
                .iter()
                .filter(|(k, v)| node.attrs.get(*k) != Some(*v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })?;
        if changed.is_empty() {
            return Ok(());
        }
        self.with_node_mut(|node| node.attrs.extend(changed))
    }

    /// Remove `key`; returns the old value
    pub fn remove_attr(&self, key: &str) -> Result<Option<AttrValue>, StorageError> {
        if !self.has_attr(key)? {
            return Ok(None);
        }
        self.with_node_mut(|node| node.attrs.remove(key))
    }

    /// Snapshot of all attributes
    pub fn attrs(&self) -> Result<Attributes, StorageError> {
        self.with_node(|node| node.attrs.clone())
    }

    /// Attribute keys, sorted
    pub fn attr_keys(&self) -> Result<Vec<String>, StorageError> {
        self.with_node(|node| node.attrs.keys().cloned().collect())
    }

    pub fn contains(&self, name: &str) -> Result<bool, StorageError> {
        self.with_node(|node| node.children.contains_key(name))
    }

    /// Child group names in store-native (sorted) order
    pub fn child_names(&self) -> Result<Vec<String>, StorageError> {
        self.with_node(|node| node.children.keys().cloned().collect())
    }

    /// Existing child group by name
    pub fn child(&self, name: &str) -> Result<Group, StorageError> {
        self.store.group(&node::join(&self.path, name))
    }

    /// Create the child group if absent, else open it
    pub fn require_group(&self, name: &str) -> Result<(Group, bool), StorageError> {
        if !self.exists() {
            return Err(self.not_found());
        }
        self.store.require_group(&node::join(&self.path, name))
    }

    /// Deep-copy `source` (from any store) into this group as `dest_name`.
    ///
    /// An existing child with that name is replaced.
    pub fn copy_subtree(&self, source: &Group, dest_name: &str) -> Result<Group, StorageError> {
        let snapshot = source.with_node(|node| node.clone())?;
        let groups = snapshot.count();
        self.with_node_mut(|node| {
            node.children.insert(dest_name.to_string(), snapshot);
        })?;
        info!(
            src = %source.fullpath(),
            dst = %node::join(&self.path, dest_name),
            groups,
            "Copied subtree"
        );
        self.child(dest_name)
    }

    /// `<filepath>::<path>`
    pub fn fullpath(&self) -> String {
        format!("{}::{}", self.filepath().display(), self.path)
    }

    fn with_node<R>(&self, f: impl FnOnce(&GroupNode) -> R) -> Result<R, StorageError> {
        self.store
            .read(|root| root.find(&self.path).map(f))
            .ok_or_else(|| self.not_found())
    }

    fn with_node_mut<R>(&self, f: impl FnOnce(&mut GroupNode) -> R) -> Result<R, StorageError> {
        if !self.exists() {
            return Err(self.not_found());
        }
        self.store
            .write(|root| root.find_mut(&self.path).map(f))
            .ok_or_else(|| self.not_found())
    }

    fn not_found(&self) -> StorageError {
        StorageError::GroupNotFound {
            path: self.path.clone(),
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.fullpath())
    }
}
