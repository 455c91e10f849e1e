//! Item Index: the ordered child-name registry of a collection.
//!
//! The persisted `item_names` array is the only record of child order.
//! Resolved handles are derived from it on demand and never cached next to
//! it, so the two cannot drift apart.

use crate::entity::ITEM_NAMES_ATTR;
use crate::error::{ApiError, StorageError};
use crate::store::{AttrValue, Group};

pub(crate) struct ItemIndex<'a> {
    group: &'a Group,
}

impl<'a> ItemIndex<'a> {
    pub fn new(group: &'a Group) -> Self {
        Self { group }
    }

    /// Persisted names in order; an absent array reads as empty (no write)
    pub fn names(&self) -> Result<Vec<String>, ApiError> {
        match self.group.get_attr(ITEM_NAMES_ATTR)? {
            None => Ok(Vec::new()),
            Some(AttrValue::StrArray(names)) => Ok(names),
            Some(other) => Err(StorageError::Corrupt {
                path: self.group.filepath().to_path_buf(),
                reason: format!(
                    "{} at {} is {} not a string array",
                    ITEM_NAMES_ATTR,
                    self.group.path(),
                    other.kind()
                ),
            }
            .into()),
        }
    }

    /// Persisted names, writing an empty array first when none exists
    pub fn get_or_init(&self) -> Result<Vec<String>, ApiError> {
        if !self.group.has_attr(ITEM_NAMES_ATTR)? {
            self.group
                .set_attr(ITEM_NAMES_ATTR, AttrValue::StrArray(Vec::new()))?;
        }
        self.names()
    }

    pub fn name_at(&self, position: usize) -> Result<String, ApiError> {
        let mut names = self.names()?;
        if position >= names.len() {
            return Err(ApiError::IndexOutOfRange {
                index: position,
                len: names.len(),
            });
        }
        Ok(names.swap_remove(position))
    }

    /// Validate an insertion and return the resulting name array.
    ///
    /// A name already used by an indexed child or by any existing child
    /// group is a duplicate. Nothing is written; `None` means append.
    pub fn plan_insert(&self, position: Option<usize>, name: &str) -> Result<Vec<String>, ApiError> {
        let mut names = self.names()?;
        if names.iter().any(|n| n == name) || self.group.contains(name)? {
            return Err(ApiError::DuplicateName {
                name: name.to_string(),
                parent: self.group.fullpath(),
            });
        }
        match position {
            None => names.push(name.to_string()),
            Some(pos) if pos <= names.len() => names.insert(pos, name.to_string()),
            Some(pos) => {
                return Err(ApiError::IndexOutOfRange {
                    index: pos,
                    len: names.len(),
                })
            }
        }
        Ok(names)
    }

    /// Replace the persisted array in a single attribute write
    pub fn commit(&self, names: Vec<String>) -> Result<(), ApiError> {
        self.group.set_attr(ITEM_NAMES_ATTR, AttrValue::StrArray(names))?;
        Ok(())
    }
}
