//! Binding shared by Collection and Data construction.
//!
//! Resolves the backing file (fork or edit in place), opens the store,
//! requires the target group and stamps the class/name attributes.

use crate::error::ApiError;
use crate::store::{node, AttrValue, Attributes, Group, Store};
use crate::tempfiles::TempFiles;
use crate::version;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CLASS_ATTR: &str = "class";
pub const NAME_ATTR: &str = "name";
pub const CREATED_ATTR: &str = "created";
pub const ITEM_NAMES_ATTR: &str = "item_names";

/// Attribute keys callers may not set directly
pub const RESERVED_ATTRS: [&str; 3] = [CLASS_ATTR, NAME_ATTR, ITEM_NAMES_ATTR];

/// Everything needed to bind an entity to a group
pub(crate) struct Binding<'a> {
    pub filepath: Option<&'a Path>,
    pub parent: Option<&'a str>,
    pub name: Option<&'a str>,
    pub edit_local: bool,
    pub attrs: &'a Attributes,
    pub temp_files: &'a dyn TempFiles,
}

/// Resolve the backing file per the fork / edit-in-place rules
pub(crate) fn resolve_filepath(
    filepath: Option<&Path>,
    edit_local: bool,
    temp_files: &dyn TempFiles,
) -> Result<PathBuf, ApiError> {
    match (edit_local, filepath) {
        (true, None) => Err(ApiError::InvalidArgument(
            "edit_local requires a filepath".to_string(),
        )),
        (true, Some(path)) => Ok(path.to_path_buf()),
        (false, source) => {
            let target = temp_files.allocate()?;
            if let Some(source) = source {
                Store::copy_file(source, &target)?;
                debug!(src = %source.display(), fork = %target.display(), "Forked store");
            }
            Ok(target)
        }
    }
}

pub(crate) fn check_reserved(attrs: &Attributes) -> Result<(), ApiError> {
    if let Some(key) = attrs.keys().find(|k| RESERVED_ATTRS.contains(&k.as_str())) {
        return Err(ApiError::InvalidArgument(format!(
            "attribute '{}' is managed by the object and cannot be set",
            key
        )));
    }
    Ok(())
}

/// Open or create the group described by `binding`, tagged as `class`.
///
/// Writes happen only where a value is missing or differs, so re-binding a
/// consistent group leaves the store clean.
pub(crate) fn bind(binding: Binding<'_>, class: &str, default_name: &str) -> Result<Group, ApiError> {
    check_reserved(binding.attrs)?;
    if let Some(name) = binding.name {
        node::validate_name(name)?;
    }
    let path = match binding.parent {
        None => node::ROOT.to_string(),
        Some(parent) => node::join(parent, binding.name.unwrap_or(default_name)),
    };

    let filepath = resolve_filepath(binding.filepath, binding.edit_local, binding.temp_files)?;
    let store = Store::open_or_create(&filepath)?;
    version::get_or_init(&store)?;
    let (group, created) = store.require_group(&path)?;

    group.update_attrs(binding.attrs)?;
    set_if_changed(&group, CLASS_ATTR, AttrValue::from(class))?;
    let name = match binding.name {
        Some(name) => name.to_string(),
        None => match binding.parent {
            Some(_) => default_name.to_string(),
            None => group
                .get_attr(NAME_ATTR)?
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| default_name.to_string()),
        },
    };
    set_if_changed(&group, NAME_ATTR, AttrValue::from(name))?;
    if !group.has_attr(CREATED_ATTR)? {
        group.set_attr(CREATED_ATTR, chrono::Utc::now().to_rfc3339())?;
    }
    if created {
        debug!(group = %group.fullpath(), class, "Bound new group");
    }
    Ok(group)
}

pub(crate) fn set_if_changed(group: &Group, key: &str, value: AttrValue) -> Result<(), ApiError> {
    if group.get_attr(key)?.as_ref() != Some(&value) {
        group.set_attr(key, value)?;
    }
    Ok(())
}

/// Natural name of a group: its `name` attribute, else its path segment
pub(crate) fn natural_name(group: &Group) -> Result<String, ApiError> {
    Ok(group
        .get_attr(NAME_ATTR)?
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| group.name().to_string()))
}

/// Attributes minus the ones managed by the entity layer
pub(crate) fn user_attrs(group: &Group) -> Result<Attributes, ApiError> {
    let mut attrs = group.attrs()?;
    attrs.retain(|k, _| !RESERVED_ATTRS.contains(&k.as_str()) && k != version::VERSION_ATTR);
    Ok(attrs)
}
