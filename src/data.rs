//! Data objects
//!
//! Leaf entities tagged `class = "Data"`. Channels and axes live below the
//! data group and are not interpreted here; this type only owns the group
//! binding, naming and tree rendering.

use crate::entity::{self, Binding};
use crate::error::ApiError;
use crate::store::{AttrValue, Attributes, Group};
use crate::tempfiles::{self, TempFiles};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const DATA_CLASS: &str = "Data";
pub const DEFAULT_DATA_NAME: &str = "data";

/// Construction parameters for [`Data::open`]
#[derive(Default)]
pub struct DataOptions {
    pub filepath: Option<PathBuf>,
    pub parent: Option<String>,
    pub name: Option<String>,
    pub edit_local: bool,
    pub attrs: Attributes,
    pub temp_files: Option<Arc<dyn TempFiles>>,
}

/// Handle to a data group
#[derive(Clone)]
pub struct Data {
    group: Group,
}

impl Data {
    pub fn open(options: DataOptions) -> Result<Self, ApiError> {
        let temp_files = options.temp_files.unwrap_or_else(tempfiles::system);
        let group = entity::bind(
            Binding {
                filepath: options.filepath.as_deref(),
                parent: options.parent.as_deref(),
                name: options.name.as_deref(),
                edit_local: options.edit_local,
                attrs: &options.attrs,
                temp_files: temp_files.as_ref(),
            },
            DATA_CLASS,
            DEFAULT_DATA_NAME,
        )?;
        debug!(data = %group.fullpath(), "Opened data");
        Ok(Self { group })
    }

    pub fn natural_name(&self) -> Result<String, ApiError> {
        entity::natural_name(&self.group)
    }

    pub fn path(&self) -> &str {
        self.group.path()
    }

    pub fn filepath(&self) -> &Path {
        self.group.filepath()
    }

    pub fn fullpath(&self) -> String {
        self.group.fullpath()
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

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

    /// One header line, plus one line per attribute when verbose
    pub fn format_tree(&self, verbose: bool) -> Result<String, ApiError> {
        crate::tree::format_data(self, verbose)
    }

    pub fn print_tree(&self, verbose: bool) -> Result<(), ApiError> {
        print!("{}", self.format_tree(verbose)?);
        Ok(())
    }
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Data({})", self.group.fullpath())
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .natural_name()
            .unwrap_or_else(|_| self.group.name().to_string());
        write!(f, "<Data '{}' at {}>", name, self.group.fullpath())
    }
}
