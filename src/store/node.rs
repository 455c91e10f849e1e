//! In-memory group tree and path helpers

use crate::error::ApiError;
use crate::store::attrs::Attributes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root group path
pub const ROOT: &str = "/";

/// One group: its attributes and its named sub-groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub attrs: Attributes,
    pub children: BTreeMap<String, GroupNode>,
}

impl GroupNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `path` from this node
    pub fn find(&self, path: &str) -> Option<&GroupNode> {
        let mut node = self;
        for segment in segments(path) {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut GroupNode> {
        let mut node = self;
        for segment in segments(path) {
            node = node.children.get_mut(segment)?;
        }
        Some(node)
    }

    /// Walk `path`, creating missing groups along the way.
    ///
    /// Returns the node and whether anything was created.
    pub fn require(&mut self, path: &str) -> (&mut GroupNode, bool) {
        let mut created = false;
        let mut node = self;
        for segment in segments(path) {
            if !node.children.contains_key(segment) {
                created = true;
            }
            node = node.children.entry(segment.to_string()).or_default();
        }
        (node, created)
    }

    /// Number of groups in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.values().map(GroupNode::count).sum::<usize>()
    }
}

/// Non-empty path segments
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Normalize to `/a/b` form; root is `/`
pub fn normalize(path: &str) -> String {
    let parts: Vec<&str> = segments(path).collect();
    if parts.is_empty() {
        ROOT.to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// `parent + '/' + name`, normalized
pub fn join(parent: &str, name: &str) -> String {
    normalize(&format!("{}/{}", parent, name))
}

/// Last segment of a path; empty for root
pub fn basename(path: &str) -> &str {
    segments(path).last().unwrap_or("")
}

/// Parent path; root is its own parent
pub fn parent(path: &str) -> String {
    let parts: Vec<&str> = segments(path).collect();
    match parts.len() {
        0 | 1 => ROOT.to_string(),
        n => format!("/{}", parts[..n - 1].join("/")),
    }
}

/// A child name must be a single non-empty path segment
pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() {
        return Err(ApiError::InvalidArgument(
            "group name must not be empty".to_string(),
        ));
    }
    if name.contains('/') {
        return Err(ApiError::InvalidArgument(format!(
            "group name '{}' must not contain '/'",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(ApiError::InvalidArgument(format!(
            "group name '{}' is reserved",
            name
        )));
    }
    Ok(())
}
