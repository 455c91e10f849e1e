//! Tree rendering for collections and data objects.

use crate::collection::{Collection, Item};
use crate::data::Data;
use crate::entity;
use crate::error::ApiError;
use serde::Serialize;
use std::collections::BTreeMap;

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Serialisable view of one node and (depth permitting) its children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub class: String,
    pub path: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

/// `name (file)` followed by one line per child, recursing `depth` levels
pub fn format_collection(
    collection: &Collection,
    verbose: bool,
    depth: usize,
) -> Result<String, ApiError> {
    let mut out = format!(
        "{} ({})\n",
        collection.natural_name()?,
        collection.fullpath()
    );
    if verbose {
        push_attrs(&mut out, "", &Item::Collection(collection.clone()))?;
    }
    push_branch(&mut out, collection, verbose, depth, "")?;
    Ok(out)
}

pub fn format_data(data: &Data, verbose: bool) -> Result<String, ApiError> {
    let mut out = format!("{} ({})\n", data.natural_name()?, data.fullpath());
    if verbose {
        push_attrs(&mut out, "", &Item::Data(data.clone()))?;
    }
    Ok(out)
}

fn push_branch(
    out: &mut String,
    collection: &Collection,
    verbose: bool,
    depth: usize,
    prefix: &str,
) -> Result<(), ApiError> {
    if depth == 0 {
        return Ok(());
    }
    let items = collection.items()?;
    let count = items.len();
    for (i, item) in items.iter().enumerate() {
        let last = i + 1 == count;
        out.push_str(prefix);
        out.push_str(if last { LAST } else { BRANCH });
        out.push_str(&format!(
            "{}: {} ({})\n",
            i,
            item.natural_name()?,
            item.class_name()
        ));
        let child_prefix = format!("{}{}", prefix, if last { SPACE } else { PIPE });
        if verbose {
            push_attrs(out, &child_prefix, item)?;
        }
        if let Item::Collection(child) = item {
            push_branch(out, child, verbose, depth - 1, &child_prefix)?;
        }
    }
    Ok(())
}

fn push_attrs(out: &mut String, prefix: &str, item: &Item) -> Result<(), ApiError> {
    for (key, value) in entity::user_attrs(item.group())? {
        out.push_str(&format!("{}  {} = {}\n", prefix, key, value));
    }
    Ok(())
}

/// Structured tree of `item` down to `depth` levels (attributes included)
pub fn summarize(item: &Item, depth: usize) -> Result<TreeNode, ApiError> {
    let attrs = entity::user_attrs(item.group())?
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    let mut children = Vec::new();
    if let (Item::Collection(collection), true) = (item, depth > 0) {
        for child in collection.iter()? {
            children.push(summarize(&child?, depth - 1)?);
        }
    }
    Ok(TreeNode {
        name: item.natural_name()?,
        class: item.class_name().to_string(),
        path: item.path().to_string(),
        attrs,
        children,
    })
}
