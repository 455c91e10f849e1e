//! On-disk encoding of a store file.
//!
//! Layout: 8-byte magic, little-endian `u16` revision, bincode group tree.
//! A zero-length file decodes to an empty root group.

use crate::error::StorageError;
use crate::store::node::GroupNode;
use std::path::Path;

pub const MAGIC: &[u8; 8] = b"WT5STORE";
pub const REVISION: u16 = 1;

const HEADER_LEN: usize = MAGIC.len() + 2;

pub fn encode(root: &GroupNode) -> Result<Vec<u8>, StorageError> {
    let payload = bincode::serialize(root)?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&REVISION.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn decode(path: &Path, bytes: &[u8]) -> Result<GroupNode, StorageError> {
    if bytes.is_empty() {
        return Ok(GroupNode::new());
    }
    if bytes.len() < HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
        return Err(StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: "missing store header".to_string(),
        });
    }
    let revision = u16::from_le_bytes([bytes[MAGIC.len()], bytes[MAGIC.len() + 1]]);
    if revision != REVISION {
        return Err(StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("unsupported store revision {}", revision),
        });
    }
    bincode::deserialize(&bytes[HEADER_LEN..]).map_err(|e| StorageError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
