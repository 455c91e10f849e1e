//! Process-wide table of open store files.
//!
//! One canonical path maps to at most one live in-memory image, so every
//! handle opened against the same file sees the same groups and attributes.

use super::StoreFile;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, Weak};

fn table() -> &'static Mutex<HashMap<PathBuf, Weak<StoreFile>>> {
    static OPEN_FILES: OnceLock<Mutex<HashMap<PathBuf, Weak<StoreFile>>>> = OnceLock::new();
    OPEN_FILES.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Live image for `canonical`, if some handle still holds it
pub(crate) fn lookup(canonical: &Path) -> Option<Arc<StoreFile>> {
    table().lock().get(canonical).and_then(Weak::upgrade)
}

/// Return the live image for `canonical`, or build one with `open`
pub(crate) fn get_or_open<E>(
    canonical: &Path,
    open: impl FnOnce() -> Result<Arc<StoreFile>, E>,
) -> Result<Arc<StoreFile>, E> {
    let mut files = table().lock();
    if let Some(file) = files.get(canonical).and_then(Weak::upgrade) {
        return Ok(file);
    }
    files.retain(|_, weak| weak.strong_count() > 0);
    let file = open()?;
    files.insert(canonical.to_path_buf(), Arc::downgrade(&file));
    Ok(file)
}
