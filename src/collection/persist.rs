//! Save destinations for whole-store exports

use crate::DEFAULT_EXTENSION;
use std::path::{Component, Path, PathBuf};

/// Resolve where `save` writes to.
///
/// No path: `<cwd>/<natural_name>.wt5`. A path whose file name has no `.`
/// gets the default extension appended. A leading `~` is expanded to `home`.
/// Relative results are anchored at `cwd`.
pub fn resolve_destination(
    filepath: Option<&Path>,
    natural_name: &str,
    cwd: &Path,
    home: Option<&Path>,
) -> PathBuf {
    let path = match filepath {
        None => PathBuf::from(format!("{}.{}", natural_name, DEFAULT_EXTENSION)),
        Some(path) => {
            let has_extension = path
                .file_name()
                .map(|n| n.to_string_lossy().contains('.'))
                .unwrap_or(false);
            if has_extension {
                path.to_path_buf()
            } else {
                let mut raw = path.as_os_str().to_os_string();
                raw.push(format!(".{}", DEFAULT_EXTENSION));
                PathBuf::from(raw)
            }
        }
    };
    let path = expand_tilde(&path, home);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    let mut components = path.components();
    match (components.next(), home) {
        (Some(Component::Normal(first)), Some(home)) if first == "~" => {
            home.join(components.as_path())
        }
        _ => path.to_path_buf(),
    }
}

/// Home directory of the current user, if the platform knows one
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}
