use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Reduce an archive entry name to its final path component.
///
/// Entries are flattened into the output directory, so only the base name is
/// kept. Names that are absolute, climb with `..`, or have no file name are
/// rejected.
pub fn flatten_entry_name(entry: &str) -> Result<String> {
    let normalized = entry.replace('\\', "/");
    if normalized.contains('\0') {
        return Err(Error::UnsafePath(entry.to_string()));
    }

    let path = Path::new(&normalized);
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::UnsafePath(entry.to_string()));
            }
        }
    }

    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::UnsafePath(entry.to_string()))
}
