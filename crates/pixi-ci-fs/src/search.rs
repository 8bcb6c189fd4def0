use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::{Error, Result};

/// Recursively collect every file called `name` below `base`, sorted.
pub fn find_files_named(base: impl AsRef<Path>, name: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(base.as_ref(), &mut |path| {
        if path.file_name().is_some_and(|n| n == name) {
            found.push(path.to_path_buf());
        }
        false
    })?;
    found.sort();
    Ok(found)
}

/// Whether any file called `name` exists below `base`.
pub fn contains_file_named(base: impl AsRef<Path>, name: &str) -> bool {
    let mut hit = false;
    let _ = walk(base.as_ref(), &mut |path| {
        hit = path.file_name().is_some_and(|n| n == name);
        hit
    });
    hit
}

/// Depth-first walk over files. The visitor returns `true` to stop early.
///
/// Only an unreadable `dir` is an error; unreadable entries below it are skipped.
fn walk(dir: &Path, visit: &mut dyn FnMut(&Path) -> bool) -> Result<bool> {
    let read_err = |source| Error::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(read_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable entry");
                continue;
            }
        };
        let stop = if file_type.is_dir() {
            match walk(&path, visit) {
                Ok(stop) => stop,
                Err(err) => {
                    warn!(%err, "skipping unreadable directory");
                    false
                }
            }
        } else {
            visit(&path)
        };
        if stop {
            return Ok(true);
        }
    }
    Ok(false)
}
