use std::fs;
use std::path::Path;

use crate::Error;

/// Decides which entries [`copy_tree`] skips and how files are copied.
pub trait CopyFilter {
    /// Failure type of [`CopyFilter::copy_file`]; tree-walk errors convert into it.
    type Error: From<Error>;

    /// Return `true` to skip `path` (file or directory).
    fn ignore(&self, path: &Path, is_dir: bool) -> bool;

    /// Copy a single file. Defaults to [`fs::copy`].
    fn copy_file(&self, src: &Path, dest: &Path) -> Result<(), Self::Error> {
        fs::copy(src, dest).map_err(|source| Error::Write {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

/// Recursively copy `src` into `dest`, creating `dest` if needed.
pub fn copy_tree<F>(src: impl AsRef<Path>, dest: impl AsRef<Path>, filter: &F) -> Result<(), F::Error>
where
    F: CopyFilter + ?Sized,
{
    let src = src.as_ref();
    let dest = dest.as_ref();

    fs::create_dir_all(dest).map_err(|source| Error::Write {
        path: dest.to_path_buf(),
        source,
    })?;

    let read_err = |path: &Path, source| Error::Read {
        path: path.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(src).map_err(|e| read_err(src, e))? {
        let entry = entry.map_err(|e| read_err(src, e))?;
        let src_path = entry.path();
        let is_dir = entry
            .file_type()
            .map_err(|e| read_err(&src_path, e))?
            .is_dir();

        if filter.ignore(&src_path, is_dir) {
            continue;
        }

        let dest_path = dest.join(entry.file_name());
        if is_dir {
            copy_tree(&src_path, &dest_path, filter)?;
        } else {
            filter.copy_file(&src_path, &dest_path)?;
        }
    }
    Ok(())
}
