use std::path::{Path, PathBuf};

use pixi_ci_fs::find_files_named;
use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::locker::Locker;

pub const LOCKFILE_NAME: &str = "pixi.lock";

/// Test data searched when no folder is given, relative to the repository root.
pub const DEFAULT_DATA_DIR: &str = "tests/data/pixi_build";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockReport {
    pub updated: Vec<PathBuf>,
}

/// The data directory, or one named folder inside it.
pub fn target_dir(root: impl AsRef<Path>, folder: Option<&str>) -> PathBuf {
    let base = root.as_ref().join(DEFAULT_DATA_DIR);
    match folder {
        Some(folder) => base.join(folder),
        None => base,
    }
}

/// Sorted directories beneath `base` that contain a lockfile.
pub fn lockfile_dirs(base: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let base = base.as_ref();
    if !base.exists() {
        return Err(Error::Missing(base.to_path_buf()));
    }
    if !base.is_dir() {
        return Err(Error::NotADirectory(base.to_path_buf()));
    }

    Ok(find_files_named(base, LOCKFILE_NAME)?
        .into_iter()
        .filter_map(|lockfile| lockfile.parent().map(Path::to_path_buf))
        .collect())
}

/// Run `locker` in every lockfile directory, stopping at the first failure.
#[instrument(skip(base, locker), fields(base = %base.as_ref().display()))]
pub fn update_lockfiles(base: impl AsRef<Path>, locker: &impl Locker) -> Result<LockReport> {
    let dirs = lockfile_dirs(&base)?;
    if dirs.is_empty() {
        warn!("no pixi.lock files found");
        return Ok(LockReport::default());
    }
    update_dirs(dirs, locker)
}

/// Run `locker` in each of `dirs` in order, stopping at the first failure.
pub fn update_dirs(dirs: Vec<PathBuf>, locker: &impl Locker) -> Result<LockReport> {
    info!(count = dirs.len(), "found lockfiles");

    let mut report = LockReport::default();
    for dir in dirs {
        info!(dir = %dir.display(), "running pixi lock");
        let output = locker.lock(&dir)?;
        if !output.success() {
            return Err(Error::lock_failed(dir, &output.stdout, &output.stderr));
        }
        let stdout = output.stdout.trim();
        if !stdout.is_empty() {
            info!(dir = %dir.display(), "{stdout}");
        }
        info!(dir = %dir.display(), "updated lockfile");
        report.updated.push(dir);
    }
    Ok(report)
}
