use std::fs;
use std::path::{Path, PathBuf};

use pixi_ci_env::LocalChannel;
use pixi_ci_fs::{CopyFilter, copy_tree};
use toml::{Table, Value};
use tracing::debug;

use crate::error::{Error, Result};

pub const CONDA_FORGE: &str = "https://prefix.dev/conda-forge";

const BACKENDS_CHANNEL_MARKER: &str = "pixi-build-backends";

/// Point the build backend of a package manifest at `channel`.
///
/// Returns whether `manifest` changed.
fn rewrite_backend_channels(manifest: &mut Table, channel: &LocalChannel) -> bool {
    let Some(backend) = manifest
        .get_mut("package")
        .and_then(Value::as_table_mut)
        .and_then(|package| package.get_mut("build"))
        .and_then(Value::as_table_mut)
        .and_then(|build| build.get_mut("backend"))
        .and_then(Value::as_table_mut)
    else {
        return false;
    };

    let local = channel.as_str();
    let current: Option<Vec<String>> = backend.get("channels").and_then(Value::as_array).map(|channels| {
        channels
            .iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect()
    });

    let updated: Vec<String> = match &current {
        None => vec![local.to_string(), CONDA_FORGE.to_string()],
        Some(channels) if channels.is_empty() => vec![local.to_string(), CONDA_FORGE.to_string()],
        Some(channels) => {
            let mut updated: Vec<String> = channels
                .iter()
                .map(|c| {
                    if c.contains(BACKENDS_CHANNEL_MARKER) {
                        local.to_string()
                    } else {
                        c.clone()
                    }
                })
                .collect();
            if !updated.iter().any(|c| c == local) {
                updated.push(local.to_string());
            }
            updated
        }
    };

    if current.as_ref() == Some(&updated) {
        return false;
    }
    backend.insert(
        "channels".to_string(),
        Value::Array(updated.into_iter().map(Value::String).collect()),
    );
    true
}

/// Copy a file, rewriting `pixi.toml` backend channels to `channel`.
///
/// `dst` may be a directory, in which case the file keeps its name.
pub fn copy_manifest(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    channel: &LocalChannel,
) -> Result<PathBuf> {
    let src = src.as_ref();
    let dst = dst.as_ref();
    let target = match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst.to_path_buf(),
    };
    fs::copy(src, &target)?;

    if target.file_name().and_then(|n| n.to_str()) != Some("pixi.toml") {
        return Ok(target);
    }

    let content = fs::read_to_string(&target)?;
    let mut manifest: Table = content.parse().map_err(|source| Error::TomlParse {
        path: target.clone(),
        source,
    })?;
    if rewrite_backend_channels(&mut manifest, channel) {
        debug!(path = %target.display(), channel = %channel, "rewrote backend channels");
        fs::write(&target, toml::to_string(&manifest)?)?;
    }
    Ok(target)
}

struct LocalBackendCopy<'a> {
    channel: &'a LocalChannel,
}

impl CopyFilter for LocalBackendCopy<'_> {
    type Error = Error;

    fn ignore(&self, path: &Path, _is_dir: bool) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        name == ".pixi" || name.ends_with(".conda")
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> Result<()> {
        copy_manifest(src, dest, self.channel).map(drop)
    }
}

/// Recursively copy test data, skipping `.pixi` and `*.conda`, via [`copy_manifest`].
pub fn copytree_with_local_backend(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    channel: &LocalChannel,
) -> Result<PathBuf> {
    let dst = dst.as_ref();
    copy_tree(src, dst, &LocalBackendCopy { channel })?;
    Ok(dst.to_path_buf())
}
