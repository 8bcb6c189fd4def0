use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use pixi_ci_platform::Platform;

use crate::error::{Error, Result};

/// The conda platform of this machine, e.g. `linux-64`.
pub fn current_platform() -> Result<&'static str> {
    Ok(Platform::current().conda_target()?)
}

/// A minimal workspace manifest without channels.
pub fn empty_boilerplate_project(platform: &str) -> String {
    format!("[workspace]\nname = \"test\"\nchannels = []\nplatforms = [\"{platform}\"]\n")
}

pub fn pixi_dir(project_root: impl AsRef<Path>) -> PathBuf {
    project_root.as_ref().join(".pixi")
}

pub fn default_env_path(project_root: impl AsRef<Path>) -> PathBuf {
    pixi_dir(project_root).join("envs").join("default")
}

/// `pixi.toml`, falling back to `pyproject.toml`.
pub fn get_manifest(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    ["pixi.toml", "pyproject.toml"]
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
        .ok_or_else(|| Error::NoManifest(dir.to_path_buf()))
}

fn is_text_byte(byte: u8) -> bool {
    matches!(byte, 7 | 8 | 9 | 10 | 12 | 13 | 27) || (byte >= 0x20 && byte != 0x7f)
}

/// Whether the first 2 KiB contain bytes outside printable text.
pub fn is_binary(path: impl AsRef<Path>) -> Result<bool> {
    let mut head = Vec::with_capacity(2048);
    File::open(path)?.take(2048).read_to_end(&mut head)?;
    Ok(head.iter().any(|&b| !is_text_byte(b)))
}
