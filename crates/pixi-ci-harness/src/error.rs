use std::io;
use std::path::PathBuf;

use crate::exit::ExitCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{command}` returned {actual:?}, expected {expected}, stderr: {stderr}")]
    ExitCode {
        command: String,
        actual: Option<i32>,
        expected: ExitCode,
        stderr: String,
    },

    #[error("'{needle}'\n not found in {stream}:\n {haystack}")]
    Missing {
        stream: &'static str,
        needle: String,
        haystack: String,
    },

    #[error("'{needle}'\n unexpectedly found in {stream}:\n {haystack}")]
    Unexpected {
        stream: &'static str,
        needle: String,
        haystack: String,
    },

    #[error("neither pixi.toml nor pyproject.toml found in {0}")]
    NoManifest(PathBuf),

    #[error("{0} cannot be expressed as a file:// URL")]
    FileUrl(PathBuf),

    #[error("invalid TOML in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    TomlWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Env(#[from] pixi_ci_env::Error),

    #[error(transparent)]
    Process(#[from] pixi_ci_platform::Error),

    #[error(transparent)]
    Fs(#[from] pixi_ci_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
