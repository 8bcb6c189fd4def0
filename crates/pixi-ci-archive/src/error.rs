use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("could not find {what} in archive. Archive contents: {entries:?}")]
    NotFound {
        what: &'static str,
        entries: Vec<String>,
    },

    #[error("unsafe entry path in archive: '{0}'")]
    UnsafePath(String),

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] pixi_ci_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Corrupted(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
