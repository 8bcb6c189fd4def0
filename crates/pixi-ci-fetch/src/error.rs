use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid repository slug '{0}', expected 'owner/name'")]
    InvalidSlug(String),

    #[error("could not find workflow: {0}")]
    WorkflowNotFound(String),

    #[error("could not find a suitable workflow run")]
    NoSuitableRun,

    #[error("could not find artifact matching pattern '{pattern}'. Available artifacts: {available:?}")]
    ArtifactNotFound {
        pattern: String,
        available: Vec<String>,
    },

    #[error("GitHub API request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("artifact metadata file at {path} is invalid: {reason}")]
    InvalidMetadata { path: PathBuf, reason: String },

    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Platform(#[from] pixi_ci_platform::Error),

    #[error(transparent)]
    Archive(#[from] pixi_ci_archive::Error),

    #[error(transparent)]
    Fs(#[from] pixi_ci_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
