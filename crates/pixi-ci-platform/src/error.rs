use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported platform: {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("unknown platform tag '{0}'")]
    UnknownPlatformTag(String),

    #[error("command failed to start: {cmd}: {source}")]
    CommandFailed { cmd: String, source: std::io::Error },

    #[error("`{cmd}` exited with code {code:?}: {stderr}")]
    NonZeroExit {
        cmd: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{path} is not a valid git worktree")]
    NotAWorktree { path: std::path::PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
