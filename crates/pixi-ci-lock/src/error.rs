use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("directory {0} does not exist")]
    Missing(PathBuf),

    #[error("path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to run pixi lock in {dir}{detail}")]
    LockFailed { dir: PathBuf, detail: String },

    #[error(transparent)]
    Spawn(#[from] pixi_ci_platform::Error),

    #[error(transparent)]
    Fs(#[from] pixi_ci_fs::Error),
}

impl Error {
    /// Describe a failed lock with whatever the command printed.
    pub fn lock_failed(dir: PathBuf, stdout: &str, stderr: &str) -> Self {
        let mut detail = String::new();
        if !stderr.is_empty() {
            detail.push_str(": ");
            detail.push_str(stderr);
        }
        if !stdout.is_empty() {
            detail.push_str(&format!(" (Output: {stdout})"));
        }
        Self::LockFailed { dir, detail }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
