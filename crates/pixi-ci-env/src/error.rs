use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error(
        "could not determine Pixi binary location. Set PIXI_BIN_DIR or run 'pixi-ci download-artifacts --repo pixi'"
    )]
    PixiNotLocated,

    #[error("{var} points to '{path}' which is not a valid directory")]
    InvalidBinDir { var: &'static str, path: PathBuf },

    #[error(
        "Pixi executable not found at '{0}'. Set PIXI_BIN_DIR or run 'pixi-ci download-artifacts --repo pixi'"
    )]
    PixiMissing(PathBuf),

    #[error(
        "could not determine build backend locations. Set BUILD_BACKENDS_BIN_DIR or run 'pixi-ci download-artifacts --repo pixi-build-backends'"
    )]
    BackendsNotLocated,

    #[error(
        "'{backend}' not found at '{path}'. Set BUILD_BACKENDS_BIN_DIR or run 'pixi-ci download-artifacts --repo pixi-build-backends'"
    )]
    BackendMissing { backend: &'static str, path: PathBuf },

    #[error("no local backend channel: set BUILD_BACKENDS_REPO or place a channel under '{0}'")]
    NoLocalChannel(PathBuf),

    #[error("cannot express '{0}' as a file:// URL")]
    ChannelUrl(PathBuf),

    #[error("artifact metadata for {repo} is missing a pull request number. Re-run 'pixi-ci download-artifacts'")]
    MissingPrNumber { repo: String },

    #[error(
        "artifacts for {repo} originate from PR #{pr}, but {var} is not set. Set the environment variable or re-download the correct artifacts"
    )]
    PrEnvUnset {
        repo: String,
        pr: u64,
        var: &'static str,
    },

    #[error(
        "artifacts for {repo} originate from PR #{pr}, but {var}='{value}'. Update your environment or refresh the artifacts"
    )]
    PrMismatch {
        repo: String,
        pr: u64,
        var: &'static str,
        value: String,
    },

    #[error(
        "artifacts for {repo} originate from branch '{branch}', but {var}='{value}' is set. Unset the environment variable or download the matching PR artifacts"
    )]
    BranchWithPr {
        repo: String,
        branch: String,
        var: &'static str,
        value: String,
    },

    #[error(transparent)]
    Metadata(#[from] pixi_ci_fetch::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
