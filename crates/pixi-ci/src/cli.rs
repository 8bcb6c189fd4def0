use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use pixi_ci_fetch::{BuiltinTarget, DEFAULT_API_BASE};

#[derive(Clone, Debug, Parser)]
#[command(name = "pixi-ci", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Repository root holding `.env`, `artifacts/` and the test data.
    #[arg(long, global = true, env = "PIXI_CI_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Download pixi and build backend binaries from GitHub Actions.
    #[command(alias = "dl", name = "download-artifacts")]
    DownloadArtifacts(DownloadArgs),
    /// Run `pixi lock` in every test-data directory holding a lockfile.
    #[command(alias = "lock", name = "update-lockfiles")]
    UpdateLockfiles(LockArgs),
    /// Pull and build local checkouts of pixi and pixi-build-backends.
    #[command(name = "build-repos")]
    BuildRepos,
    /// Fail if a branch-local `.env.ci` is present.
    #[command(name = "check-branch-override")]
    CheckBranchOverride,
    /// Check downloaded artifacts against the requested PR numbers.
    #[command(name = "validate-artifacts")]
    ValidateArtifacts,
}

#[derive(Clone, Debug, Args)]
pub struct DownloadArgs {
    /// GitHub token. Falls back to GITHUB_TOKEN, then `gh auth token`.
    #[arg(long)]
    pub token: Option<String>,

    /// Only download from this source.
    #[arg(long)]
    pub repo: Option<BuiltinTarget>,

    /// Use this workflow run instead of searching for one.
    #[arg(long, requires = "repo")]
    pub run_id: Option<u64>,

    /// Search runs on this branch instead of main.
    #[arg(long)]
    pub branch: Option<String>,

    /// Platform tag such as `linux-x86_64`, or a conda subdir such as `osx-arm64`.
    #[arg(long)]
    pub platform: Option<String>,

    /// Where to extract. Defaults to `artifacts/` (or `conda_packages/`) under the root.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Run `pixi --version` after downloading pixi.
    #[arg(long)]
    pub verify: bool,

    /// GitHub REST API root, for GitHub Enterprise or a local mirror.
    #[arg(long, env = "PIXI_CI_GITHUB_API", default_value = DEFAULT_API_BASE)]
    pub api_url: String,
}

#[derive(Clone, Debug, Args)]
pub struct LockArgs {
    /// Only update lockfiles below `tests/data/pixi_build/<FOLDER>`.
    pub folder: Option<String>,
}
