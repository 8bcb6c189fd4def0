//! Test harness for integration suites that run `pixi` as a subprocess.
//!
//! - `verify.rs` - Run a command and assert on exit code and output
//! - `workspace.rs` - Generated recipe/workspace/package fixtures
//! - `manifest.rs` - Copying test data onto a local backend channel
//! - `repo.rs` - Throwaway git repositories from test data
//! - `tools.rs` - Locating the pixi and backend binaries under test
//! - `files.rs` - Small path and content helpers

mod error;
mod exit;
mod files;
mod manifest;
mod repo;
mod tools;
mod verify;
mod workspace;

pub use error::{Error, Result};
pub use exit::ExitCode;
pub use files::{current_platform, default_env_path, empty_boilerplate_project, get_manifest, is_binary, pixi_dir};
pub use manifest::{CONDA_FORGE, copy_manifest, copytree_with_local_backend};
pub use pixi_ci_env::{BackendOverride, LocalChannel};
pub use pixi_ci_platform::{bat_extension, exec_extension};
pub use repo::git_test_repo;
pub use tools::PixiTools;
pub use verify::{Output, Verify, strip_ansi, verify_cli_command};
pub use workspace::{PIXI_CONFIG, RATTLER_BUILD_BACKEND, Workspace, tmp_pixi_workspace};
