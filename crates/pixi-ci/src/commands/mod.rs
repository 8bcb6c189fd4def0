use std::path::PathBuf;

use anyhow::Context as _;
use pixi_ci_env::{EnvFiles, Layered, ProcessEnv, load_env_files};

pub mod branch_override;
pub mod download;
pub mod lockfiles;
pub mod repos;
pub mod validate;

/// Repository root plus the environment every command reads from.
#[derive(Debug)]
pub struct Context {
    pub root: PathBuf,
    pub files: EnvFiles,
}

impl Context {
    pub fn load(root: PathBuf) -> anyhow::Result<Self> {
        let files = load_env_files(&root).with_context(|| format!("failed to load env files from '{}'", root.display()))?;
        Ok(Self { root, files })
    }

    /// Dotenv values first, then the process environment.
    pub fn env(&self) -> Layered<&EnvFiles, ProcessEnv> {
        Layered::new(&self.files, ProcessEnv)
    }

    /// Dotenv values that child processes must see.
    pub fn child_envs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.vars()
    }
}
