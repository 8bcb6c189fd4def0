//! Small wrapper for the `git` invocations the tooling needs.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::command::Command;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Whether the working directory lies inside a git work tree.
    pub fn is_worktree(&self) -> bool {
        if !self.workdir.is_dir() {
            return false;
        }
        match self.command(["rev-parse", "--is-inside-work-tree"]).capture() {
            Ok(out) => out.success() && out.stdout.trim().eq_ignore_ascii_case("true"),
            Err(_) => false,
        }
    }

    /// Fail with [`Error::NotAWorktree`] unless this is a work tree.
    pub fn ensure_worktree(&self) -> Result<()> {
        if self.is_worktree() {
            Ok(())
        } else {
            Err(Error::NotAWorktree {
                path: self.workdir.clone(),
            })
        }
    }

    /// Current branch name; `None` when detached or undeterminable.
    pub fn current_branch(&self) -> Option<String> {
        let out = self.command(["branch", "--show-current"]).capture().ok()?;
        let name = out.stdout.trim();
        if out.success() && !name.is_empty() {
            debug!(branch = name, "current branch");
            Some(name.to_string())
        } else {
            None
        }
    }

    #[instrument(skip(self), fields(workdir = %self.workdir.display()))]
    pub fn pull(&self) -> Result<String> {
        Ok(self.command(["pull"]).checked()?.stdout)
    }

    pub fn init(&self) -> Result<()> {
        self.command(["init"]).checked().map(drop)
    }

    pub fn add_all(&self) -> Result<()> {
        self.command(["add", "."]).checked().map(drop)
    }

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.command(["config", key, value]).checked().map(drop)
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.command(["commit", "--message", message])
            .checked()
            .map(drop)
    }

    fn command<const N: usize>(&self, args: [&str; N]) -> Command {
        Command::new("git").args(args).current_dir(&self.workdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir_is_not_a_worktree() {
        let git = Git::new("/nonexistent/pixi-ci/repo");
        assert!(!git.is_worktree());
        assert!(matches!(
            git.ensure_worktree(),
            Err(Error::NotAWorktree { .. })
        ));
    }

    #[test]
    fn fresh_repo_round_trip() {
        if which_git().is_none() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let git = Git::new(dir.path());
        git.init().unwrap();
        assert!(git.is_worktree());
        std::fs::write(dir.path().join("README.md"), "hello").unwrap();
        git.add_all().unwrap();
        git.set_config("user.email", "bot@prefix.dev").unwrap();
        git.set_config("user.name", "Bot").unwrap();
        git.commit("Initial commit").unwrap();
        assert!(git.current_branch().is_some());
    }

    fn which_git() -> Option<()> {
        Command::new("git")
            .arg("--version")
            .capture()
            .ok()
            .filter(|o| o.success())
            .map(drop)
    }
}
