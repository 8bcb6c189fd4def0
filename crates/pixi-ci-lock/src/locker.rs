use std::path::{Path, PathBuf};

use pixi_ci_platform::{CapturedOutput, Command};

/// Runs the lock command for one workspace directory.
pub trait Locker {
    fn lock(&self, dir: &Path) -> pixi_ci_platform::Result<CapturedOutput>;
}

/// `pixi lock` with extra environment variables.
#[derive(Debug, Clone)]
pub struct PixiLocker {
    pixi: PathBuf,
    envs: Vec<(String, String)>,
}

impl PixiLocker {
    pub fn new(pixi: impl Into<PathBuf>) -> Self {
        Self {
            pixi: pixi.into(),
            envs: Vec::new(),
        }
    }

    pub fn with_envs<I, K, V>(mut self, envs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.envs
            .extend(envs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

impl Locker for PixiLocker {
    fn lock(&self, dir: &Path) -> pixi_ci_platform::Result<CapturedOutput> {
        Command::new(&self.pixi)
            .arg("lock")
            .current_dir(dir)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .capture()
    }
}
