use std::path::{Path, PathBuf};

use pixi_ci_env::{
    BackendOverride, EnvLookup, Layered, LocalChannel, ProcessEnv, backend_override, load_env_files,
    local_backend_channel, locate_pixi,
};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::verify::Verify;

/// The downloaded `pixi` and build backends a suite runs against.
#[derive(Debug, Clone)]
pub struct PixiTools {
    pub pixi: PathBuf,
    pub backends: BackendOverride,
    /// Channel of locally built backends, if one has been published.
    pub channel: Option<LocalChannel>,
}

impl PixiTools {
    #[instrument(skip_all)]
    pub fn locate(env: &impl EnvLookup, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let pixi = locate_pixi(env, root)?;
        let backends = backend_override(env, root)?;
        let channel = match local_backend_channel(env, root) {
            Ok(channel) => Some(channel),
            Err(err) => {
                debug!(%err, "running without a local backend channel");
                None
            }
        };
        Ok(Self {
            pixi,
            backends,
            channel,
        })
    }

    /// [`PixiTools::locate`] with `root/.env` and `root/.env.ci` layered over the process environment.
    pub fn from_env_files(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let files = load_env_files(root)?;
        Self::locate(&Layered::new(&files, ProcessEnv), root)
    }

    /// A `pixi` invocation that builds with the located backends.
    pub fn pixi(&self) -> Verify {
        Verify::new(&self.pixi).backend_override(&self.backends)
    }
}
