use std::fmt;
use std::path::{Path, PathBuf};

use pixi_ci_fs::contains_file_named;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::lookup::EnvLookup;

const BUILD_BACKENDS_REPO: &str = "BUILD_BACKENDS_REPO";
const REPODATA: &str = "repodata.json";

/// A conda channel of locally built backends, addressed by `file://` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalChannel {
    path: PathBuf,
    url: Url,
}

impl LocalChannel {
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())
            .map_err(|_| Error::ChannelUrl(path.as_ref().to_path_buf()))?;
        let url = Url::from_file_path(&path).map_err(|()| Error::ChannelUrl(path.clone()))?;
        Ok(Self { path, url })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for LocalChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(raw),
    };
    match home::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}

fn is_channel(dir: &Path) -> bool {
    dir.is_dir() && contains_file_named(dir, REPODATA)
}

/// `$BUILD_BACKENDS_REPO/artifacts-channel`, else `root/artifacts/pixi-build-backends`.
///
/// A candidate only counts if a `repodata.json` exists somewhere beneath it.
pub fn local_backend_channel(env: &impl EnvLookup, root: impl AsRef<Path>) -> Result<LocalChannel> {
    if let Some(repo) = env.non_empty(BUILD_BACKENDS_REPO) {
        let candidate = expand_home(&repo).join("artifacts-channel");
        if is_channel(&candidate) {
            return LocalChannel::from_dir(candidate);
        }
        debug!(path = %candidate.display(), "no channel in BUILD_BACKENDS_REPO");
    }

    let fallback = root.as_ref().join("artifacts").join("pixi-build-backends");
    if is_channel(&fallback) {
        return LocalChannel::from_dir(fallback);
    }
    Err(Error::NoLocalChannel(fallback))
}
