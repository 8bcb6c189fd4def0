use std::path::Path;

use pixi_ci_env::LocalChannel;
use pixi_ci_platform::Git;
use url::Url;

use crate::error::{Error, Result};
use crate::manifest::copytree_with_local_backend;

/// Copy `source` to `target/name`, commit it as a fresh repository, and return its URL.
pub fn git_test_repo(
    source: impl AsRef<Path>,
    name: &str,
    target: impl AsRef<Path>,
    channel: &LocalChannel,
) -> Result<Url> {
    let repo_path = std::path::absolute(target.as_ref().join(name))?;
    copytree_with_local_backend(source, &repo_path, channel)?;

    let git = Git::new(&repo_path);
    git.init()?;
    git.add_all()?;
    git.set_config("user.email", "bot@prefix.dev")?;
    git.set_config("user.name", "Bot")?;
    git.commit("Initial commit")?;

    Url::from_file_path(&repo_path).map_err(|()| Error::FileUrl(repo_path))
}
