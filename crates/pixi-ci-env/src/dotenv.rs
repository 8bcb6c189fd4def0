use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::lookup::EnvLookup;

pub const ENV_FILE: &str = ".env";
/// Branch-local overrides used to test PR combinations. Must not reach `main`.
pub const ENV_CI_FILE: &str = ".env.ci";

/// Variables read from the repository's dotenv files.
#[derive(Debug, Clone, Default)]
pub struct EnvFiles {
    pub loaded: Vec<PathBuf>,
    vars: HashMap<String, String>,
}

impl EnvFiles {
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvLookup for EnvFiles {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Read `root/.env` then `root/.env.ci`; later files override earlier ones.
pub fn load_env_files(root: impl AsRef<Path>) -> Result<EnvFiles> {
    let root = root.as_ref();
    let mut files = EnvFiles::default();

    for name in [ENV_FILE, ENV_CI_FILE] {
        let path = root.join(name);
        if !path.is_file() {
            debug!(path = %path.display(), "no env file");
            continue;
        }
        let entries = dotenvy::from_path_iter(&path).map_err(|source| Error::EnvFile {
            path: path.clone(),
            source,
        })?;
        for entry in entries {
            let (key, value) = entry.map_err(|source| Error::EnvFile {
                path: path.clone(),
                source,
            })?;
            files.vars.insert(key, value);
        }
        info!(path = %path.display(), "loaded environment variables");
        files.loaded.push(path);
    }

    Ok(files)
}
