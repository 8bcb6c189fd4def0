use std::fmt;
use std::path::{Path, PathBuf};

use pixi_ci_platform::exec_extension;
use tracing::debug;

use crate::error::{Error, Result};
use crate::lookup::EnvLookup;

const PIXI_BIN_DIR: &str = "PIXI_BIN_DIR";
const BUILD_BACKENDS_BIN_DIR: &str = "BUILD_BACKENDS_BIN_DIR";

/// Backends the test suite overrides.
pub const BACKENDS: [&str; 4] = [
    "pixi-build-cmake",
    "pixi-build-python",
    "pixi-build-rattler-build",
    "pixi-build-rust",
];

fn artifact_dirs(root: &Path, nested: &str) -> [PathBuf; 2] {
    let artifacts = root.join("artifacts");
    [artifacts.clone(), artifacts.join(nested)]
}

/// Path of the `pixi` executable to test against.
///
/// `PIXI_BIN_DIR` wins when set. Otherwise `artifacts/` and `artifacts/pixi/`
/// under `root` are searched.
pub fn locate_pixi(env: &impl EnvLookup, root: impl AsRef<Path>) -> Result<PathBuf> {
    let exe = exec_extension("pixi");
    let bin_dir = match env.non_empty(PIXI_BIN_DIR) {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            if !dir.is_dir() {
                return Err(Error::InvalidBinDir {
                    var: PIXI_BIN_DIR,
                    path: dir,
                });
            }
            dir
        }
        None => artifact_dirs(root.as_ref(), "pixi")
            .into_iter()
            .find(|dir| dir.join(&exe).is_file())
            .ok_or(Error::PixiNotLocated)?,
    };

    let pixi = bin_dir.join(exe);
    if !pixi.is_file() {
        return Err(Error::PixiMissing(pixi));
    }
    debug!(path = %pixi.display(), "located pixi");
    Ok(pixi)
}

/// Locate every backend executable. See [`BackendOverride::locate`].
pub fn backend_override(env: &impl EnvLookup, root: impl AsRef<Path>) -> Result<BackendOverride> {
    BackendOverride::locate(env, root)
}

/// Paths for `PIXI_BUILD_BACKEND_OVERRIDE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOverride {
    pub bin_dir: PathBuf,
    pub backends: Vec<(&'static str, PathBuf)>,
}

impl BackendOverride {
    pub const ENV_VAR: &'static str = "PIXI_BUILD_BACKEND_OVERRIDE";

    /// `BUILD_BACKENDS_BIN_DIR` wins when set. Otherwise the first of
    /// `artifacts/` and `artifacts/pixi-build-backends/` holding every backend.
    pub fn locate(env: &impl EnvLookup, root: impl AsRef<Path>) -> Result<Self> {
        let bin_dir = match env.non_empty(BUILD_BACKENDS_BIN_DIR) {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                if !dir.is_dir() {
                    return Err(Error::InvalidBinDir {
                        var: BUILD_BACKENDS_BIN_DIR,
                        path: dir,
                    });
                }
                dir
            }
            None => artifact_dirs(root.as_ref(), "pixi-build-backends")
                .into_iter()
                .find(|dir| {
                    BACKENDS
                        .iter()
                        .all(|backend| dir.join(exec_extension(backend)).is_file())
                })
                .ok_or(Error::BackendsNotLocated)?,
        };

        let mut backends = Vec::with_capacity(BACKENDS.len());
        for backend in BACKENDS {
            let path = bin_dir.join(exec_extension(backend));
            if !path.is_file() {
                return Err(Error::BackendMissing { backend, path });
            }
            backends.push((backend, path));
        }
        Ok(Self { bin_dir, backends })
    }

    /// `name=path` pairs joined by commas.
    pub fn env_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BackendOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, path)) in self.backends.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}={}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn pixi_found_in_nested_artifacts_dir() {
        let root = tempfile::tempdir().unwrap();
        let expected = root.path().join("artifacts/pixi").join(exec_extension("pixi"));
        touch(&expected);

        let found = locate_pixi(&HashMap::new(), root.path()).unwrap();
        assert_eq!(found, expected);
    }

    #[test]
    fn pixi_bin_dir_must_exist() {
        let root = tempfile::tempdir().unwrap();
        let env = HashMap::from([(
            PIXI_BIN_DIR.to_string(),
            root.path().join("nope").display().to_string(),
        )]);
        assert!(matches!(
            locate_pixi(&env, root.path()),
            Err(Error::InvalidBinDir { var: PIXI_BIN_DIR, .. })
        ));
    }

    #[test]
    fn pixi_bin_dir_without_executable() {
        let root = tempfile::tempdir().unwrap();
        let env = HashMap::from([(PIXI_BIN_DIR.to_string(), root.path().display().to_string())]);
        assert!(matches!(locate_pixi(&env, root.path()), Err(Error::PixiMissing(_))));
    }

    #[test]
    fn nothing_downloaded() {
        let root = tempfile::tempdir().unwrap();
        let err = locate_pixi(&HashMap::new(), root.path()).unwrap_err();
        assert!(err.to_string().contains("download-artifacts --repo pixi"));
    }

    #[test]
    fn backend_override_lists_all_backends() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("artifacts");
        for backend in BACKENDS {
            touch(&dir.join(exec_extension(backend)));
        }

        let found = BackendOverride::locate(&HashMap::new(), root.path()).unwrap();

        assert_eq!(found.bin_dir, dir);
        let value = found.env_value();
        assert_eq!(value.split(',').count(), 4);
        assert!(value.starts_with(&format!(
            "pixi-build-cmake={}",
            dir.join(exec_extension("pixi-build-cmake")).display()
        )));
    }

    #[test]
    fn incomplete_backend_dir_reports_missing_one() {
        let root = tempfile::tempdir().unwrap();
        for backend in &BACKENDS[..3] {
            touch(&root.path().join(exec_extension(backend)));
        }
        let env = HashMap::from([(
            BUILD_BACKENDS_BIN_DIR.to_string(),
            root.path().display().to_string(),
        )]);

        match BackendOverride::locate(&env, root.path()) {
            Err(Error::BackendMissing { backend, .. }) => assert_eq!(backend, "pixi-build-rust"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
