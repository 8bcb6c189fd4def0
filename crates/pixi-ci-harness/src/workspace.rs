use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Mapping;
use toml::{Table, Value};

use crate::error::Result;

pub const RATTLER_BUILD_BACKEND: &str = "pixi-build-rattler-build";

/// Configuration reset to defaults, written into every temporary workspace.
pub const PIXI_CONFIG: &str = r#"
# Reset to defaults
default-channels = ["conda-forge"]
shell.change-ps1 = true
tls-no-verify = false
detached-environments = false
pinning-strategy = "semver"

[concurrency]
downloads = 50

[experimental]
use-environment-activation-cache = false

# Enable sharded repodata
[repodata-config."https://prefix.dev/"]
disable-sharded = false
"#;

/// Create `dir/.pixi/config.toml` with [`PIXI_CONFIG`].
pub fn tmp_pixi_workspace(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let dot_pixi = dir.join(".pixi");
    fs::create_dir_all(&dot_pixi)?;
    fs::write(dot_pixi.join("config.toml"), PIXI_CONFIG)?;
    Ok(dir.to_path_buf())
}

fn table<const N: usize>(entries: [(&str, Value); N]) -> Table {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn strings(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| Value::String(s.to_string())).collect())
}

/// A workspace with one source package built by `pixi-build-rattler-build`.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub recipe: serde_yaml::Value,
    pub workspace_manifest: Table,
    pub workspace_dir: PathBuf,
    pub package_manifest: Table,
    pub package_dir: PathBuf,
    pub recipe_path: PathBuf,
    pub debug_dir: PathBuf,
}

impl Workspace {
    /// Lay out `root/workspace` and `root/debug_dir`. A `.pixi` directory
    /// already in `root` moves into the workspace.
    pub fn simple(root: impl AsRef<Path>, name: &str, platform: &str) -> Result<Self> {
        let root = root.as_ref();
        let workspace_dir = root.join("workspace");
        fs::create_dir_all(&workspace_dir)?;
        let dot_pixi = root.join(".pixi");
        if dot_pixi.is_dir() {
            fs::rename(&dot_pixi, workspace_dir.join(".pixi"))?;
        }

        let debug_dir = root.join("debug_dir");
        fs::create_dir_all(&debug_dir)?;

        let package_rel_dir = "package";
        let package_dir = workspace_dir.join(package_rel_dir);
        fs::create_dir_all(&package_dir)?;

        let mut package = Mapping::new();
        package.insert("name".into(), name.into());
        package.insert("version".into(), "1.0.0".into());
        let mut recipe = Mapping::new();
        recipe.insert("package".into(), serde_yaml::Value::Mapping(package));

        let workspace_manifest = table([
            (
                "workspace",
                Value::Table(table([
                    (
                        "channels",
                        strings(&[
                            "https://prefix.dev/pixi-build-backends",
                            "https://prefix.dev/conda-forge",
                        ]),
                    ),
                    ("preview", strings(&["pixi-build"])),
                    ("platforms", strings(&[platform])),
                ])),
            ),
            (
                "dependencies",
                Value::Table(table([(
                    name,
                    Value::Table(table([("path", package_rel_dir.into())])),
                )])),
            ),
        ]);

        let package_manifest = table([(
            "package",
            Value::Table(table([
                ("name", name.into()),
                ("version", "1.0.0".into()),
                (
                    "build",
                    Value::Table(table([
                        (
                            "backend",
                            Value::Table(table([
                                ("name", RATTLER_BUILD_BACKEND.into()),
                                ("version", "*".into()),
                            ])),
                        ),
                        (
                            "configuration",
                            Value::Table(table([(
                                "debug-dir",
                                debug_dir.display().to_string().into(),
                            )])),
                        ),
                    ])),
                ),
            ])),
        )]);

        Ok(Self {
            recipe: serde_yaml::Value::Mapping(recipe),
            workspace_manifest,
            recipe_path: package_dir.join("recipe.yaml"),
            workspace_dir,
            package_manifest,
            package_dir,
            debug_dir,
        })
    }

    /// Write the recipe and both manifests.
    pub fn write_files(&self) -> Result<()> {
        fs::write(&self.recipe_path, serde_yaml::to_string(&self.recipe)?)?;
        fs::write(
            self.workspace_dir.join("pixi.toml"),
            toml::to_string(&self.workspace_manifest)?,
        )?;
        fs::write(
            self.package_dir.join("pixi.toml"),
            toml::to_string(&self.package_manifest)?,
        )?;
        Ok(())
    }

    /// `.pixi/build/work/*/debug` directories, sorted.
    pub fn iter_debug_dirs(&self) -> Vec<PathBuf> {
        let work_root = self.workspace_dir.join(".pixi").join("build").join("work");
        let Ok(entries) = fs::read_dir(&work_root) else {
            return Vec::new();
        };
        let mut work_dirs: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        work_dirs.sort();
        work_dirs
            .into_iter()
            .map(|dir| dir.join("debug"))
            .filter(|debug| debug.is_dir())
            .collect()
    }

    /// First debug directory holding `filename`.
    pub fn find_debug_file(&self, filename: &str) -> Option<PathBuf> {
        self.iter_debug_dirs()
            .into_iter()
            .map(|dir| dir.join(filename))
            .find(|path| path.is_file())
    }
}
