use std::path::Path;

use pixi_ci_platform::Os;

const PIXI: &str = "pixi";
const BACKEND_PREFIX: &str = "pixi-build-";
const CONDA_SUFFIX: &str = ".conda";

/// Naming convention of the entries to pull out of an artifact archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySelector {
    /// The single `pixi` executable.
    Pixi,
    /// Every `pixi-build-*` executable for the given OS.
    BuildBackends { windows: bool },
    /// Every `.conda` package.
    CondaPackages,
}

impl EntrySelector {
    pub fn build_backends_for(os: Os) -> Self {
        Self::BuildBackends {
            windows: os.is_windows(),
        }
    }

    /// Whether extracted entries must be marked executable.
    pub fn is_executable(&self) -> bool {
        !matches!(self, Self::CondaPackages)
    }

    /// Description used in "not found" errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Pixi => "pixi binary",
            Self::BuildBackends { .. } => "any pixi-build-* executables",
            Self::CondaPackages => "any .conda files",
        }
    }

    pub fn matches(&self, entry: &str) -> bool {
        if entry.ends_with('/') {
            return false;
        }
        match self {
            Self::Pixi => {
                entry == PIXI || entry.ends_with("/pixi") || entry.ends_with("pixi.exe")
            }
            Self::BuildBackends { windows } => {
                let Some(base) = Path::new(entry).file_name().and_then(|n| n.to_str()) else {
                    return false;
                };
                if !base.starts_with(BACKEND_PREFIX) {
                    return false;
                }
                if *windows {
                    base.ends_with(".exe")
                } else {
                    !base.contains('.')
                }
            }
            Self::CondaPackages => entry.ends_with(CONDA_SUFFIX),
        }
    }

    /// Pick the wanted entries, in archive order. `Pixi` yields at most one.
    pub fn select<'a>(&self, entries: &'a [String]) -> Vec<&'a str> {
        let mut matching = entries
            .iter()
            .map(String::as_str)
            .filter(|entry| self.matches(entry));
        match self {
            Self::Pixi => matching.next().into_iter().collect(),
            _ => matching.collect(),
        }
    }
}
