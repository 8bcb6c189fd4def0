use std::fmt;
use std::str::FromStr;

use pixi_ci_archive::EntrySelector;
use pixi_ci_platform::{Os, Platform};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An `owner/name` GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let (owner, name) = (owner.into(), name.into());
        if owner.is_empty() || name.is_empty() || owner.contains('/') || name.contains('/') {
            return Err(Error::InvalidSlug(format!("{owner}/{name}")));
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoSlug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name)) => {
                Self::new(owner, name).map_err(|_| Error::InvalidSlug(s.to_string()))
            }
            None => Err(Error::InvalidSlug(s.to_string())),
        }
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.to_string()
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// What an artifact contains, which fixes its name pattern and entry selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Pixi,
    BuildBackends,
    CondaPackages,
}

impl ArtifactKind {
    /// Substring an artifact name must contain on `platform`.
    pub fn name_pattern(&self, platform: &Platform) -> Result<String> {
        Ok(match self {
            Self::Pixi => format!("pixi-{}", platform.tag()?),
            Self::BuildBackends => format!("pixi-build-backends-{}", platform.tag()?),
            Self::CondaPackages => format!("conda-packages-{}", platform.conda_target()?),
        })
    }

    pub fn entry_selector(&self, os: Os) -> EntrySelector {
        match self {
            Self::Pixi => EntrySelector::Pixi,
            Self::BuildBackends => EntrySelector::build_backends_for(os),
            Self::CondaPackages => EntrySelector::CondaPackages,
        }
    }

    /// Directory name under the repository root used when no output dir is given.
    pub fn default_output_dir(&self) -> &'static str {
        match self {
            Self::Pixi | Self::BuildBackends => "artifacts",
            Self::CondaPackages => "conda_packages",
        }
    }
}

/// Which workflow of which repository to search, and for what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub repository: RepoSlug,
    pub workflow: String,
    pub pr_number: Option<u64>,
    pub kind: ArtifactKind,
}

/// The artifact sources the pixi test suite knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTarget {
    Pixi,
    PixiBuildBackends,
    CondaPackages,
}

impl BuiltinTarget {
    /// Targets fetched when none is requested explicitly.
    pub const DEFAULTS: [BuiltinTarget; 2] = [Self::Pixi, Self::PixiBuildBackends];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pixi => "pixi",
            Self::PixiBuildBackends => "pixi-build-backends",
            Self::CondaPackages => "conda-packages",
        }
    }

    pub fn repository(&self) -> RepoSlug {
        let name = match self {
            Self::Pixi => "pixi",
            Self::PixiBuildBackends | Self::CondaPackages => "pixi-build-backends",
        };
        RepoSlug {
            owner: "prefix-dev".to_string(),
            name: name.to_string(),
        }
    }

    pub fn workflow(&self) -> &'static str {
        match self {
            Self::Pixi => "CI",
            Self::PixiBuildBackends => "Testsuite",
            Self::CondaPackages => "Conda Packages",
        }
    }

    /// Environment variable naming the PR whose artifacts should be used.
    pub fn pr_env_var(&self) -> &'static str {
        match self {
            Self::Pixi => "PIXI_PR_NUMBER",
            Self::PixiBuildBackends | Self::CondaPackages => "BUILD_BACKENDS_PR_NUMBER",
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Pixi => ArtifactKind::Pixi,
            Self::PixiBuildBackends => ArtifactKind::BuildBackends,
            Self::CondaPackages => ArtifactKind::CondaPackages,
        }
    }

    /// Build the target, taking the PR number from the raw env value if it is numeric.
    pub fn resolve(&self, pr_value: Option<&str>) -> ArtifactTarget {
        ArtifactTarget {
            repository: self.repository(),
            workflow: self.workflow().to_string(),
            pr_number: pr_value.and_then(parse_pr_number),
            kind: self.kind(),
        }
    }
}

impl FromStr for BuiltinTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pixi" => Ok(Self::Pixi),
            "pixi-build-backends" => Ok(Self::PixiBuildBackends),
            "conda-packages" => Ok(Self::CondaPackages),
            other => Err(format!(
                "unknown repository '{other}', expected one of: pixi, pixi-build-backends, conda-packages"
            )),
        }
    }
}

impl fmt::Display for BuiltinTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A PR number is only honored when the value is made of ASCII digits.
pub fn parse_pr_number(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use pixi_ci_platform::Arch;

    use super::*;

    #[test]
    fn slug_round_trips_through_display() {
        let slug: RepoSlug = "prefix-dev/pixi".parse().unwrap();
        assert_eq!(slug.owner(), "prefix-dev");
        assert_eq!(slug.name(), "pixi");
        assert_eq!(slug.to_string(), "prefix-dev/pixi");
    }

    #[test]
    fn malformed_slugs_are_rejected() {
        for bad in ["pixi", "/pixi", "prefix-dev/", "a/b/c", ""] {
            assert!(bad.parse::<RepoSlug>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn pr_number_requires_digits() {
        assert_eq!(parse_pr_number("1234"), Some(1234));
        assert_eq!(parse_pr_number(""), None);
        assert_eq!(parse_pr_number(" 12"), None);
        assert_eq!(parse_pr_number("#12"), None);
        assert_eq!(parse_pr_number("-1"), None);
    }

    #[test]
    fn builtin_targets_resolve() {
        let pixi = BuiltinTarget::Pixi.resolve(Some("42"));
        assert_eq!(pixi.repository.to_string(), "prefix-dev/pixi");
        assert_eq!(pixi.workflow, "CI");
        assert_eq!(pixi.pr_number, Some(42));

        let conda = BuiltinTarget::CondaPackages.resolve(Some("not-a-number"));
        assert_eq!(conda.repository.to_string(), "prefix-dev/pixi-build-backends");
        assert_eq!(conda.workflow, "Conda Packages");
        assert_eq!(conda.pr_number, None);
        assert_eq!(conda.kind, ArtifactKind::CondaPackages);
    }

    #[test]
    fn builtin_names_parse() {
        for target in [
            BuiltinTarget::Pixi,
            BuiltinTarget::PixiBuildBackends,
            BuiltinTarget::CondaPackages,
        ] {
            assert_eq!(target.name().parse::<BuiltinTarget>().unwrap(), target);
        }
        assert!("pixi-build".parse::<BuiltinTarget>().is_err());
    }

    #[test]
    fn name_patterns_follow_platform() {
        let linux = Platform::new(Os::Linux, Arch::X86_64);
        let mac = Platform::new(Os::Macos, Arch::Aarch64);
        assert_eq!(ArtifactKind::Pixi.name_pattern(&linux).unwrap(), "pixi-linux-x86_64");
        assert_eq!(
            ArtifactKind::BuildBackends.name_pattern(&mac).unwrap(),
            "pixi-build-backends-macos-aarch64"
        );
        assert_eq!(
            ArtifactKind::CondaPackages.name_pattern(&mac).unwrap(),
            "conda-packages-osx-arm64"
        );
    }

    #[test]
    fn slug_serializes_as_string() {
        let slug: RepoSlug = "prefix-dev/pixi".parse().unwrap();
        assert_eq!(serde_json::to_string(&slug).unwrap(), "\"prefix-dev/pixi\"");
    }
}
