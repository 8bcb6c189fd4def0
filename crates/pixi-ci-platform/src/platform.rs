//! Platform identifiers used in artifact names.

use crate::arch::{self, Arch};
use crate::error::{Error, Result};
use crate::os::{self, Os};

/// An operating system and CPU pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The platform of the running machine.
    pub fn current() -> Self {
        Self::new(os::detect(), arch::detect())
    }

    /// Tag used by the pixi and backend CI workflows, e.g. `linux-x86_64`.
    pub fn tag(&self) -> Result<&'static str> {
        match (self.os, self.arch) {
            (Os::Linux, Arch::X86_64) => Ok("linux-x86_64"),
            (Os::Linux, Arch::Aarch64) => Ok("linux-aarch64"),
            (Os::Macos, Arch::Aarch64) => Ok("macos-aarch64"),
            (Os::Macos, Arch::X86_64) => Ok("macos-x86_64"),
            (Os::Windows, Arch::X86_64) => Ok("windows-x86_64"),
            _ => Err(self.unsupported()),
        }
    }

    /// Conda subdir name, e.g. `osx-arm64`.
    pub fn conda_target(&self) -> Result<&'static str> {
        match (self.os, self.arch) {
            (Os::Linux, Arch::X86_64) => Ok("linux-64"),
            (Os::Linux, Arch::Aarch64) => Ok("linux-aarch64"),
            (Os::Linux, Arch::Ppc64le) => Ok("linux-ppc64le"),
            (Os::Macos, Arch::Aarch64) => Ok("osx-arm64"),
            (Os::Macos, Arch::X86_64) => Ok("osx-64"),
            (Os::Windows, Arch::X86_64) => Ok("win-64"),
            _ => Err(self.unsupported()),
        }
    }

    /// Parse either an artifact tag (`macos-aarch64`) or a conda target (`osx-arm64`).
    pub fn from_tag(tag: &str) -> Result<Self> {
        const OSES: [Os; 3] = [Os::Linux, Os::Macos, Os::Windows];
        const ARCHES: [Arch; 3] = [Arch::X86_64, Arch::Aarch64, Arch::Ppc64le];
        OSES.iter()
            .flat_map(|os| ARCHES.iter().map(move |arch| Platform::new(*os, *arch)))
            .find(|p| p.tag().ok() == Some(tag) || p.conda_target().ok() == Some(tag))
            .ok_or_else(|| Error::UnknownPlatformTag(tag.to_string()))
    }

    fn unsupported(&self) -> Error {
        Error::UnsupportedPlatform {
            os: self.os.to_string(),
            arch: self.arch.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OS: [Os; 4] = [Os::Linux, Os::Macos, Os::Windows, Os::Unknown];
    const ALL_ARCH: [Arch; 6] = [
        Arch::X86,
        Arch::X86_64,
        Arch::Arm,
        Arch::Aarch64,
        Arch::Ppc64le,
        Arch::Unknown,
    ];

    #[test]
    fn tag_is_enumerated_or_error() {
        let allowed = [
            "linux-x86_64",
            "linux-aarch64",
            "macos-aarch64",
            "macos-x86_64",
            "windows-x86_64",
        ];
        let mut supported = 0;
        for os in ALL_OS {
            for arch in ALL_ARCH {
                match Platform::new(os, arch).tag() {
                    Ok(tag) => {
                        assert!(allowed.contains(&tag), "unexpected tag {tag}");
                        supported += 1;
                    }
                    Err(err) => assert!(matches!(err, Error::UnsupportedPlatform { .. })),
                }
            }
        }
        assert_eq!(supported, allowed.len());
    }

    #[test]
    fn conda_target_covers_ppc64le() {
        let platform = Platform::new(Os::Linux, Arch::Ppc64le);
        assert_eq!(platform.conda_target().unwrap(), "linux-ppc64le");
        assert!(platform.tag().is_err());
    }

    #[test]
    fn unsupported_message_names_the_pair() {
        let err = Platform::new(Os::Windows, Arch::Aarch64).tag().unwrap_err();
        assert_eq!(err.to_string(), "unsupported platform: windows-aarch64");
    }

    #[test]
    fn from_tag_accepts_both_spellings() {
        let mac = Platform::new(Os::Macos, Arch::Aarch64);
        assert_eq!(Platform::from_tag("macos-aarch64").unwrap(), mac);
        assert_eq!(Platform::from_tag("osx-arm64").unwrap(), mac);
        assert_eq!(
            Platform::from_tag("linux-ppc64le").unwrap(),
            Platform::new(Os::Linux, Arch::Ppc64le)
        );
        assert!(Platform::from_tag("solaris-sparc").is_err());
    }
}
