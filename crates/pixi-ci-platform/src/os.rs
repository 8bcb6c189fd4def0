//! Operating system detection.

use std::fmt;

/// Operating systems the CI artifacts are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Macos,
    Windows,
    Unknown,
}

impl Os {
    /// Parse a system name as reported by `uname -s` or `std::env::consts::OS`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linux" => Os::Linux,
            "darwin" | "macos" => Os::Macos,
            "windows" => Os::Windows,
            _ => Os::Unknown,
        }
    }

    pub fn is_windows(self) -> bool {
        self == Os::Windows
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Os::Linux => "linux",
            Os::Macos => "darwin",
            Os::Windows => "windows",
            Os::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Detect the current operating system.
pub fn detect() -> Os {
    Os::from_name(std::env::consts::OS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!(Os::from_name("Linux"), Os::Linux);
        assert_eq!(Os::from_name("Darwin"), Os::Macos);
        assert_eq!(Os::from_name("macos"), Os::Macos);
        assert_eq!(Os::from_name("Windows"), Os::Windows);
        assert_eq!(Os::from_name("freebsd"), Os::Unknown);
    }

    #[test]
    fn detect_matches_build_target() {
        #[cfg(target_os = "linux")]
        assert_eq!(detect(), Os::Linux);
        #[cfg(target_os = "macos")]
        assert_eq!(detect(), Os::Macos);
        #[cfg(windows)]
        assert_eq!(detect(), Os::Windows);
    }
}
