//! Architecture detection.

use std::fmt;

/// CPU architecture types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86,
    X86_64,
    Arm,
    Aarch64,
    Ppc64le,
    Unknown,
}

impl Arch {
    /// Parse a machine name as reported by `uname -m`.
    pub fn from_machine(machine: &str) -> Self {
        match machine.to_ascii_lowercase().as_str() {
            "i386" | "i686" | "x86" => Arch::X86,
            "x86_64" | "amd64" => Arch::X86_64,
            "arm" | "armv7l" => Arch::Arm,
            "aarch64" | "arm64" => Arch::Aarch64,
            "ppc64le" | "powerpc64le" => Arch::Ppc64le,
            _ => Arch::Unknown,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Arm => "arm",
            Arch::Aarch64 => "aarch64",
            Arch::Ppc64le => "ppc64le",
            Arch::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Detect the architecture of the running machine.
pub fn detect() -> Arch {
    let cpu_arch = sysinfo::System::cpu_arch();
    match Arch::from_machine(cpu_arch.as_str()) {
        Arch::Unknown => Arch::from_machine(std::env::consts::ARCH),
        arch => arch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_collapse() {
        assert_eq!(Arch::from_machine("AMD64"), Arch::X86_64);
        assert_eq!(Arch::from_machine("arm64"), Arch::Aarch64);
        assert_eq!(Arch::from_machine("ppc64le"), Arch::Ppc64le);
        assert_eq!(Arch::from_machine("riscv64"), Arch::Unknown);
    }

    #[test]
    fn detect_is_known_on_ci_hosts() {
        #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
        assert_ne!(detect(), Arch::Unknown);
    }
}
