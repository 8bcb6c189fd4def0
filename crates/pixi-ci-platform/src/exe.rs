//! Executable naming per platform.

use crate::os::{self, Os};

/// Append `.exe` on Windows.
pub fn exec_extension(name: &str) -> String {
    exec_extension_for(os::detect(), name)
}

/// Append `.bat` on Windows.
pub fn bat_extension(name: &str) -> String {
    with_suffix(os::detect(), name, ".bat")
}

pub fn exec_extension_for(os: Os, name: &str) -> String {
    with_suffix(os, name, ".exe")
}

fn with_suffix(os: Os, name: &str, suffix: &str) -> String {
    if os.is_windows() {
        format!("{name}{suffix}")
    } else {
        name.to_string()
    }
}
