//! Platform detection and process helpers.
//!
//! - `os.rs` / `arch.rs` - Operating system and CPU detection
//! - `platform.rs` - Artifact platform tags and conda targets
//! - `exe.rs` - Executable and script suffixes
//! - `command.rs` - Captured subprocess execution
//! - `git.rs` - Thin `git` wrapper

pub use arch::Arch;
pub use command::{CapturedOutput, Command};
pub use error::{Error, Result};
pub use exe::{bat_extension, exec_extension};
pub use git::Git;
pub use os::Os;
pub use platform::Platform;

pub mod arch;
pub mod command;
mod error;
pub mod exe;
pub mod git;
pub mod os;
pub mod platform;
