//! Lockfile regeneration.
//!
//! Every directory holding a `pixi.lock` beneath a base directory gets
//! `pixi lock` run in it, in sorted order. The first failure stops the run.

mod error;
mod locker;
mod update;

pub use error::{Error, Result};
pub use locker::{Locker, PixiLocker};
pub use update::{DEFAULT_DATA_DIR, LOCKFILE_NAME, LockReport, lockfile_dirs, target_dir, update_dirs, update_lockfiles};
