mod copy_tree;
mod error;
mod rw;
mod search;

pub use copy_tree::{CopyFilter, copy_tree};
pub use error::{Error, Result};
pub use rw::{atomic_write, remove_existing, set_executable};
pub use search::{contains_file_named, find_files_named};
