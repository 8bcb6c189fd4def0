//! Extraction of recognized entries from CI artifact archives.
//!
//! # Architecture
//!
//! - `selector.rs` - Which archive entries are wanted
//! - `sanitize.rs` - Flattening entry names to a safe base name
//! - `extract.rs` - Reading the zip and placing matches

pub use error::{Error, Result};
pub use extract::{ExtractedEntry, ExtractionReport, extract_file, extract_from_reader};
pub use sanitize::flatten_entry_name;
pub use selector::EntrySelector;

mod error;
mod extract;
mod sanitize;
mod selector;
