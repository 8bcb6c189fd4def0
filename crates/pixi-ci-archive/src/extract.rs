use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use pixi_ci_fs::{remove_existing, set_executable};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::sanitize::flatten_entry_name;
use crate::selector::EntrySelector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// Name of the entry inside the archive.
    pub entry: String,
    /// Where it was written.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Every entry name in the archive, in archive order.
    pub entries: Vec<String>,
    pub extracted: Vec<ExtractedEntry>,
}

/// Open the zip at `archive` and extract the selected entries into `destination`.
pub fn extract_file(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    selector: EntrySelector,
) -> Result<ExtractionReport> {
    let archive = archive.as_ref();
    let file = File::open(archive).map_err(|source| Error::ExtractionFailed {
        path: archive.to_path_buf(),
        source,
    })?;
    extract_from_reader(file, destination, selector)
}

/// Extract the entries chosen by `selector`, flattened to their base name.
///
/// Anything already present at a target path is removed first. Executable
/// selectors get mode `0o755` on Unix.
pub fn extract_from_reader<R: Read + Seek>(
    reader: R,
    destination: impl AsRef<Path>,
    selector: EntrySelector,
) -> Result<ExtractionReport> {
    let destination = destination.as_ref();
    let mut archive = zip::ZipArchive::new(reader)?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        entries.push(archive.by_index_raw(index)?.name().to_string());
    }
    info!(contents = ?entries, "archive contents");

    let selected: Vec<String> = selector
        .select(&entries)
        .into_iter()
        .map(str::to_string)
        .collect();
    if selected.is_empty() {
        return Err(Error::NotFound {
            what: selector.describe(),
            entries,
        });
    }
    debug!(count = selected.len(), "matched archive entries");

    fs::create_dir_all(destination).map_err(|source| Error::ExtractionFailed {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut extracted = Vec::with_capacity(selected.len());
    for name in selected {
        let target = destination.join(flatten_entry_name(&name)?);
        remove_existing(&target)?;

        let mut file = archive.by_name(&name)?;
        let mut out = File::create(&target).map_err(|source| Error::ExtractionFailed {
            path: target.clone(),
            source,
        })?;
        io::copy(&mut file, &mut out).map_err(|source| Error::ExtractionFailed {
            path: target.clone(),
            source,
        })?;
        drop(out);

        if selector.is_executable() {
            set_executable(&target)?;
        }
        info!(entry = %name, path = %target.display(), "extracted");
        extracted.push(ExtractedEntry {
            entry: name,
            path: target,
        });
    }

    Ok(ExtractionReport { entries, extracted })
}
