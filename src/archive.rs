//! Archive extraction into a scoped scratch directory.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Unpack the EPUB at `path` into a fresh temporary directory.
///
/// The scratch directory is created under `scratch_parent`, or the system
/// temp directory when `None`. The returned [`TempDir`] owns the extracted
/// tree and deletes it when dropped, whichever way the conversion ends.
pub fn extract_archive(path: &Path, scratch_parent: Option<&Path>) -> Result<TempDir> {
    let file = File::open(path).map_err(|e| Error::Archive {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    extract_from_reader(file, path, scratch_parent)
}

/// Unpack an archive from any [`Read`] + [`Seek`] source.
///
/// `origin` only labels errors.
pub fn extract_from_reader<R: Read + Seek>(
    reader: R,
    origin: &Path,
    scratch_parent: Option<&Path>,
) -> Result<TempDir> {
    let archive_err = |source| Error::Archive {
        path: origin.to_path_buf(),
        source,
    };

    let mut archive = ZipArchive::new(reader).map_err(archive_err)?;
    let scratch = scratch_dir(scratch_parent)?;

    // Entries resolving outside the scratch root are refused by the zip crate.
    archive.extract(scratch.path()).map_err(archive_err)?;

    debug!(
        entries = archive.len(),
        scratch = %scratch.path().display(),
        "Extracted archive"
    );
    Ok(scratch)
}

fn scratch_dir(parent: Option<&Path>) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("fxl2html-");
    match parent {
        Some(dir) => builder.tempdir_in(dir).map_err(|e| Error::io(dir, e)),
        None => builder
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e)),
    }
}
