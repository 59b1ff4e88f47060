//! Joining resolved mapping archives into one.
//!
//! A merged channel resolves to two archives: the official-names archive
//! (primary) and the community-names archive (secondary). The external
//! rewriter consumes exactly one archive, so the two are collapsed: every
//! entry of the primary is copied verbatim (names, payloads, timestamps),
//! and the secondary donates only its `params.csv` entry when it has one.
//!
//! The join is cached by content fingerprint ([`HashStore`]): identical
//! inputs with the output still on disk skip the merge entirely. The output
//! is published atomically (temp file in the destination directory, then
//! rename), so a failed join never leaves a partial archive behind.
//!
//! Join failures are recoverable by design: [`join_or_first`] logs the
//! error and falls back to the unmerged primary archive rather than
//! blocking the build.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::hashstore::HashStore;
use crate::names::PARAMS_ENTRY;

/// Marker inserted before the file extension of the derived output path.
const JOINED_MARKER: &str = "-joined";

/// Suffix of the fingerprint record kept next to the joined output.
const RECORD_SUFFIX: &str = "input";

// ---------------------------------------------------------------------------
// JoinError
// ---------------------------------------------------------------------------

/// A recoverable archive-join failure.
///
/// Never propagated as a hard failure — callers go through
/// [`join_or_first`], which substitutes the primary archive.
#[derive(Debug)]
pub enum JoinError {
    /// An I/O failure outside any specific archive.
    Io {
        /// Human-readable description.
        detail: String,
    },
    /// An archive could not be opened or copied.
    Archive {
        /// Path to the offending archive.
        path: PathBuf,
        /// Human-readable description.
        detail: String,
    },
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "archive join I/O error: {detail}"),
            Self::Archive { path, detail } => {
                write!(f, "archive join error in '{}': {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for JoinError {}

impl From<std::io::Error> for JoinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            detail: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived paths
// ---------------------------------------------------------------------------

/// The output path for a join: the first input with `-joined` inserted
/// before its extension (`mappings.zip` → `mappings-joined.zip`).
#[must_use]
pub fn joined_path(first: &Path) -> PathBuf {
    let stem = first
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let name = first.extension().map_or_else(
        || format!("{stem}{JOINED_MARKER}"),
        |ext| format!("{stem}{JOINED_MARKER}.{}", ext.to_string_lossy()),
    );
    first.with_file_name(name)
}

/// The fingerprint record path for a joined output (`<output>.input`).
#[must_use]
pub fn record_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    name.push('.');
    name.push_str(RECORD_SUFFIX);
    output.with_file_name(name)
}

// ---------------------------------------------------------------------------
// join_mappings
// ---------------------------------------------------------------------------

/// Collapse an ordered archive list (primary first) into a single archive.
///
/// - One input: returned unchanged, nothing written.
/// - Cache hit (fingerprint record matches and the output exists): the
///   existing output is returned without rewriting it.
/// - Otherwise: merge, publish atomically, persist the new fingerprint.
///
/// # Errors
/// Returns [`JoinError`] on any I/O failure; the output file is left
/// untouched in that case (the partial result lived in a temp file).
pub fn join_mappings(inputs: &[PathBuf]) -> Result<PathBuf, JoinError> {
    let Some(first) = inputs.first() else {
        return Err(JoinError::Io {
            detail: "no input archives given".to_owned(),
        });
    };
    if inputs.len() == 1 {
        return Ok(first.clone());
    }

    let output = joined_path(first);
    let record = record_path(&output);

    let store = HashStore::of_inputs(inputs)?;
    if store.matches(&record) && output.exists() {
        debug!(output = %output.display(), "joined archive up to date, skipping merge");
        return Ok(output);
    }

    merge_archives(first, &inputs[1], &output)?;
    store.save(&record)?;
    info!(
        inputs = inputs.len(),
        output = %output.display(),
        "joined mapping archives"
    );
    Ok(output)
}

/// [`join_mappings`] with the documented fallback: on failure, log a
/// warning and hand back the first archive unmerged so the build can keep
/// going.
#[must_use]
pub fn join_or_first(inputs: &[PathBuf]) -> PathBuf {
    match join_mappings(inputs) {
        Ok(path) => path,
        Err(err) => {
            warn!(error = %err, "joining mapping archives failed, falling back to the first archive");
            inputs.first().cloned().unwrap_or_default()
        }
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

fn merge_archives(primary: &Path, secondary: &Path, output: &Path) -> Result<(), JoinError> {
    let parent = output.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir)?;
    }

    let mut tmp = NamedTempFile::new_in(parent.unwrap_or_else(|| Path::new(".")))?;
    {
        let mut writer = zip::ZipWriter::new(tmp.as_file_mut());

        // Primary contributes everything, raw copy preserves entry names,
        // payloads, and modification timestamps.
        let mut primary_zip = open_archive(primary)?;
        for index in 0..primary_zip.len() {
            let entry = primary_zip
                .by_index_raw(index)
                .map_err(|e| archive_err(primary, format!("entry {index}: {e}")))?;
            writer
                .raw_copy_file(entry)
                .map_err(|e| archive_err(primary, format!("copy of entry {index} failed: {e}")))?;
        }

        // Secondary donates params.csv only; absence is a no-op.
        let mut secondary_zip = open_archive(secondary)?;
        if let Some(index) = secondary_zip.index_for_name(PARAMS_ENTRY) {
            let entry = secondary_zip
                .by_index_raw(index)
                .map_err(|e| archive_err(secondary, format!("entry '{PARAMS_ENTRY}': {e}")))?;
            writer.raw_copy_file(entry).map_err(|e| {
                archive_err(secondary, format!("copy of '{PARAMS_ENTRY}' failed: {e}"))
            })?;
        } else {
            debug!(
                secondary = %secondary.display(),
                "secondary archive has no {PARAMS_ENTRY} entry, nothing to donate"
            );
        }

        writer
            .finish()
            .map_err(|e| archive_err(output, format!("finalize failed: {e}")))?;
    }

    tmp.as_file().sync_all()?;
    tmp.persist(output).map_err(|e| JoinError::Io {
        detail: format!("publish of '{}' failed: {}", output.display(), e.error),
    })?;
    Ok(())
}

fn open_archive(path: &Path) -> Result<zip::ZipArchive<fs::File>, JoinError> {
    let file =
        fs::File::open(path).map_err(|e| archive_err(path, format!("open failed: {e}")))?;
    zip::ZipArchive::new(file)
        .map_err(|e| archive_err(path, format!("not a readable zip archive: {e}")))
}

fn archive_err(path: &Path, detail: String) -> JoinError {
    JoinError::Archive {
        path: path.to_path_buf(),
        detail,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
