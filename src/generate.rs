//! Combined rename-table generation.
//!
//! Takes the base obfuscated→srg table plus the resolved community name
//! archives and produces the requested combined table along three
//! independent axes:
//!
//! - *identity span*: srg→srg (the default — rename members in place
//!   without touching the obfuscated layer) or obfuscated→srg;
//! - *direction*: forward as derived, or reversed on write;
//! - *format*: see [`Format`].
//!
//! The srg→srg span is derived as `base.reverse().chain(&base)`: reversing
//! gives srg→obf, chaining back through the base gives srg→srg while
//! preserving whatever many-to-one resolution the base table already
//! encodes (see [`MappingFile::reverse`] for the tie-break).
//!
//! This step performs no caching of its own; an incremental wrapper that
//! skips the call when its declared inputs are unchanged is expected to sit
//! above it.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::RemapError;
use crate::names::NameTable;
use crate::rename::{KindSet, Renamer};
use crate::table::{Format, MappingFile};

// ---------------------------------------------------------------------------
// GenerateRequest
// ---------------------------------------------------------------------------

/// Inputs and switches for one generation run.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    /// The base obfuscated→srg table file.
    pub srg: PathBuf,
    /// Resolved community name archives, primary namespace first.
    pub names: Vec<PathBuf>,
    /// Where to write the combined table.
    pub output: PathBuf,
    /// Output serialization format.
    pub format: Format,
    /// Write the table in reverse direction (target→source).
    pub reverse: bool,
    /// Keep the obfuscated→srg span instead of deriving srg→srg.
    pub obfuscated: bool,
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Produce the combined rename table described by `req`.
///
/// Fails fast before any work if a declared input is absent; the error
/// lists every missing path, not just the first.
///
/// # Errors
/// [`RemapError::MissingInputs`] when inputs are absent,
/// [`RemapError::Table`] / [`RemapError::Archive`] when loading or writing
/// fails.
pub fn run(req: &GenerateRequest) -> Result<(), RemapError> {
    let missing: Vec<PathBuf> = std::iter::once(&req.srg)
        .chain(req.names.iter())
        .filter(|p| !p.exists())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(RemapError::MissingInputs { paths: missing });
    }

    let base = MappingFile::load(&req.srg)?;
    debug!(
        classes = base.classes.len(),
        packages = base.packages.len(),
        srg = %req.srg.display(),
        "loaded base table"
    );

    let working = if req.obfuscated {
        base
    } else {
        // Reverse makes srg->obf, chaining the base back makes srg->srg.
        base.reverse().chain(&base)
    };

    let names = NameTable::load(&req.names)?;
    debug!(names = names.len(), archives = req.names.len(), "loaded name table");

    let renamer = Renamer::new(names, KindSet::members());
    let result = working.rename(&renamer);

    result.write(&req.output, req.format, req.reverse)?;
    info!(
        output = %req.output.display(),
        format = %req.format,
        reverse = req.reverse,
        obfuscated = req.obfuscated,
        "wrote combined rename table"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
