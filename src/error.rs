//! Error types for remapkit.
//!
//! Defines [`RemapError`], the unified error type for identifier parsing,
//! name-table loading, and table generation. Messages are designed to be
//! pipeline-friendly: each variant states what went wrong and carries the
//! offending identifier or path(s).
//!
//! Archive joining has its own recoverable error type
//! ([`crate::join::JoinError`]) because a failed join is handled with a
//! fallback at the call site rather than propagated.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// RemapError
// ---------------------------------------------------------------------------

/// Unified error type for remapkit operations.
///
/// Each variant is self-contained: the message includes the offending
/// identifier or path so a build log line is enough to diagnose the failure.
#[derive(Debug)]
pub enum RemapError {
    /// A composite mapping identifier could not be split into channel and
    /// version.
    MalformedIdentifier {
        /// The identifier string that failed to parse.
        value: String,
    },

    /// One or more declared input files are absent at orchestration time.
    ///
    /// Raised before any work is attempted; nothing is partially written.
    MissingInputs {
        /// Every absent path, not just the first one found.
        paths: Vec<PathBuf>,
    },

    /// An output format selector did not match any known format.
    UnknownFormat {
        /// The selector string that was provided.
        value: String,
    },

    /// A mapping table file could not be parsed or serialized.
    Table {
        /// Path to the table file.
        path: PathBuf,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// A mapping archive could not be opened or read.
    Archive {
        /// Path to the archive.
        path: PathBuf,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// An I/O error occurred outside any more specific context.
    Io(std::io::Error),
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for RemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedIdentifier { value } => {
                write!(
                    f,
                    "invalid mapping identifier '{value}': expected the form {{channel}}_{{version}}, split at the last underscore"
                )
            }
            Self::MissingInputs { paths } => {
                write!(f, "missing {} input file(s):", paths.len())?;
                for p in paths {
                    write!(f, "\n  - {}", p.display())?;
                }
                write!(
                    f,
                    "\n  To fix: check that every mapping file was resolved before generating."
                )
            }
            Self::UnknownFormat { value } => {
                write!(f, "unknown table format '{value}'. Known formats: tsrg, srg")
            }
            Self::Table { path, detail } => {
                write!(f, "mapping table error in '{}': {detail}", path.display())
            }
            Self::Archive { path, detail } => {
                write!(f, "mapping archive error in '{}': {detail}", path.display())
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

// ---------------------------------------------------------------------------
// std::error::Error / From impls
// ---------------------------------------------------------------------------

impl std::error::Error for RemapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RemapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
