//! The srg→readable name lookup.
//!
//! Community naming data ships as zip archives containing per-kind CSV
//! entries: `fields.csv`, `methods.csv`, and `params.csv`, each mapping an
//! intermediate ("srg") name to a human-readable name. [`NameTable::load`]
//! reads whichever of those entries are present across a list of archives
//! into one flat lookup.
//!
//! Lookups never fail: a name without an entry is returned unchanged. That
//! identity fallback is what makes partially-covered community mappings
//! usable — unnamed symbols simply keep their srg names.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use crate::error::RemapError;

// ---------------------------------------------------------------------------
// Archive entry names
// ---------------------------------------------------------------------------

/// CSV entry naming fields.
pub const FIELDS_ENTRY: &str = "fields.csv";

/// CSV entry naming methods.
pub const METHODS_ENTRY: &str = "methods.csv";

/// CSV entry naming method parameters.
pub const PARAMS_ENTRY: &str = "params.csv";

const CSV_ENTRIES: [&str; 3] = [FIELDS_ENTRY, METHODS_ENTRY, PARAMS_ENTRY];

// ---------------------------------------------------------------------------
// NameTable
// ---------------------------------------------------------------------------

/// A flat srg→readable name lookup with identity fallback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameTable {
    names: BTreeMap<String, String>,
}

impl NameTable {
    /// Build a table from explicit (srg, readable) pairs. Mostly for tests.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(srg, readable)| (srg.into(), readable.into()))
                .collect(),
        }
    }

    /// Load the CSV name entries from each archive, in order.
    ///
    /// Archives later in the list override earlier ones on duplicate srg
    /// names. An archive missing some (or all) of the CSV entries
    /// contributes whatever it has; that is not an error.
    ///
    /// # Errors
    /// Returns [`RemapError::Archive`] if an archive cannot be opened or a
    /// present CSV entry cannot be read.
    pub fn load(archives: &[PathBuf]) -> Result<Self, RemapError> {
        let mut table = Self::default();
        for archive in archives {
            table.load_archive(archive)?;
        }
        Ok(table)
    }

    /// Look up a readable name, falling back to the srg name unchanged.
    #[must_use]
    pub fn rename<'a>(&'a self, srg: &'a str) -> &'a str {
        self.names.get(srg).map_or(srg, String::as_str)
    }

    /// Look up a readable name, `None` when absent.
    #[must_use]
    pub fn get(&self, srg: &str) -> Option<&str> {
        self.names.get(srg).map(String::as_str)
    }

    /// Number of named symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table names no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn load_archive(&mut self, path: &Path) -> Result<(), RemapError> {
        let file = fs::File::open(path).map_err(|e| RemapError::Archive {
            path: path.to_path_buf(),
            detail: format!("open failed: {e}"),
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| RemapError::Archive {
            path: path.to_path_buf(),
            detail: format!("not a readable zip archive: {e}"),
        })?;

        for entry_name in CSV_ENTRIES {
            let mut content = String::new();
            match archive.by_name(entry_name) {
                Ok(mut entry) => {
                    entry
                        .read_to_string(&mut content)
                        .map_err(|e| RemapError::Archive {
                            path: path.to_path_buf(),
                            detail: format!("read of entry '{entry_name}' failed: {e}"),
                        })?;
                }
                Err(zip::result::ZipError::FileNotFound) => continue,
                Err(e) => {
                    return Err(RemapError::Archive {
                        path: path.to_path_buf(),
                        detail: format!("entry '{entry_name}': {e}"),
                    });
                }
            }
            self.load_csv(&content);
        }
        Ok(())
    }

    /// Parse `srg,readable[,...]` lines, skipping the header row.
    fn load_csv(&mut self, content: &str) {
        for line in content.lines() {
            let mut fields = line.split(',');
            let (Some(srg), Some(readable)) = (fields.next(), fields.next()) else {
                continue;
            };
            // Header rows name their columns ("searge,name,..." or
            // "param,name,...").
            if srg == "searge" || srg == "param" {
                continue;
            }
            let readable = readable.trim_matches('"');
            if srg.is_empty() || readable.is_empty() {
                continue;
            }
            self.names.insert(srg.to_owned(), readable.to_owned());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
