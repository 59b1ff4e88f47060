//! Content fingerprints for skip-if-unchanged caching.
//!
//! A [`HashStore`] is the SHA-256 fingerprint of an ordered input file list.
//! It is persisted as a small text record next to the derived output
//! (`<output>.input`) and compared on the next run: identical record + output
//! still present means the previous output can be reused without re-merging.
//!
//! Whole-file hashing is deliberate — file length or mtime comparisons give
//! stale-cache false positives when an input is regenerated with identical
//! size.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// HashStore
// ---------------------------------------------------------------------------

/// SHA-256 fingerprint of a set of input files, keyed by path.
///
/// The record serialization is `sha256sum`-style: one `<hex>  <path>` line
/// per input, sorted by path so the record is deterministic regardless of
/// input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HashStore {
    entries: BTreeMap<String, String>,
}

impl HashStore {
    /// Fingerprint the given input files.
    ///
    /// # Errors
    /// Returns an error if any input cannot be opened or read.
    pub fn of_inputs(inputs: &[PathBuf]) -> io::Result<Self> {
        let mut entries = BTreeMap::new();
        for input in inputs {
            entries.insert(input.display().to_string(), hash_file(input)?);
        }
        Ok(Self { entries })
    }

    /// Whether the persisted record at `record_path` matches this
    /// fingerprint.
    ///
    /// A missing or unreadable record never matches — the caller re-merges
    /// and overwrites it.
    #[must_use]
    pub fn matches(&self, record_path: &Path) -> bool {
        let Ok(content) = fs::read_to_string(record_path) else {
            return false;
        };
        Self::parse(&content).is_some_and(|persisted| persisted == self.entries)
    }

    /// Persist this fingerprint to `record_path`, overwriting any previous
    /// record.
    ///
    /// # Errors
    /// Returns an error if the record file cannot be written.
    pub fn save(&self, record_path: &Path) -> io::Result<()> {
        fs::write(record_path, self.render())
    }

    /// Number of fingerprinted inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store fingerprints no inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (path, hash) in &self.entries {
            let _ = writeln!(out, "{hash}  {path}");
        }
        out
    }

    fn parse(content: &str) -> Option<BTreeMap<String, String>> {
        let mut entries = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let (hash, path) = line.split_once("  ")?;
            entries.insert(path.to_owned(), hash.to_owned());
        }
        Some(entries)
    }
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// SHA-256 of a file's contents as a lowercase hex string (64 chars).
fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for b in digest {
        let _ = write!(hex, "{b:02x}");
    }
    Ok(hex)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
