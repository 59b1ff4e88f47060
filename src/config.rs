//! Project configuration (`remapkit.toml`).
//!
//! Optional per-project defaults for the generate step, read from
//! `remapkit.toml` in the working directory. Missing file → all defaults
//! (no error); missing fields use their defaults, so old files keep working
//! when new fields are added.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::table::Format;

/// Configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "remapkit.toml";

// ---------------------------------------------------------------------------
// RemapConfig
// ---------------------------------------------------------------------------

/// Top-level remapkit configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemapConfig {
    /// Defaults for the generate step.
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Defaults for the generate step. CLI flags override these.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    /// Default output format.
    #[serde(default)]
    pub format: Format,
    /// Write reversed tables by default.
    #[serde(default)]
    pub reverse: bool,
    /// Keep the obfuscated span by default.
    #[serde(default)]
    pub obfuscated: bool,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load `remapkit.toml` from `dir`, defaulting everything when absent.
///
/// # Errors
/// Returns an error only if the file exists but cannot be read or parsed.
pub fn load(dir: &Path) -> Result<RemapConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(RemapConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = load(dir.path()).unwrap();
        assert_eq!(config, RemapConfig::default());
        assert_eq!(config.generate.format, Format::Tsrg);
        assert!(!config.generate.reverse);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generate]\nformat = \"srg\"\n",
        )
        .unwrap();
        let config = load(dir.path()).unwrap();
        assert_eq!(config.generate.format, Format::Srg);
        assert!(!config.generate.obfuscated);
    }

    #[test]
    fn full_file_parses() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generate]\nformat = \"tsrg\"\nreverse = true\nobfuscated = true\n",
        )
        .unwrap();
        let config = load(dir.path()).unwrap();
        assert!(config.generate.reverse);
        assert!(config.generate.obfuscated);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[generate]\ntypo = 1\n").unwrap();
        assert!(load(dir.path()).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generate]\nformat = \"proguard\"\n",
        )
        .unwrap();
        assert!(load(dir.path()).is_err());
    }
}
