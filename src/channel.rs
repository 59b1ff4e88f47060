//! Mapping channel identifiers and merged-channel splitting.
//!
//! A mapping identifier has the composite form `{channel}_{version}`, split
//! at the *last* underscore so the channel itself may contain underscores
//! (e.g. `official_snapshot_20230602-1.20.1` is channel `official_snapshot`,
//! version `20230602-1.20.1`).
//!
//! Two reserved channels are *merged*: a single identifier standing in for
//! two independently versioned namespaces — the official (vanilla) names and
//! the community names. [`MappingKey::split`] turns a merged key into the
//! two ordinary keys; non-merged keys split into themselves.
//!
//! Everything here is pure parsing; nothing touches the filesystem.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RemapError;

// ---------------------------------------------------------------------------
// Channel constants
// ---------------------------------------------------------------------------

/// The channel a merged identifier's primary (official) half resolves to.
pub const CHANNEL_OFFICIAL: &str = "official";

/// Merged channel: official names plus community snapshot names.
pub const CHANNEL_OFFICIAL_SNAPSHOT: &str = "official_snapshot";

/// Merged channel: official names plus community stable names.
pub const CHANNEL_OFFICIAL_STABLE: &str = "official_stable";

/// Prefix stripped from a merged channel to obtain the secondary channel.
const MERGED_PREFIX: &str = "official_";

/// Separator joining channel and version in the composite form.
const COMPOSITE_SEPARATOR: char = '_';

/// Separator inside a merged version between the community date and the
/// game version (e.g. `20230602-1.20.1`).
const VERSION_SEPARATOR: char = '-';

/// Whether a channel denotes a merged (official + community) namespace.
///
/// Pure predicate over the channel string only; the version never matters.
#[must_use]
pub fn is_merged_channel(channel: &str) -> bool {
    channel == CHANNEL_OFFICIAL_SNAPSHOT || channel == CHANNEL_OFFICIAL_STABLE
}

// ---------------------------------------------------------------------------
// MappingKey
// ---------------------------------------------------------------------------

/// A versioned mapping namespace identifier: one channel at one version.
///
/// Immutable once constructed. The composite rendering is
/// `{channel}_{version}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingKey {
    /// The namespace channel (may itself contain underscores).
    pub channel: String,
    /// The channel-specific version string.
    pub version: String,
}

impl MappingKey {
    /// Create a key from already-separated parts.
    #[must_use]
    pub fn new(channel: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            version: version.into(),
        }
    }

    /// Parse a composite identifier, splitting at the last underscore.
    ///
    /// # Errors
    /// Returns [`RemapError::MalformedIdentifier`] if the identifier has no
    /// underscore to split at.
    pub fn parse(identifier: &str) -> Result<Self, RemapError> {
        let Some(idx) = identifier.rfind(COMPOSITE_SEPARATOR) else {
            return Err(RemapError::MalformedIdentifier {
                value: identifier.to_owned(),
            });
        };
        Ok(Self::new(&identifier[..idx], &identifier[idx + 1..]))
    }

    /// The composite `{channel}_{version}` rendering.
    #[must_use]
    pub fn composite(&self) -> String {
        format!(
            "{}{}{}",
            self.channel, COMPOSITE_SEPARATOR, self.version
        )
    }

    /// Whether this key's channel is a merged (two-namespace) channel.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        is_merged_channel(&self.channel)
    }

    /// Split into the underlying namespace keys.
    ///
    /// A merged key yields exactly two keys, primary (official) first:
    /// - primary: channel [`CHANNEL_OFFICIAL`], version = the part of this
    ///   key's version after its last `-` (the whole version when no `-` is
    ///   present);
    /// - secondary: channel = this channel with the `official_` prefix
    ///   stripped, version unchanged.
    ///
    /// A non-merged key yields itself, unchanged, as the only element.
    #[must_use]
    pub fn split(&self) -> Vec<Self> {
        split_channel(&self.channel, &self.version)
    }
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.channel, COMPOSITE_SEPARATOR, self.version)
    }
}

impl FromStr for MappingKey {
    type Err = RemapError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// [`MappingKey::split`] in explicit channel/version form.
#[must_use]
pub fn split_channel(channel: &str, version: &str) -> Vec<MappingKey> {
    if !is_merged_channel(channel) {
        return vec![MappingKey::new(channel, version)];
    }

    // Also correct when the version carries no '-': rsplit yields the whole
    // string as its first element.
    let game_version = version
        .rsplit(VERSION_SEPARATOR)
        .next()
        .unwrap_or(version);
    let secondary_channel = channel.strip_prefix(MERGED_PREFIX).unwrap_or(channel);

    vec![
        MappingKey::new(CHANNEL_OFFICIAL, game_version),
        MappingKey::new(secondary_channel, version),
    ]
}

/// Apply `resolve` once per element of [`split_channel`], in order
/// (primary first for merged channels).
///
/// This is the hook for the artifact-download layer: `resolve` typically
/// turns a channel/version pair into a local archive path.
pub fn resolve_all<T>(
    channel: &str,
    version: &str,
    mut resolve: impl FnMut(&str, &str) -> T,
) -> Vec<T> {
    split_channel(channel, version)
        .iter()
        .map(|key| resolve(&key.channel, &key.version))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -- parsing --

    #[test]
    fn parse_splits_at_last_underscore() {
        let key = MappingKey::parse("official_snapshot_20230602-1.20.1").unwrap();
        assert_eq!(key.channel, "official_snapshot");
        assert_eq!(key.version, "20230602-1.20.1");
    }

    #[test]
    fn parse_simple_identifier() {
        let key = MappingKey::parse("stable_39").unwrap();
        assert_eq!(key.channel, "stable");
        assert_eq!(key.version, "39");
    }

    #[test]
    fn parse_without_separator_fails() {
        let err = MappingKey::parse("snapshot").unwrap_err();
        match err {
            RemapError::MalformedIdentifier { value } => assert_eq!(value, "snapshot"),
            other => panic!("expected MalformedIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn composite_roundtrip() {
        let key = MappingKey::new("official_snapshot", "20230602-1.20.1");
        let reparsed = MappingKey::parse(&key.composite()).unwrap();
        assert_eq!(reparsed, key);
    }

    #[test]
    fn from_str_matches_parse() {
        let key: MappingKey = "snapshot_20210309-1.16.5".parse().unwrap();
        assert_eq!(key, MappingKey::new("snapshot", "20210309-1.16.5"));
    }

    // -- merged predicate --

    #[test]
    fn merged_channels_are_exactly_the_two_reserved_tokens() {
        assert!(is_merged_channel("official_snapshot"));
        assert!(is_merged_channel("official_stable"));
        assert!(!is_merged_channel("official"));
        assert!(!is_merged_channel("snapshot"));
        assert!(!is_merged_channel("stable"));
        assert!(!is_merged_channel("official_snapshot_nightly"));
        assert!(!is_merged_channel(""));
    }

    #[test]
    fn is_merged_ignores_version() {
        for version in ["", "1.20.1", "20230602-1.20.1", "x_y-z"] {
            assert!(MappingKey::new("official_stable", version).is_merged());
            assert!(!MappingKey::new("stable", version).is_merged());
        }
    }

    // -- splitting --

    #[test]
    fn non_merged_split_is_identity() {
        let key = MappingKey::new("snapshot", "20210309-1.16.5");
        assert_eq!(key.split(), vec![key.clone()]);
    }

    #[test]
    fn merged_snapshot_split_end_to_end() {
        // The canonical example: official_snapshot_20230602-1.20.1.
        let key = MappingKey::parse("official_snapshot_20230602-1.20.1").unwrap();
        let parts = key.split();
        assert_eq!(
            parts,
            vec![
                MappingKey::new("official", "1.20.1"),
                MappingKey::new("snapshot", "20230602-1.20.1"),
            ]
        );
    }

    #[test]
    fn merged_stable_split_strips_prefix() {
        let parts = split_channel("official_stable", "39-1.12.2");
        assert_eq!(
            parts,
            vec![
                MappingKey::new("official", "1.12.2"),
                MappingKey::new("stable", "39-1.12.2"),
            ]
        );
    }

    #[test]
    fn merged_split_without_version_separator_keeps_full_version() {
        let parts = split_channel("official_snapshot", "1.20.1");
        assert_eq!(parts[0], MappingKey::new("official", "1.20.1"));
        assert_eq!(parts[1], MappingKey::new("snapshot", "1.20.1"));
    }

    #[test]
    fn merged_split_uses_last_version_separator() {
        let parts = split_channel("official_snapshot", "2023-06-02-1.20.1");
        assert_eq!(parts[0].version, "1.20.1");
        assert_eq!(parts[1].version, "2023-06-02-1.20.1");
    }

    // -- resolve_all --

    #[test]
    fn resolve_all_applies_once_per_split_element() {
        let resolved = resolve_all("official_snapshot", "20230602-1.20.1", |c, v| {
            format!("{c}@{v}")
        });
        assert_eq!(
            resolved,
            vec!["official@1.20.1".to_owned(), "snapshot@20230602-1.20.1".to_owned()]
        );
    }

    #[test]
    fn resolve_all_non_merged_single_call() {
        let mut calls = 0;
        let resolved = resolve_all("stable", "39", |c, v| {
            calls += 1;
            (c.to_owned(), v.to_owned())
        });
        assert_eq!(calls, 1);
        assert_eq!(resolved, vec![("stable".to_owned(), "39".to_owned())]);
    }

    // -- properties --

    proptest! {
        #[test]
        fn prop_non_merged_split_is_identity(
            channel in "[a-z][a-z0-9_]{0,20}",
            version in "[0-9][0-9a-z.\\-]{0,20}",
        ) {
            prop_assume!(!is_merged_channel(&channel));
            let parts = split_channel(&channel, &version);
            prop_assert_eq!(parts, vec![MappingKey::new(channel, version)]);
        }

        #[test]
        fn prop_merged_split_version_algebra(
            merged in prop_oneof![
                Just("official_snapshot".to_owned()),
                Just("official_stable".to_owned()),
            ],
            version in "[0-9a-z.\\-]{1,30}",
        ) {
            let parts = split_channel(&merged, &version);
            prop_assert_eq!(parts.len(), 2);

            // Primary: official channel, version after the last '-'.
            prop_assert_eq!(parts[0].channel.as_str(), CHANNEL_OFFICIAL);
            let expected = version.rsplit('-').next().unwrap_or(&version);
            prop_assert_eq!(parts[0].version.as_str(), expected);

            // Secondary: prefix stripped, version untouched.
            prop_assert_eq!(
                parts[1].channel.as_str(),
                merged.strip_prefix("official_").unwrap()
            );
            prop_assert_eq!(parts[1].version.as_str(), version.as_str());
        }

        #[test]
        fn prop_parse_splits_at_last_underscore(
            channel in "[a-z][a-z_]{0,10}",
            version in "[0-9a-z.\\-]{1,15}",
        ) {
            prop_assume!(!version.contains('_'));
            let key = MappingKey::parse(&format!("{channel}_{version}")).unwrap();
            prop_assert_eq!(key.channel, channel);
            prop_assert_eq!(key.version, version);
        }
    }
}
