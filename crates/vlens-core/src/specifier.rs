//! Parsed form of a declared version requirement.

use node_semver::Range;
use serde::{Deserialize, Serialize};

/// Range text that accepts any version.
pub const ANY_RANGE: &str = "*";

/// Classification of a declared version requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecifierKind {
    /// A single pinned version (`1.2.3`)
    Exact,
    /// A comparator set (`^1.2.0`, `>=1.0.0 <2.0.0`)
    Range,
    /// A named tag (`latest`, `next`, `any`)
    Tag,
    /// Not expressible in the ecosystem grammar
    Unsupported,
}

/// A declared version requirement after parsing.
///
/// `resolved_version` holds the node-semver range text that the suggestion
/// engine evaluates. It is `None` only for `Unsupported` specifiers. Parsing
/// never fails: input the grammar cannot express becomes `Unsupported`.
///
/// # Examples
///
/// ```
/// use vlens_core::specifier::{parse_semver, SpecifierKind};
///
/// let spec = parse_semver("^1.2.0");
/// assert_eq!(spec.kind, SpecifierKind::Range);
/// assert_eq!(spec.resolved_version.as_deref(), Some("^1.2.0"));
///
/// let spec = parse_semver("not a version");
/// assert_eq!(spec.kind, SpecifierKind::Unsupported);
/// assert!(spec.resolved_version.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpecifier {
    pub raw_input: String,
    pub kind: SpecifierKind,
    pub raw_version: String,
    pub resolved_version: Option<String>,
    pub has_four_segments: bool,
}

impl VersionSpecifier {
    pub fn exact(raw_input: impl Into<String>, version: impl Into<String>) -> Self {
        let raw_input = raw_input.into();
        Self {
            raw_version: raw_input.trim().to_string(),
            raw_input,
            kind: SpecifierKind::Exact,
            resolved_version: Some(version.into()),
            has_four_segments: false,
        }
    }

    pub fn range(raw_input: impl Into<String>, range: impl Into<String>) -> Self {
        let raw_input = raw_input.into();
        Self {
            raw_version: raw_input.trim().to_string(),
            raw_input,
            kind: SpecifierKind::Range,
            resolved_version: Some(range.into()),
            has_four_segments: false,
        }
    }

    /// A tag specifier. Tags the registry does not map to a concrete
    /// version resolve to the any-version range.
    pub fn tag(raw_input: impl Into<String>, resolved: Option<String>) -> Self {
        let raw_input = raw_input.into();
        Self {
            raw_version: raw_input.trim().to_string(),
            raw_input,
            kind: SpecifierKind::Tag,
            resolved_version: Some(resolved.unwrap_or_else(|| ANY_RANGE.to_string())),
            has_four_segments: false,
        }
    }

    pub fn unsupported(raw_input: impl Into<String>) -> Self {
        let raw_input = raw_input.into();
        Self {
            raw_version: raw_input.trim().to_string(),
            raw_input,
            kind: SpecifierKind::Unsupported,
            resolved_version: None,
            has_four_segments: false,
        }
    }

    /// A version with more than three numeric segments (`1.2.3.4`).
    pub fn four_segment(raw_input: impl Into<String>) -> Self {
        Self {
            has_four_segments: true,
            ..Self::unsupported(raw_input)
        }
    }

    /// Parses `resolved_version` into a node-semver range.
    ///
    /// Returns `None` for unsupported specifiers or unparseable range text.
    pub fn range_requirement(&self) -> Option<Range> {
        let text = self.resolved_version.as_deref()?;
        Range::parse(text).ok()
    }

    pub fn is_tag(&self) -> bool {
        self.kind == SpecifierKind::Tag
    }

    pub fn is_supported(&self) -> bool {
        self.kind != SpecifierKind::Unsupported
    }
}

/// Parses a semver-family requirement (npm, and Dub/Pub after conversion).
///
/// - empty input, `latest` or `*` is a `Tag` resolved to `*`
/// - a literal semantic version is `Exact`
/// - a valid node-semver range is `Range`
/// - anything else is `Unsupported`
pub fn parse_semver(raw: &str) -> VersionSpecifier {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed == "latest" || trimmed == ANY_RANGE {
        return VersionSpecifier::tag(raw, None);
    }

    if semver::Version::parse(trimmed).is_ok() {
        return VersionSpecifier::exact(raw, trimmed);
    }

    match Range::parse(trimmed) {
        Ok(_) => VersionSpecifier::range(raw, trimmed),
        Err(e) => {
            tracing::debug!("unsupported version specifier '{}': {}", trimmed, e);
            VersionSpecifier::unsupported(raw)
        }
    }
}
