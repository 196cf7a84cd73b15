//! npm dependency specifier grammar.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use vlens_core::{SpecifierKind, VersionSpecifier, parse_semver};

/// Prefixes of dependencies resolved from the local file system.
const DIRECTORY_PREFIXES: [&str; 2] = ["file:", "link:"];

/// Parsed npm dependency value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpmSpecifier {
    /// `file:../lib` or `link:../lib`
    Directory { path: String },
    /// A dist-tag name other than `latest` (`next`, `beta`, `canary`)
    DistTag { raw: String, tag: String },
    /// Exact versions, ranges, `latest`/`*`, and unsupported input
    Version(VersionSpecifier),
}

impl NpmSpecifier {
    /// Specifier to use before the dist-tag map is known.
    pub fn pending_spec(&self) -> VersionSpecifier {
        match self {
            Self::Directory { path } => VersionSpecifier::exact(path.as_str(), path.as_str()),
            Self::DistTag { raw, .. } => VersionSpecifier::tag(raw.as_str(), None),
            Self::Version(spec) => spec.clone(),
        }
    }

    /// Final specifier once the registry's dist-tags are known.
    ///
    /// A dist-tag the registry does not publish is unsupported.
    pub fn resolve(&self, dist_tags: &HashMap<String, String>) -> VersionSpecifier {
        match self {
            Self::DistTag { raw, tag } => match dist_tags.get(tag) {
                Some(version) => VersionSpecifier::tag(raw.as_str(), Some(version.clone())),
                None => {
                    tracing::debug!("unknown npm dist-tag '{}'", tag);
                    VersionSpecifier::unsupported(raw.as_str())
                }
            },
            _ => self.pending_spec(),
        }
    }
}

/// Parses a `package.json` dependency value.
///
/// # Examples
///
/// ```
/// use vlens_npm::specifier::{parse_npm_specifier, NpmSpecifier};
///
/// assert!(matches!(parse_npm_specifier("file:../shared"), NpmSpecifier::Directory { .. }));
/// assert!(matches!(parse_npm_specifier("next"), NpmSpecifier::DistTag { .. }));
/// assert!(matches!(parse_npm_specifier("^4.17.0"), NpmSpecifier::Version(_)));
/// ```
pub fn parse_npm_specifier(raw: &str) -> NpmSpecifier {
    static TAG_NAME: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*$").unwrap());

    let trimmed = raw.trim();

    if let Some(path) = DIRECTORY_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
    {
        return NpmSpecifier::Directory {
            path: path.to_string(),
        };
    }

    let spec = parse_semver(raw);
    if spec.kind == SpecifierKind::Unsupported && TAG_NAME.is_match(trimmed) {
        return NpmSpecifier::DistTag {
            raw: raw.to_string(),
            tag: trimmed.to_string(),
        };
    }

    NpmSpecifier::Version(spec)
}
