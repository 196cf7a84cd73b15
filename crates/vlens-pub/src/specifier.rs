//! Pub version constraint grammar.
//!
//! Pub accepts `any`, caret constraints, exact versions and comparator
//! ranges (`'>=1.2.0 <2.0.0'`). Everything but `any` is node-semver
//! compatible, including the 0.x caret rule.

use vlens_core::{VersionSpecifier, parse_semver};

/// Parses a `pubspec.yaml` version constraint.
///
/// # Examples
///
/// ```
/// use vlens_core::SpecifierKind;
/// use vlens_pub::parse_pub_specifier;
///
/// assert_eq!(parse_pub_specifier("any").kind, SpecifierKind::Tag);
/// assert_eq!(parse_pub_specifier("^0.13.5").kind, SpecifierKind::Range);
/// assert_eq!(parse_pub_specifier("'>=1.0.0 <2.0.0'").kind, SpecifierKind::Range);
/// ```
pub fn parse_pub_specifier(raw: &str) -> VersionSpecifier {
    let trimmed = unquote(raw.trim());

    if trimmed == "any" {
        return VersionSpecifier::tag(raw, None);
    }

    let mut spec = parse_semver(trimmed);
    spec.raw_input = raw.to_string();
    spec
}

/// YAML scalars keep their quotes when taken verbatim from the document.
fn unquote(value: &str) -> &str {
    ['\'', '"']
        .iter()
        .find_map(|q| value.strip_prefix(*q)?.strip_suffix(*q))
        .unwrap_or(value)
}
