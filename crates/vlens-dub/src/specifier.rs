//! Dub version grammar.
//!
//! Dub uses semver with two extra operators: `~>` (pessimistic
//! restriction to the last given segment) and `==` (exact). Branch
//! references such as `~master` cannot be resolved against the registry.

use vlens_core::{VersionSpecifier, parse_semver};

/// Parses a `dub.json` / `dub.sdl` version value.
///
/// # Examples
///
/// ```
/// use vlens_dub::parse_dub_specifier;
///
/// let spec = parse_dub_specifier("~>1.2.3");
/// assert_eq!(spec.resolved_version.as_deref(), Some(">=1.2.3 <1.3.0"));
///
/// let spec = parse_dub_specifier("~>1.2");
/// assert_eq!(spec.resolved_version.as_deref(), Some(">=1.2.0 <2.0.0"));
/// ```
pub fn parse_dub_specifier(raw: &str) -> VersionSpecifier {
    let trimmed = raw.trim();

    if let Some(version) = trimmed.strip_prefix("~>") {
        return match pessimistic_range(version.trim()) {
            Some(range) => VersionSpecifier::range(raw, range),
            None => VersionSpecifier::unsupported(raw),
        };
    }

    if let Some(version) = trimmed.strip_prefix("==") {
        let version = version.trim();
        return match semver::Version::parse(version) {
            Ok(_) => VersionSpecifier::exact(raw, version),
            Err(_) => VersionSpecifier::unsupported(raw),
        };
    }

    if trimmed.starts_with('~') {
        tracing::debug!("dub branch reference '{}' is not resolvable", trimmed);
        return VersionSpecifier::unsupported(raw);
    }

    let mut spec = parse_semver(trimmed);
    spec.raw_input = raw.to_string();
    spec
}

/// `~>1.2.3` allows `>=1.2.3 <1.3.0`; `~>1.2` allows `>=1.2.0 <2.0.0`.
fn pessimistic_range(version: &str) -> Option<String> {
    let (core, prerelease) = match version.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (version, None),
    };

    let numbers = core
        .split('.')
        .map(|s| s.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let (lower, upper) = match numbers.as_slice() {
        [major] => ([*major, 0, 0], [major.checked_add(1)?, 0, 0]),
        [major, minor] => ([*major, *minor, 0], [major.checked_add(1)?, 0, 0]),
        [major, minor, patch] => ([*major, *minor, *patch], [*major, minor.checked_add(1)?, 0]),
        _ => return None,
    };

    let mut lower = format!("{}.{}.{}", lower[0], lower[1], lower[2]);
    if let Some(pre) = prerelease {
        lower.push('-');
        lower.push_str(pre);
    }
    semver::Version::parse(&lower).ok()?;

    Some(format!(
        ">={} <{}.{}.{}",
        lower, upper[0], upper[1], upper[2]
    ))
}
