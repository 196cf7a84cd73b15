//! NuGet version grammar.
//!
//! Covers bare versions with one to four numeric segments, floating
//! versions (`1.*`, `1.2.*`) and interval notation (`[1.0,2.0)`).
//! Everything is converted to node-semver range text for evaluation.

use vlens_core::VersionSpecifier;

/// Result of normalizing a single version operand.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Version(String),
    FourSegments,
    Invalid,
}

/// Parses a NuGet `Version` attribute value.
///
/// Four-segment operands anywhere in the input produce a specifier with
/// `has_four_segments` set.
///
/// # Examples
///
/// ```
/// use vlens_core::SpecifierKind;
/// use vlens_nuget::parse_nuget_specifier;
///
/// let spec = parse_nuget_specifier("[1.0,2.0)");
/// assert_eq!(spec.kind, SpecifierKind::Range);
/// assert_eq!(spec.resolved_version.as_deref(), Some(">=1.0.0 <2.0.0"));
///
/// let spec = parse_nuget_specifier("1.2.3.4");
/// assert!(spec.has_four_segments);
/// ```
pub fn parse_nuget_specifier(raw: &str) -> VersionSpecifier {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed == "*" {
        return VersionSpecifier::tag(raw, None);
    }

    if trimmed.starts_with('[') || trimmed.starts_with('(') {
        return parse_interval(raw, trimmed);
    }

    if trimmed.contains('*') {
        return parse_floating(raw, trimmed);
    }

    match normalize_operand(trimmed) {
        Operand::Version(version) => VersionSpecifier::exact(raw, version),
        Operand::FourSegments => VersionSpecifier::four_segment(raw),
        Operand::Invalid => VersionSpecifier::unsupported(raw),
    }
}

fn parse_interval(raw: &str, trimmed: &str) -> VersionSpecifier {
    let inclusive_lower = trimmed.starts_with('[');
    let inclusive_upper = match trimmed.chars().last() {
        Some(']') => true,
        Some(')') => false,
        _ => return VersionSpecifier::unsupported(raw),
    };
    let body = &trimmed[1..trimmed.len() - 1];

    let Some((lower, upper)) = body.split_once(',') else {
        // `[1.0]` pins a single version; `(1.0)` is meaningless.
        if !(inclusive_lower && inclusive_upper) {
            return VersionSpecifier::unsupported(raw);
        }
        return match normalize_operand(body.trim()) {
            Operand::Version(version) => VersionSpecifier::exact(raw, version),
            Operand::FourSegments => VersionSpecifier::four_segment(raw),
            Operand::Invalid => VersionSpecifier::unsupported(raw),
        };
    };

    let mut comparators = Vec::with_capacity(2);
    for (operand, op) in [
        (lower.trim(), if inclusive_lower { ">=" } else { ">" }),
        (upper.trim(), if inclusive_upper { "<=" } else { "<" }),
    ] {
        if operand.is_empty() {
            continue;
        }
        match normalize_operand(operand) {
            Operand::Version(version) => comparators.push(format!("{op}{version}")),
            Operand::FourSegments => return VersionSpecifier::four_segment(raw),
            Operand::Invalid => return VersionSpecifier::unsupported(raw),
        }
    }

    if comparators.is_empty() {
        return VersionSpecifier::unsupported(raw);
    }

    VersionSpecifier::range(raw, comparators.join(" "))
}

fn parse_floating(raw: &str, trimmed: &str) -> VersionSpecifier {
    let segments: Vec<&str> = trimmed.split('.').collect();
    let Some((last, leading)) = segments.split_last() else {
        return VersionSpecifier::unsupported(raw);
    };

    if *last != "*" || !leading.iter().all(|s| is_numeric(s)) {
        return VersionSpecifier::unsupported(raw);
    }

    if segments.len() > 3 {
        return VersionSpecifier::four_segment(raw);
    }

    let numbers: Vec<String> = leading
        .iter()
        .filter_map(|s| s.parse::<u64>().ok())
        .map(|n| n.to_string())
        .collect();

    VersionSpecifier::range(raw, format!("{}.x", numbers.join(".")))
}

/// Pads a NuGet version to three segments and validates it as semver.
fn normalize_operand(text: &str) -> Operand {
    let text = text.split_once('+').map_or(text, |(version, _build)| version);
    let (core, prerelease) = match text.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (text, None),
    };

    let segments: Vec<&str> = core.split('.').collect();
    if !segments.iter().all(|s| is_numeric(s)) {
        return Operand::Invalid;
    }
    if segments.len() > 3 {
        return Operand::FourSegments;
    }

    let mut numbers = Vec::with_capacity(3);
    for segment in &segments {
        match segment.parse::<u64>() {
            Ok(n) => numbers.push(n),
            Err(_) => return Operand::Invalid,
        }
    }
    numbers.resize(3, 0);

    let mut version = format!("{}.{}.{}", numbers[0], numbers[1], numbers[2]);
    if let Some(pre) = prerelease {
        version.push('-');
        version.push_str(pre);
    }

    match semver::Version::parse(&version) {
        Ok(_) => Operand::Version(version),
        Err(_) => Operand::Invalid,
    }
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
