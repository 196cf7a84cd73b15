//! Classification of a declared requirement against published versions.

use crate::specifier::{SpecifierKind, VersionSpecifier};
use crate::version::VersionPartition;
use node_semver::Range;
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Leading alphabetic name of a prerelease identifier (`beta` in `beta2`).
static FAMILY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionTag {
    Latest,
    LatestIsPrerelease,
    Satisfies,
    Matches,
    NoMatch,
    FourSegmentUnsupported,
    NotFound,
}

/// Recommendation produced for one declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub tag: SuggestionTag,
    pub version: Option<String>,
}

impl Suggestion {
    pub fn new(tag: SuggestionTag, version: Option<&Version>) -> Self {
        Self {
            tag,
            version: version.map(ToString::to_string),
        }
    }

    pub fn not_found() -> Self {
        Self::new(SuggestionTag::NotFound, None)
    }

    pub fn four_segment() -> Self {
        Self::new(SuggestionTag::FourSegmentUnsupported, None)
    }

    /// `NoMatch` pointing at the best available version, if any.
    pub fn no_match(partition: &VersionPartition) -> Self {
        Self::new(
            SuggestionTag::NoMatch,
            partition
                .latest_release()
                .or_else(|| partition.latest_prerelease()),
        )
    }
}

/// Computes the suggestion for a specifier. The first matching rule wins:
///
/// 1. four-segment versions are `FourSegmentUnsupported`
/// 2. no published versions at all is `NotFound`
/// 3. unsupported specifiers are `NoMatch` with the highest release
/// 4. the highest satisfying release is `Matches` when it equals the pinned
///    version, `Latest` for tags and `Satisfies` otherwise
/// 5. the highest prerelease lineage head within range is `LatestIsPrerelease`
/// 6. anything else is `NoMatch`
///
/// # Examples
///
/// ```
/// use vlens_core::specifier::parse_semver;
/// use vlens_core::suggestion::{suggest, SuggestionTag};
/// use vlens_core::version::VersionPartition;
///
/// let partition = VersionPartition::from_raw(["1.2.0", "1.3.0", "2.0.0"]);
/// let suggestion = suggest(&parse_semver("^1.2.0"), &partition);
///
/// assert_eq!(suggestion.tag, SuggestionTag::Satisfies);
/// assert_eq!(suggestion.version.as_deref(), Some("1.3.0"));
/// ```
pub fn suggest(spec: &VersionSpecifier, partition: &VersionPartition) -> Suggestion {
    if spec.has_four_segments {
        return Suggestion::four_segment();
    }

    if partition.is_empty() {
        return Suggestion::not_found();
    }

    if !spec.is_supported() {
        return Suggestion::new(SuggestionTag::NoMatch, partition.latest_release());
    }

    let Some(range) = spec.range_requirement() else {
        return Suggestion::no_match(partition);
    };

    if let Some(release) = highest_satisfying(&range, &partition.releases) {
        let tag = if spec.is_tag() {
            SuggestionTag::Latest
        } else if is_requested(spec, release) {
            SuggestionTag::Matches
        } else {
            SuggestionTag::Satisfies
        };
        return Suggestion::new(tag, Some(release));
    }

    let candidates = prerelease_candidates(&range, &partition.prereleases);
    if let Some(head) = candidates.iter().max() {
        return Suggestion::new(SuggestionTag::LatestIsPrerelease, Some(head));
    }

    Suggestion::no_match(partition)
}

/// Highest member of each prerelease lineage that falls within `range`.
///
/// Prereleases are grouped by tag family, the leading alphabetic name of
/// the first prerelease identifier compared case-insensitively (`beta2` and
/// `Beta.3` are both `beta`). Identifiers without a leading name share one
/// family. The result is ordered by the first appearance of each family in
/// `prereleases`.
///
/// A prerelease is within range when it satisfies the range or its release
/// base (`major.minor.patch`) does.
pub fn prerelease_candidates(range: &Range, prereleases: &[Version]) -> Vec<Version> {
    let mut heads: Vec<(String, Version)> = Vec::new();

    for version in prereleases.iter().filter(|v| within_range(range, v)) {
        let family = family_of(version);
        match heads.iter_mut().find(|(name, _)| *name == family) {
            Some((_, head)) if version > head => *head = version.clone(),
            Some(_) => {}
            None => heads.push((family, version.clone())),
        }
    }

    heads.into_iter().map(|(_, head)| head).collect()
}

fn family_of(version: &Version) -> String {
    let first = version.pre.as_str().split('.').next().unwrap_or_default();
    FAMILY_PATTERN
        .find(first)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default()
}

fn within_range(range: &Range, version: &Version) -> bool {
    let base = Version::new(version.major, version.minor, version.patch);
    satisfies(range, version) || satisfies(range, &base)
}

fn highest_satisfying<'a>(range: &Range, versions: &'a [Version]) -> Option<&'a Version> {
    versions.iter().rev().find(|v| satisfies(range, v))
}

fn is_requested(spec: &VersionSpecifier, version: &Version) -> bool {
    spec.kind == SpecifierKind::Exact
        && spec
            .resolved_version
            .as_deref()
            .and_then(|v| Version::parse(v).ok())
            .is_some_and(|requested| requested == *version)
}

fn satisfies(range: &Range, version: &Version) -> bool {
    node_semver::Version::parse(version.to_string()).is_ok_and(|v| range.satisfies(&v))
}
