//! Normalization of raw registry version listings.

use semver::Version;
use std::collections::HashSet;

/// Registry versions split into releases and prereleases.
///
/// Both lists are sorted ascending by semantic version order and hold
/// only strict semantic versions. Every release has no prerelease
/// component; every prerelease has one.
///
/// # Examples
///
/// ```
/// use vlens_core::version::VersionPartition;
///
/// let partition = VersionPartition::from_raw(["1.0.0", "2.0.0-beta.1", "1.1.0", "1.0.0", "junk"]);
///
/// let releases: Vec<String> = partition.releases.iter().map(ToString::to_string).collect();
/// assert_eq!(releases, ["1.0.0", "1.1.0"]);
/// assert_eq!(partition.prereleases.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPartition {
    pub releases: Vec<Version>,
    pub prereleases: Vec<Version>,
}

impl VersionPartition {
    /// Builds a partition from unvalidated version strings.
    ///
    /// Entries are deduplicated by their exact string. Entries that are not
    /// strict semantic versions are dropped.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut partition = Self::default();

        for entry in raw {
            let entry = entry.as_ref();
            if !seen.insert(entry.to_string()) {
                continue;
            }

            let Some(version) = parse_version(entry) else {
                tracing::debug!("skipping invalid version '{}'", entry);
                continue;
            };

            if version.pre.is_empty() {
                partition.releases.push(version);
            } else {
                partition.prereleases.push(version);
            }
        }

        partition.releases.sort();
        partition.prereleases.sort();
        partition
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty() && self.prereleases.is_empty()
    }

    pub fn latest_release(&self) -> Option<&Version> {
        self.releases.last()
    }

    pub fn latest_prerelease(&self) -> Option<&Version> {
        self.prereleases.last()
    }

    pub fn release_strings(&self) -> Vec<String> {
        self.releases.iter().map(ToString::to_string).collect()
    }

    pub fn prerelease_strings(&self) -> Vec<String> {
        self.prereleases.iter().map(ToString::to_string).collect()
    }
}

/// Parses a strict semantic version.
pub fn parse_version(raw: &str) -> Option<Version> {
    Version::parse(raw).ok()
}

/// Returns the greatest valid semantic version in a raw listing.
pub fn highest_version<I, S>(raw: I) -> Option<Version>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|v| parse_version(v.as_ref()))
        .max()
}
