//! Package documents handed to the presentation layer.
//!
//! Every resolution outcome, including absence and unsupported input, is a
//! `PackageDocument`. The constructors here are pure.

use crate::cache::ResponseSource;
use crate::specifier::{SpecifierKind, VersionSpecifier};
use crate::suggestion::{Suggestion, SuggestionTag, prerelease_candidates, suggest};
use crate::version::VersionPartition;
use serde::{Deserialize, Serialize};

/// Where the package comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageSource {
    Registry,
    Directory,
    Local,
}

/// Status of the registry response a document was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub status: u16,
    pub source: ResponseSource,
}

impl ResponseStatus {
    pub const fn new(status: u16, source: ResponseSource) -> Self {
        Self { status, source }
    }
}

/// A declared dependency as received from the manifest layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequest {
    pub name: String,
    pub version: String,
}

impl PackageRequest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Result of resolving one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDocument {
    pub provider: String,
    pub source: PackageSource,
    pub response: Option<ResponseStatus>,
    pub requested: PackageRequest,
    pub kind: SpecifierKind,
    pub resolved_version: Option<String>,
    pub releases: Vec<String>,
    pub prereleases: Vec<String>,
    pub latest: Option<String>,
    pub prerelease_candidates: Vec<String>,
    pub suggestion: Suggestion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_version: Option<String>,
}

impl PackageDocument {
    /// Attaches the version pinned by a lock file.
    pub fn with_locked_version(mut self, locked: Option<String>) -> Self {
        self.locked_version = locked;
        self
    }

    pub fn tag(&self) -> SuggestionTag {
        self.suggestion.tag
    }
}

fn empty_document(
    provider: &str,
    source: PackageSource,
    response: Option<ResponseStatus>,
    request: &PackageRequest,
    spec: &VersionSpecifier,
    suggestion: Suggestion,
) -> PackageDocument {
    PackageDocument {
        provider: provider.to_string(),
        source,
        response,
        requested: request.clone(),
        kind: spec.kind,
        resolved_version: spec.resolved_version.clone(),
        releases: Vec::new(),
        prereleases: Vec::new(),
        latest: None,
        prerelease_candidates: Vec::new(),
        suggestion,
        locked_version: None,
    }
}

/// Builds the document for versions fetched from a registry.
///
/// # Examples
///
/// ```
/// use vlens_core::cache::ResponseSource;
/// use vlens_core::document::{create_registry_document, PackageRequest, ResponseStatus};
/// use vlens_core::specifier::parse_semver;
/// use vlens_core::suggestion::SuggestionTag;
/// use vlens_core::version::VersionPartition;
///
/// let request = PackageRequest::new("left-pad", "^1.0.0");
/// let partition = VersionPartition::from_raw(["1.0.0", "1.3.0"]);
/// let doc = create_registry_document(
///     "npm",
///     &request,
///     &parse_semver(&request.version),
///     &partition,
///     ResponseStatus::new(200, ResponseSource::Remote),
/// );
///
/// assert_eq!(doc.tag(), SuggestionTag::Satisfies);
/// assert_eq!(doc.latest.as_deref(), Some("1.3.0"));
/// ```
pub fn create_registry_document(
    provider: &str,
    request: &PackageRequest,
    spec: &VersionSpecifier,
    partition: &VersionPartition,
    response: ResponseStatus,
) -> PackageDocument {
    let candidates = spec
        .range_requirement()
        .map(|range| prerelease_candidates(&range, &partition.prereleases))
        .unwrap_or_default();

    PackageDocument {
        provider: provider.to_string(),
        source: PackageSource::Registry,
        response: Some(response),
        requested: request.clone(),
        kind: spec.kind,
        resolved_version: spec.resolved_version.clone(),
        releases: partition.release_strings(),
        prereleases: partition.prerelease_strings(),
        latest: partition.latest_release().map(ToString::to_string),
        prerelease_candidates: candidates.iter().map(ToString::to_string).collect(),
        suggestion: suggest(spec, partition),
        locked_version: None,
    }
}

/// Document for a package the registry does not know.
pub fn create_not_found(
    provider: &str,
    request: &PackageRequest,
    spec: &VersionSpecifier,
    response: ResponseStatus,
) -> PackageDocument {
    empty_document(
        provider,
        PackageSource::Registry,
        Some(response),
        request,
        spec,
        Suggestion::not_found(),
    )
}

/// Document for a four-segment version. No request is made for these.
pub fn create_four_segment(
    provider: &str,
    request: &PackageRequest,
    spec: &VersionSpecifier,
) -> PackageDocument {
    empty_document(
        provider,
        PackageSource::Local,
        None,
        request,
        spec,
        Suggestion::four_segment(),
    )
}

/// Document for a dependency on a local directory (`file:../lib`).
pub fn create_directory(provider: &str, request: &PackageRequest, path: &str) -> PackageDocument {
    PackageDocument {
        provider: provider.to_string(),
        source: PackageSource::Directory,
        response: None,
        requested: request.clone(),
        kind: SpecifierKind::Exact,
        resolved_version: Some(path.to_string()),
        releases: Vec::new(),
        prereleases: Vec::new(),
        latest: None,
        prerelease_candidates: Vec::new(),
        suggestion: Suggestion::new(SuggestionTag::Matches, None),
        locked_version: None,
    }
}
