//! Shared steps of single-endpoint registry resolution.

use crate::cache::{HttpResponse, ResponseSource};
use crate::document::{
    PackageDocument, PackageRequest, ResponseStatus, create_not_found, create_registry_document,
};
use crate::error::{HttpError, Result};
use crate::specifier::VersionSpecifier;
use crate::version::VersionPartition;

impl From<&HttpResponse> for ResponseStatus {
    fn from(response: &HttpResponse) -> Self {
        Self::new(response.status, response.source)
    }
}

/// Normalizes a raw version listing into a registry document.
///
/// With `include_prereleases` off the prerelease partition is emptied
/// before the suggestion is computed.
pub fn build_document<I, S>(
    provider: &str,
    request: &PackageRequest,
    spec: &VersionSpecifier,
    raw_versions: I,
    include_prereleases: bool,
    response: ResponseStatus,
) -> PackageDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut partition = VersionPartition::from_raw(raw_versions);
    if !include_prereleases {
        partition.prereleases.clear();
    }
    create_registry_document(provider, request, spec, &partition, response)
}

/// Turns a 404 into a not-found document and passes every other failure on.
///
/// # Examples
///
/// ```
/// use vlens_core::document::PackageRequest;
/// use vlens_core::error::HttpError;
/// use vlens_core::resolve::recover_not_found;
/// use vlens_core::specifier::parse_semver;
/// use vlens_core::suggestion::SuggestionTag;
///
/// let request = PackageRequest::new("missing", "^1.0.0");
/// let err = HttpError::Status { url: "https://x/missing".into(), status: 404, body: String::new() };
///
/// let doc = recover_not_found("npm", &request, &parse_semver("^1.0.0"), err).unwrap();
/// assert_eq!(doc.tag(), SuggestionTag::NotFound);
/// ```
pub fn recover_not_found(
    provider: &str,
    request: &PackageRequest,
    spec: &VersionSpecifier,
    error: HttpError,
) -> Result<PackageDocument> {
    if error.is_not_found() {
        tracing::debug!("{} package '{}' not found", provider, request.name);
        return Ok(create_not_found(
            provider,
            request,
            spec,
            ResponseStatus::new(404, ResponseSource::Remote),
        ));
    }

    tracing::warn!("{} request for '{}' failed: {}", provider, request.name, error);
    Err(error.into())
}
