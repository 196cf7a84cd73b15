//! NuGet package client.
//!
//! Resolution runs in three phases: service discovery over every
//! configured index, one version lookup per discovered endpoint (all in
//! flight at once), and selection of a single listing. Listings from
//! different feeds are never merged.

use crate::config::NugetConfig;
use crate::discovery::{DiscoveredEndpoint, discover_endpoints};
use crate::error::NugetError;
use crate::resolvers::{LookupContext, VersionListing, fetch_versions};
use crate::specifier::parse_nuget_specifier;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use vlens_core::version::highest_version;
use vlens_core::{
    HttpCache, PackageClient, PackageDocument, PackageRequest, ResponseSource, ResponseStatus,
    build_document, create_four_segment, create_not_found,
};

pub const PROVIDER: &str = "nuget";

/// Outcome of selecting among per-endpoint lookups.
#[derive(Debug)]
pub enum Selection {
    Found(VersionListing),
    Absent,
    Failed(NugetError),
}

/// Client for NuGet v3 feeds.
pub struct NugetClient {
    cache: Arc<HttpCache>,
    config: NugetConfig,
}

impl NugetClient {
    /// Creates a client. At least one service index must be configured.
    pub fn new(cache: Arc<HttpCache>, config: NugetConfig) -> crate::error::Result<Self> {
        if config.index_urls.is_empty() {
            return Err(NugetError::NoIndexConfigured);
        }
        Ok(Self { cache, config })
    }

    /// Discovers endpoints and queries all of them concurrently.
    pub async fn lookup(&self, package_id: &str) -> Selection {
        let token = self.config.auth_token.as_deref();
        let discovery = discover_endpoints(&self.cache, &self.config.index_urls, token).await;
        let endpoints = discovery.endpoints;
        if endpoints.is_empty() {
            tracing::debug!("no NuGet endpoint available for '{}'", package_id);
            return match discovery.transient {
                Some(e) => Selection::Failed(e),
                None => Selection::Absent,
            };
        }

        let ctx = LookupContext {
            cache: &self.cache,
            package_id,
            include_prereleases: self.config.include_prereleases,
            token,
        };

        let results = join_all(endpoints.iter().map(|endpoint| fetch_versions(ctx, endpoint))).await;
        select_listing(&endpoints, results)
    }
}

/// Picks the listing whose highest valid version is greatest.
///
/// Ties go to the endpoint whose resolver has the better priority, then
/// to the earlier endpoint. A failure is only reported when no
/// endpoint produced data and at least one failed transiently; otherwise
/// missing data means the package is absent.
pub fn select_listing(
    endpoints: &[DiscoveredEndpoint],
    results: Vec<crate::error::Result<Option<VersionListing>>>,
) -> Selection {
    let mut best: Option<(Option<semver::Version>, usize, VersionListing)> = None;
    let mut transient = None;

    for (endpoint, result) in endpoints.iter().zip(results) {
        match result {
            Ok(Some(listing)) => {
                let highest = highest_version(&listing.versions);
                let priority = endpoint.resolver.priority;
                let better = best.as_ref().is_none_or(|(current, current_priority, _)| {
                    highest > *current || (highest == *current && priority < *current_priority)
                });
                if better {
                    best = Some((highest, priority, listing));
                }
            }
            Ok(None) => {
                tracing::debug!("package absent on {}", endpoint.service_url);
            }
            Err(e) if e.is_transient() => {
                tracing::warn!("NuGet lookup failed on {}: {}", endpoint.service_url, e);
                if transient.is_none() {
                    transient = Some(e);
                }
            }
            Err(e) => {
                tracing::warn!("NuGet lookup failed on {}: {}", endpoint.service_url, e);
            }
        }
    }

    match (best, transient) {
        (Some((_, _, listing)), _) => Selection::Found(listing),
        (None, Some(e)) => Selection::Failed(e),
        (None, None) => Selection::Absent,
    }
}

#[async_trait]
impl PackageClient for NugetClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_package(&self, request: &PackageRequest) -> vlens_core::Result<PackageDocument> {
        let spec = parse_nuget_specifier(&request.version);
        if spec.has_four_segments {
            return Ok(create_four_segment(PROVIDER, request, &spec));
        }

        match self.lookup(&request.name).await {
            Selection::Found(listing) => Ok(build_document(
                PROVIDER,
                request,
                &spec,
                &listing.versions,
                self.config.include_prereleases,
                listing.response,
            )),
            Selection::Absent => Ok(create_not_found(
                PROVIDER,
                request,
                &spec,
                ResponseStatus::new(404, ResponseSource::Remote),
            )),
            Selection::Failed(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SERVICE_RESOLVERS;
    use vlens_core::{HttpConfig, HttpError, SuggestionTag};

    fn endpoint(service_url: &str) -> DiscoveredEndpoint {
        endpoint_via(service_url, 0)
    }

    fn endpoint_via(service_url: &str, resolver: usize) -> DiscoveredEndpoint {
        DiscoveredEndpoint {
            index_url: "https://feed/index.json".into(),
            service_url: service_url.into(),
            resolver: &SERVICE_RESOLVERS[resolver],
        }
    }

    fn listing(versions: &[&str]) -> VersionListing {
        VersionListing {
            versions: versions.iter().map(|v| (*v).to_string()).collect(),
            response: ResponseStatus::new(200, ResponseSource::Remote),
        }
    }

    fn transient() -> NugetError {
        NugetError::Http(HttpError::Timeout {
            url: "https://feed/flat".into(),
        })
    }

    fn client(index_urls: Vec<String>) -> NugetClient {
        let cache = Arc::new(HttpCache::new(&HttpConfig::default()).unwrap());
        NugetClient::new(
            cache,
            NugetConfig {
                index_urls,
                ..NugetConfig::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_requires_an_index() {
        let cache = Arc::new(HttpCache::new(&HttpConfig::default()).unwrap());
        let result = NugetClient::new(
            cache,
            NugetConfig {
                index_urls: vec![],
                ..NugetConfig::default()
            },
        );
        assert!(matches!(result, Err(NugetError::NoIndexConfigured)));
    }

    #[test]
    fn test_select_highest_listing() {
        let endpoints = [endpoint("a"), endpoint("b")];
        let selection = select_listing(
            &endpoints,
            vec![Ok(Some(listing(&["1.0.0"]))), Ok(Some(listing(&["2.0.0", "1.0.0"])))],
        );
        let Selection::Found(found) = selection else {
            panic!("expected a listing");
        };
        assert_eq!(found.versions, ["2.0.0", "1.0.0"]);
    }

    #[test]
    fn test_ties_keep_earlier_endpoint() {
        let endpoints = [endpoint("a"), endpoint("b")];
        let selection = select_listing(
            &endpoints,
            vec![Ok(Some(listing(&["2.0.0", "1.0.0"]))), Ok(Some(listing(&["2.0.0"])))],
        );
        let Selection::Found(found) = selection else {
            panic!("expected a listing");
        };
        assert_eq!(found.versions.len(), 2);
    }

    #[test]
    fn test_ties_prefer_resolver_priority() {
        let endpoints = [endpoint_via("reg", 4), endpoint_via("flat", 0)];
        let selection = select_listing(
            &endpoints,
            vec![Ok(Some(listing(&["2.0.0"]))), Ok(Some(listing(&["2.0.0", "1.0.0"])))],
        );
        let Selection::Found(found) = selection else {
            panic!("expected a listing");
        };
        assert_eq!(found.versions, ["2.0.0", "1.0.0"]);
    }

    #[test]
    fn test_higher_version_beats_priority() {
        let endpoints = [endpoint_via("flat", 0), endpoint_via("reg", 4)];
        let selection = select_listing(
            &endpoints,
            vec![Ok(Some(listing(&["1.0.0"]))), Ok(Some(listing(&["2.0.0"])))],
        );
        let Selection::Found(found) = selection else {
            panic!("expected a listing");
        };
        assert_eq!(found.versions, ["2.0.0"]);
    }

    #[test]
    fn test_data_wins_over_failures() {
        let endpoints = [endpoint("a"), endpoint("b")];
        let selection = select_listing(&endpoints, vec![Err(transient()), Ok(Some(listing(&["1.0.0"])))]);
        assert!(matches!(selection, Selection::Found(_)));
    }

    #[test]
    fn test_transient_reported_without_data() {
        let endpoints = [endpoint("a"), endpoint("b")];
        let selection = select_listing(&endpoints, vec![Ok(None), Err(transient())]);
        assert!(matches!(selection, Selection::Failed(e) if e.is_transient()));
    }

    #[test]
    fn test_all_absent() {
        let endpoints = [endpoint("a")];
        assert!(matches!(select_listing(&endpoints, vec![Ok(None)]), Selection::Absent));
    }

    #[tokio::test]
    async fn test_four_segment_short_circuits_without_requests() {
        let mut server = mockito::Server::new_async().await;
        let index = server
            .mock("GET", "/index.json")
            .expect(0)
            .create_async()
            .await;

        let doc = client(vec![format!("{}/index.json", server.url())])
            .fetch_package(&PackageRequest::new("Legacy.Package", "1.2.3.4"))
            .await
            .unwrap();

        index.assert_async().await;
        assert_eq!(doc.suggestion.tag, SuggestionTag::FourSegmentUnsupported);
        assert!(doc.response.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_index_is_transient_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/index.json")
            .with_status(500)
            .create_async()
            .await;

        let err = client(vec![format!("{}/index.json", server.url())])
            .fetch_package(&PackageRequest::new("Some.Package", "1.0.0"))
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_index_without_services_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/index.json")
            .with_status(200)
            .with_body(r#"{"resources": []}"#)
            .create_async()
            .await;

        let doc = client(vec![format!("{}/index.json", server.url())])
            .fetch_package(&PackageRequest::new("Some.Package", "1.0.0"))
            .await
            .unwrap();

        assert_eq!(doc.suggestion.tag, SuggestionTag::NotFound);
        assert_eq!(doc.response.map(|r| r.status), Some(404));
    }

    #[tokio::test]
    async fn test_resolves_through_package_base_address() {
        let mut server = mockito::Server::new_async().await;
        let index = format!(
            r#"{{"version": "3.0.0", "resources": [
                {{"@id": "{url}/reg/", "@type": "RegistrationsBaseUrl/3.6.0"}},
                {{"@id": "{url}/flat/", "@type": "PackageBaseAddress/3.0.0"}}
            ]}}"#,
            url = server.url()
        );
        let _index = server
            .mock("GET", "/index.json")
            .with_status(200)
            .with_body(index)
            .create_async()
            .await;
        let flat = server
            .mock("GET", "/flat/serilog/index.json")
            .with_status(200)
            .with_body(r#"{"versions": ["2.9.0", "2.10.0", "3.0.0-dev-001"]}"#)
            .expect(1)
            .create_async()
            .await;
        let registrations = server
            .mock("GET", "/reg/serilog/index.json")
            .expect(0)
            .create_async()
            .await;

        let doc = client(vec![format!("{}/index.json", server.url())])
            .fetch_package(&PackageRequest::new("Serilog", "[2.9,3.0)"))
            .await
            .unwrap();

        flat.assert_async().await;
        registrations.assert_async().await;
        assert_eq!(doc.releases, ["2.9.0", "2.10.0"]);
        assert_eq!(doc.suggestion.tag, SuggestionTag::Satisfies);
        assert_eq!(doc.suggestion.version.as_deref(), Some("2.10.0"));
    }

    #[tokio::test]
    async fn test_failed_index_does_not_block_others() {
        let mut server = mockito::Server::new_async().await;
        let _bad = server
            .mock("GET", "/bad/index.json")
            .with_status(503)
            .create_async()
            .await;
        let good = format!(
            r#"{{"resources": [{{"@id": "{}/auto", "@type": "SearchAutocompleteService"}}]}}"#,
            server.url()
        );
        let _good = server
            .mock("GET", "/good/index.json")
            .with_status(200)
            .with_body(good)
            .create_async()
            .await;
        let _auto = server
            .mock("GET", "/auto")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"totalHits": 1, "data": ["1.0.0", "1.1.0"]}"#)
            .create_async()
            .await;

        let doc = client(vec![
            format!("{}/bad/index.json", server.url()),
            format!("{}/good/index.json", server.url()),
        ])
        .fetch_package(&PackageRequest::new("Pkg", "1.1.0"))
        .await
        .unwrap();

        assert_eq!(doc.suggestion.tag, SuggestionTag::Matches);
        assert_eq!(doc.suggestion.version.as_deref(), Some("1.1.0"));
    }

    #[tokio::test]
    async fn test_transient_failure_surfaces_when_no_data() {
        let mut server = mockito::Server::new_async().await;
        let index = format!(
            r#"{{"resources": [{{"@id": "{}/flat/", "@type": "PackageBaseAddress/3.0.0"}}]}}"#,
            server.url()
        );
        let _index = server
            .mock("GET", "/index.json")
            .with_status(200)
            .with_body(index)
            .create_async()
            .await;
        let _flat = server
            .mock("GET", "/flat/pkg/index.json")
            .with_status(500)
            .create_async()
            .await;

        let err = client(vec![format!("{}/index.json", server.url())])
            .fetch_package(&PackageRequest::new("Pkg", "1.0.0"))
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(err.status(), Some(500));
    }
}
