//! Version listing fetchers, one per service capability.
//!
//! Each fetcher returns `Ok(None)` when the package is absent on that
//! service (404, zero hits, or an empty listing) so that absence on one
//! feed never masks data from another.

use crate::discovery::DiscoveredEndpoint;
use crate::error::{NugetError, Result};
use crate::service::ServiceCapability;
use futures::future::join_all;
use serde::Deserialize;
use std::cmp::Ordering;
use vlens_core::{HttpCache, HttpResponse, ResponseStatus};

const CATALOG_PAGE: &str = "catalog:CatalogPage";

/// Versions returned by one service, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionListing {
    pub versions: Vec<String>,
    pub response: ResponseStatus,
}

/// Shared inputs of a single package lookup.
#[derive(Clone, Copy)]
pub struct LookupContext<'a> {
    pub cache: &'a HttpCache,
    pub package_id: &'a str,
    pub include_prereleases: bool,
    pub token: Option<&'a str>,
}

impl LookupContext<'_> {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Option<HttpResponse>> {
        match self.cache.get_with_token(url, query, self.token).await {
            Ok(response) => Ok(Some(response)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Dispatches to the fetcher for the endpoint's capability.
pub async fn fetch_versions(
    ctx: LookupContext<'_>,
    endpoint: &DiscoveredEndpoint,
) -> Result<Option<VersionListing>> {
    let service_url = endpoint.service_url.as_str();
    match endpoint.resolver.capability {
        ServiceCapability::PackageBaseAddress => package_base_address(ctx, service_url).await,
        ServiceCapability::SearchAutocomplete => search_autocomplete(ctx, service_url).await,
        ServiceCapability::Registrations => registrations(ctx, service_url).await,
    }
}

fn package_index_url(service_url: &str, package_id: &str) -> String {
    format!(
        "{}/{}/index.json",
        service_url.trim_end_matches('/'),
        package_id.to_lowercase()
    )
}

fn is_prerelease(version: &str) -> bool {
    version.contains('-')
}

#[derive(Deserialize)]
struct FlatContainerIndex {
    #[serde(default)]
    versions: Option<Vec<String>>,
}

/// `GET {service}/{id}/index.json`
pub async fn package_base_address(
    ctx: LookupContext<'_>,
    service_url: &str,
) -> Result<Option<VersionListing>> {
    let url = package_index_url(service_url, ctx.package_id);
    let Some(response) = ctx.get(&url, &[]).await? else {
        return Ok(None);
    };

    let index: FlatContainerIndex = response
        .json()
        .map_err(|e| NugetError::response_parse("package base address", &url, e))?;

    let Some(mut versions) = index.versions else {
        return Ok(None);
    };
    if !ctx.include_prereleases {
        versions.retain(|v| !is_prerelease(v));
    }
    if versions.is_empty() {
        return Ok(None);
    }

    versions.reverse();
    Ok(Some(VersionListing {
        versions,
        response: ResponseStatus::from(&response),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AutocompleteResponse {
    #[serde(default)]
    total_hits: u64,
    #[serde(default)]
    data: Vec<String>,
}

/// `GET {service}?id={id}&prerelease={flag}&semVerLevel=2.0.0`
pub async fn search_autocomplete(
    ctx: LookupContext<'_>,
    service_url: &str,
) -> Result<Option<VersionListing>> {
    let prerelease = if ctx.include_prereleases { "true" } else { "false" };
    let query = [
        ("id", ctx.package_id),
        ("prerelease", prerelease),
        ("semVerLevel", "2.0.0"),
    ];

    let Some(response) = ctx.get(service_url, &query).await? else {
        return Ok(None);
    };

    let body: AutocompleteResponse = response
        .json()
        .map_err(|e| NugetError::response_parse("autocomplete response", service_url, e))?;

    if body.total_hits == 0 || body.data.is_empty() {
        return Ok(None);
    }

    let mut versions = body.data;
    versions.reverse();
    Ok(Some(VersionListing {
        versions,
        response: ResponseStatus::from(&response),
    }))
}

#[derive(Deserialize)]
struct RegistrationIndex {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    items: Vec<RegistrationPage>,
}

#[derive(Deserialize)]
struct RegistrationPage {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@type", default)]
    page_type: Option<String>,
    #[serde(default)]
    items: Option<Vec<RegistrationLeaf>>,
}

#[derive(Deserialize)]
struct RegistrationLeaf {
    #[serde(rename = "catalogEntry")]
    catalog_entry: CatalogEntry,
}

#[derive(Deserialize)]
struct CatalogEntry {
    version: String,
}

/// `GET {service}/{id}/index.json`, following non-inlined catalog pages.
pub async fn registrations(
    ctx: LookupContext<'_>,
    service_url: &str,
) -> Result<Option<VersionListing>> {
    let url = package_index_url(service_url, ctx.package_id);
    let Some(response) = ctx.get(&url, &[]).await? else {
        return Ok(None);
    };

    let index: RegistrationIndex = response
        .json()
        .map_err(|e| NugetError::response_parse("registration index", &url, e))?;

    if index.count == 0 {
        return Ok(None);
    }

    let pages = index
        .items
        .into_iter()
        .filter(|page| page.page_type.as_deref().is_none_or(|t| t == CATALOG_PAGE))
        .map(|page| page_versions(ctx, page));

    let mut versions = Vec::new();
    for page in join_all(pages).await {
        versions.extend(page?);
    }

    if versions.is_empty() {
        return Ok(None);
    }

    versions.sort_by(|a, b| compare_versions(b, a));
    Ok(Some(VersionListing {
        versions,
        response: ResponseStatus::from(&response),
    }))
}

/// Versions of one registration page; inlined leaves are read directly.
async fn page_versions(ctx: LookupContext<'_>, page: RegistrationPage) -> Result<Vec<String>> {
    let leaves = match page.items {
        Some(leaves) => leaves,
        None => {
            let Some(response) = ctx.get(&page.id, &[]).await? else {
                return Ok(Vec::new());
            };
            let fetched: RegistrationPage = response
                .json()
                .map_err(|e| NugetError::response_parse("registration page", &page.id, e))?;
            fetched.items.unwrap_or_default()
        }
    };

    let mut versions: Vec<String> = leaves
        .into_iter()
        .map(|leaf| leaf.catalog_entry.version)
        .collect();
    if !ctx.include_prereleases {
        versions.retain(|v| !is_prerelease(v));
    }
    Ok(versions)
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    match (semver::Version::parse(a), semver::Version::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vlens_core::{HttpConfig, ResponseSource};

    fn cache() -> HttpCache {
        HttpCache::new(&HttpConfig::default()).unwrap()
    }

    fn ctx<'a>(cache: &'a HttpCache, include_prereleases: bool) -> LookupContext<'a> {
        LookupContext {
            cache,
            package_id: "Newtonsoft.Json",
            include_prereleases,
            token: None,
        }
    }

    #[tokio::test]
    async fn test_package_base_address() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/flat/newtonsoft.json/index.json")
            .with_status(200)
            .with_body(r#"{"versions": ["12.0.1", "12.0.2", "13.0.1-beta1", "13.0.1"]}"#)
            .create_async()
            .await;

        let cache = cache();
        let listing = package_base_address(ctx(&cache, true), &format!("{}/flat/", server.url()))
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(listing.versions, ["13.0.1", "13.0.1-beta1", "12.0.2", "12.0.1"]);
        assert_eq!(listing.response, ResponseStatus::new(200, ResponseSource::Remote));
    }

    #[tokio::test]
    async fn test_package_base_address_filters_prereleases() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/flat/newtonsoft.json/index.json")
            .with_status(200)
            .with_body(r#"{"versions": ["1.0.0", "2.0.0-rc.1"]}"#)
            .create_async()
            .await;

        let cache = cache();
        let listing = package_base_address(ctx(&cache, false), &format!("{}/flat", server.url()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(listing.versions, ["1.0.0"]);
    }

    #[tokio::test]
    async fn test_package_base_address_absent() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/flat/newtonsoft.json/index.json")
            .with_status(404)
            .create_async()
            .await;

        let cache = cache();
        let result = package_base_address(ctx(&cache, true), &format!("{}/flat", server.url()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_package_base_address_only_prereleases_filtered_is_absent() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/flat/newtonsoft.json/index.json")
            .with_status(200)
            .with_body(r#"{"versions": ["2.0.0-rc.1"]}"#)
            .create_async()
            .await;

        let cache = cache();
        let result = package_base_address(ctx(&cache, false), &format!("{}/flat", server.url()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_search_autocomplete() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/autocomplete")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("id".into(), "Newtonsoft.Json".into()),
                mockito::Matcher::UrlEncoded("prerelease".into(), "false".into()),
                mockito::Matcher::UrlEncoded("semVerLevel".into(), "2.0.0".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"totalHits": 3, "data": ["11.0.1", "12.0.1", "13.0.1"]}"#)
            .create_async()
            .await;

        let cache = cache();
        let listing = search_autocomplete(ctx(&cache, false), &format!("{}/autocomplete", server.url()))
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(listing.versions, ["13.0.1", "12.0.1", "11.0.1"]);
    }

    #[tokio::test]
    async fn test_search_autocomplete_zero_hits_is_absent() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/autocomplete")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"totalHits": 0, "data": []}"#)
            .create_async()
            .await;

        let cache = cache();
        let result = search_autocomplete(ctx(&cache, true), &format!("{}/autocomplete", server.url()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_registrations_inline_and_remote_pages() {
        let mut server = mockito::Server::new_async().await;
        let page_url = format!("{}/reg/newtonsoft.json/page/2.0.0/3.0.0.json", server.url());
        let index = format!(
            r#"{{
              "count": 2,
              "items": [
                {{
                  "@id": "{url}/reg/newtonsoft.json/page/1.0.0/1.1.0.json",
                  "@type": "catalog:CatalogPage",
                  "items": [
                    {{ "catalogEntry": {{ "version": "1.0.0" }} }},
                    {{ "catalogEntry": {{ "version": "1.1.0-beta" }} }},
                    {{ "catalogEntry": {{ "version": "1.1.0" }} }}
                  ]
                }},
                {{ "@id": "{page_url}", "@type": "catalog:CatalogPage" }}
              ]
            }}"#,
            url = server.url(),
        );

        let _index = server
            .mock("GET", "/reg/newtonsoft.json/index.json")
            .with_status(200)
            .with_body(index)
            .create_async()
            .await;
        let page = server
            .mock("GET", "/reg/newtonsoft.json/page/2.0.0/3.0.0.json")
            .with_status(200)
            .with_body(
                r#"{
                  "@type": "catalog:CatalogPage",
                  "items": [
                    { "catalogEntry": { "version": "2.0.0" } },
                    { "catalogEntry": { "version": "10.0.0" } },
                    { "catalogEntry": { "version": "3.0.0-rc.1" } }
                  ]
                }"#,
            )
            .expect(1)
            .create_async()
            .await;

        let cache = cache();
        let listing = registrations(ctx(&cache, false), &format!("{}/reg/", server.url()))
            .await
            .unwrap()
            .unwrap();

        page.assert_async().await;
        assert_eq!(listing.versions, ["10.0.0", "2.0.0", "1.1.0", "1.0.0"]);
    }

    #[tokio::test]
    async fn test_registrations_zero_count_is_absent() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/reg/newtonsoft.json/index.json")
            .with_status(200)
            .with_body(r#"{"count": 0, "items": []}"#)
            .create_async()
            .await;

        let cache = cache();
        let result = registrations(ctx(&cache, true), &format!("{}/reg", server.url()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_server_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/flat/newtonsoft.json/index.json")
            .with_status(503)
            .create_async()
            .await;

        let cache = cache();
        let err = package_base_address(ctx(&cache, true), &format!("{}/flat", server.url()))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_compare_versions_is_semantic() {
        let mut versions = vec!["1.10.0", "1.9.0", "1.2.0"];
        versions.sort_by(|a, b| compare_versions(b, a));
        assert_eq!(versions, ["1.10.0", "1.9.0", "1.2.0"]);
    }
}
