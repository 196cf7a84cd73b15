//! Dub registry client (<https://code.dlang.org/api/packages>).

use crate::config::DubConfig;
use crate::error::DubError;
use crate::selections::DubSelections;
use crate::specifier::parse_dub_specifier;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use vlens_core::{
    HttpCache, PackageClient, PackageDocument, PackageRequest, ResponseStatus, build_document,
    create_directory, recover_not_found,
};

pub const PROVIDER: &str = "dub";

/// Package info response (`/{name}/info?minimize=true`).
#[derive(Debug, Deserialize)]
pub struct PackageInfo {
    #[serde(default)]
    pub versions: Vec<VersionInfo>,
}

#[derive(Debug, Deserialize)]
pub struct VersionInfo {
    pub version: String,
}

/// Client for the Dub package registry.
///
/// When selections are attached, pinned versions populate
/// `locked_version` and path selections resolve to directory documents
/// without a registry request.
pub struct DubClient {
    cache: Arc<HttpCache>,
    config: DubConfig,
    selections: Option<DubSelections>,
}

impl DubClient {
    pub fn new(cache: Arc<HttpCache>, config: DubConfig) -> Self {
        Self {
            cache,
            config,
            selections: None,
        }
    }

    #[must_use]
    pub fn with_selections(mut self, selections: DubSelections) -> Self {
        self.selections = Some(selections);
        self
    }

    pub fn package_info_url(&self, name: &str) -> String {
        format!(
            "{}/{}/info",
            self.config.api_url.trim_end_matches('/'),
            urlencoding::encode(name)
        )
    }

    fn locked_version(&self, name: &str) -> Option<String> {
        self.selections
            .as_ref()
            .and_then(|s| s.locked_version(name))
            .map(ToString::to_string)
    }
}

#[async_trait]
impl PackageClient for DubClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_package(&self, request: &PackageRequest) -> vlens_core::Result<PackageDocument> {
        if let Some(path) = self
            .selections
            .as_ref()
            .and_then(|s| s.local_path(&request.name))
        {
            return Ok(create_directory(PROVIDER, request, path));
        }

        let spec = parse_dub_specifier(&request.version);
        let url = self.package_info_url(&request.name);

        let response = match self.cache.get(&url, &[("minimize", "true")]).await {
            Ok(response) => response,
            Err(e) => {
                return recover_not_found(PROVIDER, request, &spec, e)
                    .map(|doc| doc.with_locked_version(self.locked_version(&request.name)));
            }
        };

        let info: PackageInfo = response.json().map_err(|e| DubError::ApiResponseError {
            package: request.name.clone(),
            source: e,
        })?;

        let doc = build_document(
            PROVIDER,
            request,
            &spec,
            info.versions.iter().map(|v| v.version.as_str()),
            self.config.include_prereleases,
            ResponseStatus::from(&response),
        );
        Ok(doc.with_locked_version(self.locked_version(&request.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selections::Selection;
    use std::collections::HashMap;
    use vlens_core::{HttpConfig, PackageSource, SuggestionTag};

    const VIBE_D: &str = r#"{
  "name": "vibe-d",
  "versions": [
    { "version": "0.9.4" },
    { "version": "0.9.5" },
    { "version": "0.10.0-beta.1" },
    { "version": "~master" }
  ]
}"#;

    fn client(api_url: String) -> DubClient {
        let cache = Arc::new(HttpCache::new(&HttpConfig::default()).unwrap());
        DubClient::new(
            cache,
            DubConfig {
                api_url,
                ..DubConfig::default()
            },
        )
    }

    fn selections(entries: &[(&str, Selection)]) -> DubSelections {
        DubSelections {
            path: "dub.selections.json".into(),
            versions: entries
                .iter()
                .map(|(name, s)| ((*name).to_string(), s.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn test_fetch_pessimistic_range() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/vibe-d/info")
            .match_query(mockito::Matcher::UrlEncoded("minimize".into(), "true".into()))
            .with_status(200)
            .with_body(VIBE_D)
            .create_async()
            .await;

        let doc = client(server.url())
            .fetch_package(&PackageRequest::new("vibe-d", "~>0.9.4"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(doc.releases, ["0.9.4", "0.9.5"]);
        assert_eq!(doc.prereleases, ["0.10.0-beta.1"]);
        assert_eq!(doc.suggestion.tag, SuggestionTag::Satisfies);
        assert_eq!(doc.suggestion.version.as_deref(), Some("0.9.5"));
        assert!(doc.locked_version.is_none());
    }

    #[tokio::test]
    async fn test_branch_reference_is_no_match() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/vibe-d/info")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(VIBE_D)
            .create_async()
            .await;

        let doc = client(server.url())
            .fetch_package(&PackageRequest::new("vibe-d", "~master"))
            .await
            .unwrap();

        assert_eq!(doc.suggestion.tag, SuggestionTag::NoMatch);
        assert_eq!(doc.suggestion.version.as_deref(), Some("0.9.5"));
    }

    #[tokio::test]
    async fn test_not_found_keeps_lock_data() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/gone/info")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let doc = client(server.url())
            .with_selections(selections(&[("gone", Selection::Version("1.0.0".into()))]))
            .fetch_package(&PackageRequest::new("gone", "~>1.0"))
            .await
            .unwrap();

        assert_eq!(doc.suggestion.tag, SuggestionTag::NotFound);
        assert_eq!(doc.locked_version.as_deref(), Some("1.0.0"));
    }

    #[tokio::test]
    async fn test_locked_version_from_selections() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/vibe-d/info")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(VIBE_D)
            .create_async()
            .await;

        let doc = client(server.url())
            .with_selections(selections(&[(
                "vibe-d",
                Selection::Detailed {
                    version: "0.9.4".into(),
                },
            )]))
            .fetch_package(&PackageRequest::new("vibe-d", "~>0.9.4"))
            .await
            .unwrap();

        assert_eq!(doc.locked_version.as_deref(), Some("0.9.4"));
    }

    #[tokio::test]
    async fn test_path_selection_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/local-lib/info")
            .match_query(mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let doc = client(server.url())
            .with_selections(selections(&[(
                "local-lib",
                Selection::Path {
                    path: "../local-lib".into(),
                },
            )]))
            .fetch_package(&PackageRequest::new("local-lib", "*"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(doc.source, PackageSource::Directory);
        assert_eq!(doc.resolved_version.as_deref(), Some("../local-lib"));
    }

    #[test]
    fn test_package_info_url_encodes_subpackages() {
        let client = client("https://code.dlang.org/api/packages/".into());
        assert_eq!(
            client.package_info_url("vibe-d:http"),
            "https://code.dlang.org/api/packages/vibe-d%3Ahttp/info"
        );
    }
}
