//! pub.dev client.
//!
//! Versions come from `GET {api}/packages/{name}`:
//!
//! ```json
//! {
//!   "name": "http",
//!   "latest": { "version": "1.2.0" },
//!   "versions": [{ "version": "1.1.0" }, { "version": "1.2.0", "retracted": true }]
//! }
//! ```

use crate::config::PubConfig;
use crate::error::PubError;
use crate::specifier::parse_pub_specifier;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use vlens_core::{
    HttpCache, PackageClient, PackageDocument, PackageRequest, ResponseStatus, build_document,
    recover_not_found,
};

pub const PROVIDER: &str = "pub";

#[derive(Debug, Deserialize)]
pub struct PackageListing {
    #[serde(default)]
    pub versions: Vec<PublishedVersion>,
}

#[derive(Debug, Deserialize)]
pub struct PublishedVersion {
    pub version: String,
    /// Retracted versions are never suggested
    #[serde(default)]
    pub retracted: bool,
}

/// Client for pub.dev (or a self-hosted pub repository).
#[derive(Clone)]
pub struct PubClient {
    cache: Arc<HttpCache>,
    config: PubConfig,
}

impl PubClient {
    pub fn new(cache: Arc<HttpCache>, config: PubConfig) -> Self {
        Self { cache, config }
    }

    pub fn package_url(&self, name: &str) -> String {
        format!(
            "{}/packages/{}",
            self.config.api_url.trim_end_matches('/'),
            urlencoding::encode(name)
        )
    }
}

#[async_trait]
impl PackageClient for PubClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_package(&self, request: &PackageRequest) -> vlens_core::Result<PackageDocument> {
        let spec = parse_pub_specifier(&request.version);
        let url = self.package_url(&request.name);

        let response = match self
            .cache
            .get_with_token(&url, &[], self.config.auth_token.as_deref())
            .await
        {
            Ok(response) => response,
            Err(e) => return recover_not_found(PROVIDER, request, &spec, e),
        };

        let listing: PackageListing =
            response.json().map_err(|e| PubError::ApiResponseError {
                package: request.name.clone(),
                source: e,
            })?;

        let versions = listing
            .versions
            .iter()
            .filter(|v| {
                if v.retracted {
                    tracing::debug!("skipping retracted {} {}", request.name, v.version);
                }
                !v.retracted
            })
            .map(|v| v.version.as_str());

        Ok(build_document(
            PROVIDER,
            request,
            &spec,
            versions,
            self.config.include_prereleases,
            ResponseStatus::from(&response),
        ))
    }
}
