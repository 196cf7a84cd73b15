//! npm registry client.
//!
//! Versions come from the package metadata document
//! (<https://registry.npmjs.org/{package}>): the keys of `versions` and
//! the `dist-tags` map.

use crate::config::NpmConfig;
use crate::error::NpmError;
use crate::specifier::{NpmSpecifier, parse_npm_specifier};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::HashMap;
use std::sync::Arc;
use vlens_core::{
    HttpCache, PackageClient, PackageDocument, PackageRequest, ResponseStatus, build_document,
    create_directory, recover_not_found,
};

pub const PROVIDER: &str = "npm";

/// Package metadata response from npm registry.
#[derive(Debug, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub versions: HashMap<String, IgnoredAny>,
    #[serde(default, rename = "dist-tags")]
    pub dist_tags: HashMap<String, String>,
}

/// Client for the npm registry.
///
/// All requests go through the shared [`HttpCache`].
#[derive(Clone)]
pub struct NpmClient {
    cache: Arc<HttpCache>,
    config: NpmConfig,
}

impl NpmClient {
    /// Creates a client; the registry URL must be http(s).
    pub fn new(cache: Arc<HttpCache>, config: NpmConfig) -> crate::error::Result<Self> {
        let url = config.registry_url.trim_end_matches('/');
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(NpmError::InvalidRegistryUrl {
                url: config.registry_url,
            });
        }
        Ok(Self { cache, config })
    }

    /// Metadata URL for a package. Scoped names keep their `@` and encode
    /// the slash (`@types%2Fnode`).
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use vlens_core::{HttpCache, HttpConfig};
    /// use vlens_npm::{NpmClient, NpmConfig};
    ///
    /// # let cache = Arc::new(HttpCache::new(&HttpConfig::default()).unwrap());
    /// let client = NpmClient::new(cache, NpmConfig::default()).unwrap();
    /// assert_eq!(
    ///     client.package_url("@types/node"),
    ///     "https://registry.npmjs.org/@types%2Fnode"
    /// );
    /// ```
    pub fn package_url(&self, name: &str) -> String {
        let base = self.config.registry_url.trim_end_matches('/');
        match name.strip_prefix('@') {
            Some(scoped) => format!("{}/@{}", base, urlencoding::encode(scoped)),
            None => format!("{}/{}", base, urlencoding::encode(name)),
        }
    }
}

#[async_trait]
impl PackageClient for NpmClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_package(&self, request: &PackageRequest) -> vlens_core::Result<PackageDocument> {
        let parsed = parse_npm_specifier(&request.version);
        if let NpmSpecifier::Directory { path } = &parsed {
            return Ok(create_directory(PROVIDER, request, path));
        }

        let url = self.package_url(&request.name);
        let response = match self
            .cache
            .get_with_token(&url, &[], self.config.auth_token.as_deref())
            .await
        {
            Ok(response) => response,
            Err(e) => return recover_not_found(PROVIDER, request, &parsed.pending_spec(), e),
        };

        let metadata: PackageMetadata = response
            .json()
            .map_err(|e| NpmError::api_response_error(&request.name, e))?;

        let spec = parsed.resolve(&metadata.dist_tags);
        Ok(build_document(
            PROVIDER,
            request,
            &spec,
            metadata.versions.keys(),
            self.config.include_prereleases,
            ResponseStatus::from(&response),
        ))
    }
}
