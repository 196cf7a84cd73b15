use serde::Deserialize;
use std::path::Path;
use vlens_core::{HttpConfig, Result, VlensError};
use vlens_dub::DubConfig;
use vlens_npm::NpmConfig;
use vlens_nuget::NugetConfig;
use vlens_pub::PubConfig;

/// Root configuration for vlens.
///
/// Every section is optional and falls back to the public registry
/// defaults of its ecosystem.
///
/// # Examples
///
/// ```
/// use vlens::config::VlensConfig;
///
/// let json = r#"{
///     "http": { "cache_ttl_secs": 0 },
///     "nuget": { "registry_urls": ["https://nuget.example.com/v3/index.json"] },
///     "pub": { "include_prereleases": false }
/// }"#;
///
/// let config: VlensConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.http.cache_ttl_secs, 0);
/// assert_eq!(config.nuget.index_urls.len(), 1);
/// assert!(!config.pub_dev.include_prereleases);
/// assert!(config.npm.include_prereleases);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VlensConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub npm: NpmConfig,
    #[serde(default)]
    pub nuget: NugetConfig,
    #[serde(default)]
    pub dub: DubConfig,
    #[serde(default, rename = "pub")]
    pub pub_dev: PubConfig,
}

impl VlensConfig {
    /// Reads a JSON configuration file.
    pub async fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&content)
            .map_err(|e| VlensError::parse_error(format!("configuration {}", path.display()), e))
    }
}
