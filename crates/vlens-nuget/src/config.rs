use serde::Deserialize;

/// NuGet feed settings.
///
/// # Defaults
///
/// - `index_urls`: `["https://api.nuget.org/v3/index.json"]`
/// - `include_prereleases`: `true`
/// - `auth_token`: none
///
/// # Examples
///
/// ```
/// use vlens_nuget::NugetConfig;
///
/// let config: NugetConfig = serde_json::from_str(
///     r#"{ "registry_urls": ["https://nuget.example.com/v3/index.json"] }"#,
/// ).unwrap();
/// assert_eq!(config.index_urls.len(), 1);
/// assert!(config.include_prereleases);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NugetConfig {
    /// Service index URLs, in preference order
    #[serde(default = "default_index_urls", alias = "registry_urls")]
    pub index_urls: Vec<String>,
    #[serde(default = "default_include_prereleases")]
    pub include_prereleases: bool,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for NugetConfig {
    fn default() -> Self {
        Self {
            index_urls: default_index_urls(),
            include_prereleases: default_include_prereleases(),
            auth_token: None,
        }
    }
}

fn default_index_urls() -> Vec<String> {
    vec!["https://api.nuget.org/v3/index.json".to_string()]
}

const fn default_include_prereleases() -> bool {
    true
}
