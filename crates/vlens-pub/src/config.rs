use serde::Deserialize;

/// pub.dev settings.
///
/// # Defaults
///
/// - `api_url`: `https://pub.dev/api`
/// - `include_prereleases`: `true`
/// - `auth_token`: none
#[derive(Debug, Clone, Deserialize)]
pub struct PubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_include_prereleases")]
    pub include_prereleases: bool,
    /// Bearer token for private pub repositories
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for PubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            include_prereleases: default_include_prereleases(),
            auth_token: None,
        }
    }
}

fn default_api_url() -> String {
    "https://pub.dev/api".to_string()
}

const fn default_include_prereleases() -> bool {
    true
}
