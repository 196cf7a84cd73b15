use serde::Deserialize;

/// npm registry settings.
///
/// # Defaults
///
/// - `registry_url`: `https://registry.npmjs.org`
/// - `include_prereleases`: `true`
/// - `auth_token`: none
#[derive(Debug, Clone, Deserialize)]
pub struct NpmConfig {
    #[serde(default = "default_registry_url")]
    pub registry_url: String,
    #[serde(default = "default_include_prereleases")]
    pub include_prereleases: bool,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for NpmConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            include_prereleases: default_include_prereleases(),
            auth_token: None,
        }
    }
}

fn default_registry_url() -> String {
    "https://registry.npmjs.org".to_string()
}

const fn default_include_prereleases() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: NpmConfig =
            serde_json::from_str(r#"{ "registry_url": "https://npm.example.com" }"#).unwrap();
        assert_eq!(config.registry_url, "https://npm.example.com");
        assert!(config.include_prereleases);
        assert!(config.auth_token.is_none());
    }
}
