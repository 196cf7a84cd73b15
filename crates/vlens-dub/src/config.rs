use serde::Deserialize;
use std::path::PathBuf;

/// Dub registry settings.
///
/// # Defaults
///
/// - `api_url`: `https://code.dlang.org/api/packages`
/// - `include_prereleases`: `true`
/// - `selections_path`: none (no lock data)
#[derive(Debug, Clone, Deserialize)]
pub struct DubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_include_prereleases")]
    pub include_prereleases: bool,
    /// Path to a `dub.selections.json` whose pins fill `locked_version`
    #[serde(default)]
    pub selections_path: Option<PathBuf>,
}

impl Default for DubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            include_prereleases: default_include_prereleases(),
            selections_path: None,
        }
    }
}

fn default_api_url() -> String {
    "https://code.dlang.org/api/packages".to_string()
}

const fn default_include_prereleases() -> bool {
    true
}
