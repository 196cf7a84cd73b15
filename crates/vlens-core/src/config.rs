//! HTTP settings shared by every registry client.

use serde::Deserialize;
use std::time::Duration;

/// Configuration for outbound registry requests and the response cache.
///
/// # Defaults
///
/// - `timeout_secs`: `30`
/// - `cache_ttl_secs`: `300` (5 minutes); `0` disables response caching
/// - `user_agent`: `vlens/<version>`
///
/// # Examples
///
/// ```
/// use vlens_core::config::HttpConfig;
///
/// let config: HttpConfig = serde_json::from_str(r#"{ "cache_ttl_secs": 60 }"#).unwrap();
/// assert_eq!(config.cache_ttl_secs, 60);
/// assert_eq!(config.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            user_agent: default_user_agent(),
        }
    }
}

const fn default_timeout() -> u64 {
    30
}

const fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_user_agent() -> String {
    concat!("vlens/", env!("CARGO_PKG_VERSION")).to_string()
}
