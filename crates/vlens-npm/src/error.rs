//! Errors specific to npm registry resolution.

use thiserror::Error;
use vlens_core::VlensError;

/// Errors specific to npm registry resolution.
///
/// Missing packages are not errors: a 404 from the registry becomes a
/// not-found document before reaching this type.
#[derive(Error, Debug)]
pub enum NpmError {
    /// Failed to deserialize npm registry response
    #[error("Failed to parse npm registry response for '{package}': {source}")]
    ApiResponseError {
        package: String,
        #[source]
        source: serde_json::Error,
    },

    /// Registry URL is unusable
    #[error("Invalid npm registry URL '{url}'")]
    InvalidRegistryUrl { url: String },
}

/// Result type alias for npm operations.
pub type Result<T> = std::result::Result<T, NpmError>;

impl NpmError {
    /// Create an API response error.
    pub fn api_response_error(package: impl Into<String>, error: serde_json::Error) -> Self {
        Self::ApiResponseError {
            package: package.into(),
            source: error,
        }
    }
}

impl From<NpmError> for VlensError {
    fn from(err: NpmError) -> Self {
        match err {
            NpmError::ApiResponseError { package, source } => {
                Self::parse_error(format!("npm registry response for '{}'", package), source)
            }
            NpmError::InvalidRegistryUrl { .. } => Self::Configuration(err.to_string()),
        }
    }
}
