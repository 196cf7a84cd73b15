//! Errors specific to pub.dev resolution.

use thiserror::Error;
use vlens_core::VlensError;

#[derive(Error, Debug)]
pub enum PubError {
    /// Failed to deserialize pub.dev response
    #[error("Failed to parse pub.dev response for '{package}': {source}")]
    ApiResponseError {
        package: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for Pub operations.
pub type Result<T> = std::result::Result<T, PubError>;

impl From<PubError> for VlensError {
    fn from(err: PubError) -> Self {
        match err {
            PubError::ApiResponseError { package, source } => {
                Self::parse_error(format!("pub.dev response for '{}'", package), source)
            }
        }
    }
}
