//! Errors specific to Dub resolution and `dub.selections.json` handling.

use std::path::PathBuf;
use thiserror::Error;
use vlens_core::VlensError;

#[derive(Error, Debug)]
pub enum DubError {
    /// Selections file does not exist
    #[error("dub.selections.json not found: {path}")]
    SelectionsNotFound { path: PathBuf },

    /// Selections file has an unsupported `fileVersion`
    #[error("Unknown dub.selections.json file version {version} in {path}")]
    UnsupportedFileVersion { path: PathBuf, version: String },

    /// Failed to read the selections file
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the selections file
    #[error("Failed to parse {path}: {source}")]
    SelectionsParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to deserialize Dub registry response
    #[error("Failed to parse Dub registry response for '{package}': {source}")]
    ApiResponseError {
        package: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for Dub operations.
pub type Result<T> = std::result::Result<T, DubError>;

impl From<DubError> for VlensError {
    fn from(err: DubError) -> Self {
        match err {
            DubError::ApiResponseError { package, source } => {
                Self::parse_error(format!("Dub registry response for '{}'", package), source)
            }
            DubError::ReadError { source, .. } => Self::Io(source),
            other => Self::Lockfile(other.to_string()),
        }
    }
}
