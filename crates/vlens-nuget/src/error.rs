//! Errors specific to NuGet resolution.

use thiserror::Error;
use vlens_core::{HttpError, VlensError};

#[derive(Error, Debug)]
pub enum NugetError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Failed to deserialize a NuGet service response
    #[error("Failed to parse NuGet {context} from '{url}': {source}")]
    ResponseParse {
        context: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// No service index URL configured
    #[error("No NuGet service index configured")]
    NoIndexConfigured,
}

/// Result type alias for NuGet operations.
pub type Result<T> = std::result::Result<T, NugetError>;

impl NugetError {
    pub fn response_parse(
        context: &'static str,
        url: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::ResponseParse {
            context,
            url: url.into(),
            source,
        }
    }

    /// Whether retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_transient())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_not_found())
    }
}

impl From<NugetError> for VlensError {
    fn from(err: NugetError) -> Self {
        match err {
            NugetError::Http(e) => Self::Http(e),
            NugetError::ResponseParse {
                context,
                url,
                source,
            } => Self::parse_error(format!("NuGet {} from '{}'", context, url), source),
            NugetError::NoIndexConfigured => Self::Configuration(err.to_string()),
        }
    }
}
