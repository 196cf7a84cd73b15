use crate::cache::ResponseSource;
use serde::Serialize;
use thiserror::Error;

/// Failure of a single HTTP request.
///
/// Status failures keep the original status code so callers can tell a
/// missing package (404) apart from every other failure. Timeouts are a
/// separate variant from status errors.
///
/// The type is `Clone` because one in-flight request may be awaited by
/// several callers at once.
///
/// # Examples
///
/// ```
/// use vlens_core::error::HttpError;
///
/// let err = HttpError::Status {
///     url: "https://registry.npmjs.org/missing".into(),
///     status: 404,
///     body: String::new(),
/// };
///
/// assert!(err.is_not_found());
/// assert!(!err.is_transient());
/// assert_eq!(err.status(), Some(404));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("request failed for {url}: {message}")]
    Network { url: String, message: String },
}

impl HttpError {
    /// Classifies a transport error from reqwest.
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                message: error.to_string(),
            }
        }
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Timeout { .. } | Self::Network { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Timeouts, transport failures and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Timeout { .. } | Self::Network { .. } => true,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Timeout { url } | Self::Network { url, .. } => url,
        }
    }
}

/// Core error type for vlens.
///
/// Package absence is not represented here at the client boundary: a 404
/// is turned into a not-found document before it reaches the caller. What
/// remains are transport failures, configuration problems and local file
/// errors.
///
/// # Examples
///
/// ```
/// use vlens_core::error::{Result, VlensError};
///
/// fn registry_url(urls: &[String]) -> Result<&str> {
///     urls.first()
///         .map(String::as_str)
///         .ok_or_else(|| VlensError::Configuration("no registry configured".into()))
/// }
///
/// assert!(registry_url(&[]).is_err());
/// ```
#[derive(Error, Debug)]
pub enum VlensError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("failed to parse {context}: {source}")]
    ParseError {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unsupported ecosystem: {0}")]
    UnsupportedEcosystem(String),

    #[error("lock file error: {0}")]
    Lockfile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("resolution cancelled")]
    Cancelled,
}

impl VlensError {
    /// Creates a parse error for a registry response or local file.
    pub fn parse_error(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ParseError {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_transient())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Serializable `{status, source}` view of the error for the
    /// presentation layer.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            status: self.status(),
            source: match self {
                Self::Http(_) => ResponseSource::Remote,
                _ => ResponseSource::Local,
            },
            transient: self.is_transient(),
            message: self.to_string(),
        }
    }
}

/// Rejected resolution as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub status: Option<u16>,
    pub source: ResponseSource,
    pub transient: bool,
    pub message: String,
}

/// Convenience type alias for `Result<T, VlensError>`.
pub type Result<T> = std::result::Result<T, VlensError>;
