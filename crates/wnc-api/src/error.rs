use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error type for the `wnc-api` crate.
///
/// The first five variants are the fixed sentinel set: they carry no
/// request-specific payload and are matched by identity through
/// [`Error::kind`]. Generic HTTP failures surface as [`Error::Api`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Sentinels ───────────────────────────────────────────────────
    /// Client construction rejected the supplied configuration. This is the
    /// only error [`Client::new`](crate::Client::new) returns.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Controller answered HTTP 401.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Controller answered HTTP 403.
    #[error("access forbidden")]
    AccessForbidden,

    /// Controller answered HTTP 404.
    #[error("resource not found")]
    ResourceNotFound,

    /// The effective request deadline expired before a response arrived.
    #[error("request timeout")]
    RequestTimeout,

    // ── HTTP ────────────────────────────────────────────────────────
    /// Any other non-200 response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The caller's cancellation token fired while the request was in flight.
    #[error("request cancelled")]
    Cancelled,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request URL could not be parsed.
    #[error("failed to create request: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("failed to unmarshal response: {message}")]
    Deserialization { message: String, body: String },

    /// An RPC input could not be serialized.
    #[error("failed to marshal request: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Identity-comparable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfiguration,
    AuthenticationFailed,
    AccessForbidden,
    ResourceNotFound,
    RequestTimeout,
    Api,
    Cancelled,
    Transport,
    InvalidRequest,
    Decode,
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// The sentinel (or category) this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Self::AuthenticationFailed => ErrorKind::AuthenticationFailed,
            Self::AccessForbidden => ErrorKind::AccessForbidden,
            Self::ResourceNotFound => ErrorKind::ResourceNotFound,
            Self::RequestTimeout => ErrorKind::RequestTimeout,
            Self::Api(_) => ErrorKind::Api,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Transport(_) => ErrorKind::Transport,
            Self::InvalidUrl(_) => ErrorKind::InvalidRequest,
            Self::Deserialization { .. } | Self::Serialization(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status behind this error, when one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed => Some(401),
            Self::AccessForbidden => Some(403),
            Self::ResourceNotFound => Some(404),
            Self::Api(e) => Some(e.status_code),
            _ => None,
        }
    }

    /// Returns `true` for 401/403 responses.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthenticationFailed | Self::AccessForbidden)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound)
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The core never retries on its own; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestTimeout => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api(e) => {
                e.status_code == StatusCode::TOO_MANY_REQUESTS.as_u16()
                    || (500..600).contains(&e.status_code)
            }
            _ => false,
        }
    }
}

/// A non-200 response that none of the named sentinels cover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API error (HTTP {status_code}): {message}")]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
    /// Raw response body, kept for diagnostics.
    pub body: String,
}
