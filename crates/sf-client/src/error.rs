//! Error types shared by every tandem-sf crate.
//!
//! The REST and SOAP clients surface the same failure vocabulary, so callers
//! can switch protocols without changing their error handling.

/// Result type alias for tandem-sf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tandem-sf operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for an [`ErrorKind::AuthenticationFailed`] error.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationFailed(message.into()))
    }

    /// Shorthand for an [`ErrorKind::TypeMismatch`] error.
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch(message.into()))
    }

    /// Shorthand for an [`ErrorKind::InvalidValue`] error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue(message.into()))
    }

    /// Returns true if this error is an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::AuthenticationFailed(_))
    }

    /// Returns the HTTP status if the server rejected the request.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Missing or contradictory construction arguments.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation requires authentication, or the login exchange failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server answered with a status >= 300.
    #[error("Request failed with status {status}: {}", crate::response::sanitize_error_message(.body))]
    RequestFailed { status: u16, body: String },

    /// A value of the wrong shape was passed to an operation.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Unsupported action name or unknown resource name.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Pagination stopped at the configured page cap.
    #[error("Query pagination stopped after {limit} pages")]
    PageLimitExceeded { limit: usize },

    /// The server answered 2xx but the payload is not what the protocol promises.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other transport-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// XML parse error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Validation(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
