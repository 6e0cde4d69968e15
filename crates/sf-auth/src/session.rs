//! Authentication state held by a protocol API.

use tandem_sf_client::{Error, Result};

/// Message of the error raised when an operation runs without a session.
pub const NOT_AUTHENTICATED: &str = "You need to first authenticate!";

/// An access token plus the instance URL it is valid for.
///
/// Immutable once built. The access token is redacted in Debug output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Authentication {
    access_token: String,
    instance_url: String,
}

impl std::fmt::Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authentication")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .finish()
    }
}

impl Authentication {
    pub fn new(access_token: impl Into<String>, instance_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            instance_url: instance_url.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// True iff both the token and the instance URL are non-empty.
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty() && !self.instance_url.is_empty()
    }
}

/// Return the session if there is a usable one, or fail with
/// [`AuthenticationFailed`](tandem_sf_client::ErrorKind::AuthenticationFailed).
pub fn ensure_authenticated(auth: Option<&Authentication>) -> Result<&Authentication> {
    match auth {
        Some(auth) if auth.is_authenticated() => Ok(auth),
        _ => Err(Error::authentication_failed(NOT_AUTHENTICATED)),
    }
}
