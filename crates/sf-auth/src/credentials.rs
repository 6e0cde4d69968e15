//! Login credentials.
//!
//! Every field is optional here; each login strategy checks for the fields
//! its flow needs when it is built.

/// Connected-app and user credentials used to obtain a session.
///
/// Secrets (`client_secret`, `password`, `code`) are redacted in Debug output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub redirect_uri: Option<String>,
    pub response_type: Option<String>,
    pub code: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("redirect_uri", &self.redirect_uri)
            .field("response_type", &self.response_type)
            .field("code", &self.code.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credentials {
    /// Empty credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Username/password credentials, as used by the SOAP login.
    pub fn for_user(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new().with_username(username).with_password(password)
    }

    /// Load credentials from environment variables.
    ///
    /// Reads `SF_CLIENT_ID`, `SF_CLIENT_SECRET`, `SF_USERNAME`, `SF_PASSWORD`,
    /// `SF_REDIRECT_URI`, `SF_RESPONSE_TYPE` and `SF_CODE`. Unset or empty
    /// variables are left as `None`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            client_id: var("SF_CLIENT_ID"),
            client_secret: var("SF_CLIENT_SECRET"),
            username: var("SF_USERNAME"),
            password: var("SF_PASSWORD"),
            redirect_uri: var("SF_REDIRECT_URI"),
            response_type: var("SF_RESPONSE_TYPE"),
            code: var("SF_CODE"),
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    /// Set the authorization code returned to the redirect URI.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}
