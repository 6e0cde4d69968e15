//! OAuth 2.0 login against the REST token endpoint.
//!
//! Two flows are supported:
//! - **Username-password flow**: `client_id`, `client_secret`, `username`, `password`
//! - **Web server flow**: `client_id`, `client_secret`, `redirect_uri` and
//!   `response_type = "code"`; the caller sends the user to
//!   [`RestLogin::authorization_uri`] and exchanges the returned `code`.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use tandem_sf_client::{dispatch, Error, ErrorKind, HttpRequest, RequestMethod, Result, Transport, UrlResources};

use crate::credentials::Credentials;
use crate::session::Authentication;

/// Token endpoint path, relative to the authentication site.
pub const TOKEN_PATH: &str = "/services/oauth2/token";

/// Authorization endpoint path, relative to the authentication site.
pub const AUTHORIZE_PATH: &str = "/services/oauth2/authorize";

#[derive(Clone, PartialEq, Eq)]
enum Grant {
    Password { username: String, password: String },
    AuthorizationCode { redirect_uri: String },
}

/// REST (OAuth 2.0) login strategy.
///
/// Sensitive fields are redacted in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct RestLogin {
    client_id: String,
    client_secret: String,
    grant: Grant,
}

impl std::fmt::Debug for RestLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flow = match &self.grant {
            Grant::Password { .. } => "password",
            Grant::AuthorizationCode { .. } => "authorization_code",
        };
        f.debug_struct("RestLogin")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("flow", &flow)
            .finish_non_exhaustive()
    }
}

impl RestLogin {
    /// Validate the credentials and pick the flow.
    ///
    /// A `response_type` selects the web server flow and must be `"code"`;
    /// without one the username-password flow is used.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let code_flow = credentials.response_type.is_some();

        let mut required: Vec<(&str, &Option<String>)> = vec![
            ("client_id", &credentials.client_id),
            ("client_secret", &credentials.client_secret),
        ];
        if code_flow {
            required.push(("response_type", &credentials.response_type));
            required.push(("redirect_uri", &credentials.redirect_uri));
        } else {
            required.push(("username", &credentials.username));
            required.push(("password", &credentials.password));
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| format!("`{}`", name))
            .collect();

        if !missing.is_empty() {
            return Err(Error::new(ErrorKind::Validation(format!(
                "Required fields: {}",
                missing.join(", ")
            ))));
        }

        if code_flow && credentials.response_type.as_deref() != Some("code") {
            return Err(Error::new(ErrorKind::Validation(
                "Required fields: `response_type`: `code`".to_string(),
            )));
        }

        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        let grant = if code_flow {
            Grant::AuthorizationCode {
                redirect_uri: field(&credentials.redirect_uri),
            }
        } else {
            Grant::Password {
                username: field(&credentials.username),
                password: field(&credentials.password),
            }
        };

        Ok(Self {
            client_id: field(&credentials.client_id),
            client_secret: field(&credentials.client_secret),
            grant,
        })
    }

    /// Returns true for the web server (authorization code) flow.
    pub fn is_code_flow(&self) -> bool {
        matches!(self.grant, Grant::AuthorizationCode { .. })
    }

    /// The URL the user must visit to obtain an authorization code.
    pub fn authorization_uri(&self, resources: &UrlResources) -> Result<String> {
        let Grant::AuthorizationCode { redirect_uri } = &self.grant else {
            return Err(Error::new(ErrorKind::Validation(
                "Required fields: `response_type`, `redirect_uri`".to_string(),
            )));
        };

        let params = serde_urlencoded::to_string(&[
            ("response_type", "code"),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ])?;

        Ok(format!("{}{}?{}", resources.auth_site(), AUTHORIZE_PATH, params))
    }

    /// Exchange credentials (or an authorization code) for a session.
    ///
    /// The code is never logged.
    #[instrument(skip(self, transport, resources, code), fields(auth_site = %resources.auth_site()))]
    pub async fn authenticate<T: Transport>(
        &self,
        transport: &T,
        resources: &UrlResources,
        code: Option<&str>,
    ) -> Result<Authentication> {
        let params: Vec<(&str, &str)> = match &self.grant {
            Grant::Password { username, password } => vec![
                ("grant_type", "password"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("username", username.as_str()),
                ("password", password.as_str()),
            ],
            Grant::AuthorizationCode { redirect_uri } => {
                let code = code.ok_or_else(|| {
                    Error::authentication_failed(
                        "You first need to use the get_auth_uri() to get the `code`",
                    )
                })?;
                vec![
                    ("grant_type", "authorization_code"),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("redirect_uri", redirect_uri.as_str()),
                    ("code", code),
                ]
            }
        };

        let url = format!("{}{}", resources.auth_site(), TOKEN_PATH);
        let request = HttpRequest::new(RequestMethod::Post, url).form(&params)?;

        let value = dispatch(transport, request).await?.into_json()?;
        let token: TokenResponse = serde_json::from_value(value)?;

        info!(instance_url = %token.instance_url, "Authenticated via OAuth");
        Ok(Authentication::new(token.access_token, token.instance_url))
    }
}

/// Token response from OAuth.
///
/// Sensitive fields are redacted in Debug output.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Instance URL.
    pub instance_url: String,
    /// User ID URL.
    #[serde(default)]
    pub id: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
    /// Issued at timestamp.
    #[serde(default)]
    pub issued_at: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
