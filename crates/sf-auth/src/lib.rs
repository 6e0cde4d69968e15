//! # sf-auth
//!
//! Authentication state and login strategies for the Salesforce REST and
//! SOAP APIs.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets, passwords) are redacted in Debug output
//! - Tracing spans skip credential parameters
//!
//! ## Supported Authentication Methods
//!
//! - **OAuth 2.0 Username-Password Flow** ([`RestLogin`])
//! - **OAuth 2.0 Web Server Flow** ([`RestLogin::authorization_uri`] then a `code` exchange)
//! - **SOAP login** ([`SoapLogin`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use tandem_sf_auth::{Credentials, RestLogin};
//! use tandem_sf_client::{HttpTransport, UrlResources};
//!
//! let transport = HttpTransport::default_transport()?;
//! let resources = UrlResources::for_environment(false, 45.0);
//! let login = RestLogin::new(&Credentials::from_env())?;
//! let auth = login.authenticate(&transport, &resources, None).await?;
//! ```

mod credentials;
mod oauth;
mod session;
mod soap_login;

pub use credentials::Credentials;
pub use oauth::{RestLogin, TokenResponse, AUTHORIZE_PATH, TOKEN_PATH};
pub use session::{ensure_authenticated, Authentication, NOT_AUTHENTICATED};
pub use soap_login::SoapLogin;
pub use tandem_sf_client::{Error, ErrorKind, Result};
