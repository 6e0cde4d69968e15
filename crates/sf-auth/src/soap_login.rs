//! Username/password login through the SOAP partner API.

use tracing::{info, instrument};
use url::Url;

use tandem_sf_client::{
    dispatch, soap, xml_content_headers, Error, ErrorKind, HttpRequest, RequestMethod, Result,
    SoapUrlResources, Transport, UrlResources, XmlNode,
};

use crate::credentials::Credentials;
use crate::session::Authentication;

/// SOAP login strategy.
#[derive(Clone, PartialEq, Eq)]
pub struct SoapLogin {
    username: String,
    password: String,
}

impl std::fmt::Debug for SoapLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapLogin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl SoapLogin {
    /// Requires `username` and `password`.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        match (&credentials.username, &credentials.password) {
            (Some(username), Some(password)) => Ok(Self {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => Err(Error::new(ErrorKind::Validation(
                "Required fields: `username`, and `password`".to_string(),
            ))),
        }
    }

    /// POST the login envelope to `{auth_site}/services/Soap/u/{version}`.
    ///
    /// The session id becomes the access token and the scheme and host of
    /// `serverUrl` become the instance URL.
    #[instrument(skip(self, transport, resources), fields(username = %self.username))]
    pub async fn authenticate<T: Transport>(
        &self,
        transport: &T,
        resources: &UrlResources,
    ) -> Result<Authentication> {
        let url = SoapUrlResources::new(resources.clone()).full_resource_url(&resources.auth_site());
        let envelope = soap::login_envelope(&self.username, &self.password);

        let request = HttpRequest::new(RequestMethod::Post, url)
            .headers(xml_content_headers(envelope.len(), "login"))
            .xml(envelope);

        let response = dispatch(transport, request).await?.into_raw()?;
        let document = XmlNode::parse(&response.text())?;

        let session_id = document.text_of("sessionId").ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse(
                "login response has no sessionId".to_string(),
            ))
        })?;
        let server_url = document.text_of("serverUrl").ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse(
                "login response has no serverUrl".to_string(),
            ))
        })?;

        let instance_url = Url::parse(server_url)?.origin().ascii_serialization();

        info!(instance_url = %instance_url, "Authenticated via SOAP login");
        Ok(Authentication::new(session_id, instance_url))
    }
}
