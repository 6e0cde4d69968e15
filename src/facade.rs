//! The `SalesForce` facade.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use tandem_sf_auth::{Authentication, Credentials};
use tandem_sf_client::security::names;
use tandem_sf_client::{
    Error, HttpTransport, QueryResult, Result, Transport, UrlResources, DEFAULT_API_VERSION,
};
use tandem_sf_rest::RestApi;

use crate::handle::ObjectHandle;
use crate::protocol::{select_protocol, Protocol, ProtocolApi};
use crate::version::{latest_version, VERSIONS_URL};

/// Facade settings.
///
/// The login domain is derived from `sandbox`: `test` for sandboxes,
/// `login` otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub sandbox: bool,
    pub protocol: Protocol,
    /// API version. Discovered by [`SalesForce::connect`] when unset.
    pub version: Option<f64>,
    /// Replaces `https://{domain}.salesforce.com` for logins (My Domain).
    pub login_url: Option<String>,
    /// Page cap for `query_all`. Unbounded when unset.
    pub max_pages: Option<usize>,
    /// Version list queried by discovery; [`VERSIONS_URL`] when unset.
    pub versions_url: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_version(mut self, version: f64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = Some(login_url.into());
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_versions_url(mut self, url: impl Into<String>) -> Self {
        self.versions_url = Some(url.into());
        self
    }

    fn resources(&self, version: f64) -> UrlResources {
        let resources = UrlResources::for_environment(self.sandbox, version);
        match &self.login_url {
            Some(url) => resources.with_login_url(url.clone()),
            None => resources,
        }
    }
}

/// Salesforce client speaking REST or SOAP behind one set of operations.
///
/// Holds the settings, the shared transport and the active protocol API.
/// Switching protocol builds a new API that keeps the session.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tandem_sf_api::{Credentials, HttpTransport, Protocol, SalesForce, Settings};
///
/// let transport = Arc::new(HttpTransport::default_transport()?);
/// let mut sf = SalesForce::connect(transport, Settings::new().with_version(45.0)).await?;
/// sf.authenticate(&Credentials::from_env()).await?;
///
/// let accounts = sf.query_all("SELECT Id, Name FROM Account").await?;
/// let same = sf.via(Protocol::Soap).query_all("SELECT Id, Name FROM Account").await?;
/// sf.sobject("Account")?.create(&json!({"Name": "Acme"})).await?;
/// ```
#[derive(Debug)]
pub struct SalesForce<T: Transport = HttpTransport> {
    settings: Settings,
    resources: UrlResources,
    transport: Arc<T>,
    api: ProtocolApi<T>,
    code_flow: Option<RestApi<T>>,
}

impl<T: Transport> SalesForce<T> {
    /// Build without network access. An unset version falls back to
    /// [`DEFAULT_API_VERSION`].
    pub fn new(transport: Arc<T>, settings: Settings) -> Self {
        let version = settings.version.unwrap_or(DEFAULT_API_VERSION);
        Self::with_version(transport, settings, version)
    }

    /// Build, discovering the latest API version when none is set.
    #[instrument(skip(transport))]
    pub async fn connect(transport: Arc<T>, settings: Settings) -> Result<Self> {
        let version = match settings.version {
            Some(version) => version,
            None => {
                let url = settings.versions_url.as_deref().unwrap_or(VERSIONS_URL);
                latest_version(transport.as_ref(), url).await?
            }
        };
        Ok(Self::with_version(transport, settings, version))
    }

    fn with_version(transport: Arc<T>, mut settings: Settings, version: f64) -> Self {
        let resources = settings.resources(version);
        settings.version = Some(resources.version());

        let api = select_protocol(settings.protocol, None, Arc::clone(&transport), resources.clone())
            .with_page_limit(settings.max_pages);

        Self {
            settings,
            resources,
            transport,
            api,
            code_flow: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resources(&self) -> &UrlResources {
        &self.resources
    }

    pub fn protocol(&self) -> Protocol {
        self.api.protocol()
    }

    /// The active protocol API.
    pub fn api(&self) -> &ProtocolApi<T> {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut ProtocolApi<T> {
        &mut self.api
    }

    pub fn auth(&self) -> Option<&Authentication> {
        self.api.auth()
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn set_sandbox(&mut self, sandbox: bool) {
        self.settings.sandbox = sandbox;
        self.resources.set_sandbox(sandbox);
        self.api.resources_mut().set_sandbox(sandbox);
        if let Some(api) = &mut self.code_flow {
            api.resources_mut().set_sandbox(sandbox);
        }
    }

    /// Set the API version (rounded to one decimal).
    pub fn set_version(&mut self, version: f64) {
        self.resources.set_version(version);
        self.settings.version = Some(self.resources.version());
        self.api.resources_mut().set_version(version);
        if let Some(api) = &mut self.code_flow {
            api.resources_mut().set_version(version);
        }
    }

    pub fn set_login_url(&mut self, login_url: Option<String>) {
        self.settings.login_url = login_url.clone();
        self.resources.set_login_url(login_url.clone());
        if let Some(api) = &mut self.code_flow {
            api.resources_mut().set_login_url(login_url.clone());
        }
        self.api.resources_mut().set_login_url(login_url);
    }

    pub fn set_max_pages(&mut self, max_pages: Option<usize>) {
        self.settings.max_pages = max_pages;
        self.api.set_page_limit(max_pages);
    }

    pub fn set_transport(&mut self, transport: Arc<T>) {
        self.transport = Arc::clone(&transport);
        if let Some(api) = &mut self.code_flow {
            api.set_transport(Arc::clone(&transport));
        }
        self.api.set_transport(transport);
    }

    /// Replace the session of the active API.
    pub fn set_auth(&mut self, auth: Option<Authentication>) {
        self.api.set_auth(auth);
    }

    /// Switch the default protocol. The session is carried over.
    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.settings.protocol = protocol;
        if self.api.protocol() != protocol {
            debug!(%protocol, "Switching protocol");
            self.api = self.select(protocol);
        }
    }

    /// An API for `protocol` sharing this facade's session and transport,
    /// for a one-off call in the other protocol.
    pub fn via(&self, protocol: Protocol) -> ProtocolApi<T> {
        if self.api.protocol() == protocol {
            self.api.clone()
        } else {
            self.select(protocol)
        }
    }

    fn select(&self, protocol: Protocol) -> ProtocolApi<T> {
        select_protocol(
            protocol,
            self.api.auth().cloned(),
            Arc::clone(&self.transport),
            self.resources.clone(),
        )
        .with_page_limit(self.settings.max_pages)
    }

    /// Authorization URL of the OAuth web server flow.
    ///
    /// Always REST. When SOAP is the default protocol a REST API is kept
    /// aside to finish the code exchange in [`authenticate`](Self::authenticate).
    pub fn get_auth_uri(&mut self, credentials: &Credentials) -> Result<String> {
        match &mut self.api {
            ProtocolApi::Rest(api) => api.get_auth_uri(credentials),
            ProtocolApi::Soap(_) => {
                let mut api = RestApi::new(Arc::clone(&self.transport), self.resources.clone());
                let uri = api.get_auth_uri(credentials)?;
                self.code_flow = Some(api);
                Ok(uri)
            }
        }
    }

    /// Obtain a session and install it on the active API.
    ///
    /// Credentials carrying a `code` finish the web server flow started by
    /// [`get_auth_uri`](Self::get_auth_uri) whatever the protocol.
    #[instrument(skip(self, credentials), fields(protocol = %self.protocol()))]
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<Authentication> {
        if credentials.code.is_some() {
            if let Some(mut api) = self.code_flow.take() {
                let result = api.authenticate(credentials).await;
                if result.is_err() {
                    // A failed exchange leaves the flow open for another code.
                    self.code_flow = Some(api);
                }
                let auth = result?;
                self.api.set_auth(Some(auth.clone()));
                return Ok(auth);
            }
            if let ProtocolApi::Soap(_) = self.api {
                return Err(Error::authentication_failed(
                    "You first need to use the get_auth_uri() to get the `code`",
                ));
            }
        }
        self.api.authenticate(credentials).await
    }

    pub async fn query(&self, soql: &str) -> Result<QueryResult<Value>> {
        self.api.query(soql).await
    }

    pub async fn query_all(&self, soql: &str) -> Result<QueryResult<Value>> {
        self.api.query_all(soql).await
    }

    pub async fn query_more(&self, cursor: &str) -> Result<QueryResult<Value>> {
        self.api.query_more(cursor).await
    }

    pub async fn search(&self, sosl: &str) -> Result<Value> {
        self.api.search(sosl).await
    }

    pub async fn quick_search(&self, term: &str) -> Result<Value> {
        self.api.quick_search(term).await
    }

    pub async fn get(&self, url: &str, params: Option<&[(&str, &str)]>) -> Result<Value> {
        self.api.get(url, params).await
    }

    pub async fn post(&self, target: &str, data: &Value) -> Result<Value> {
        self.api.post(target, data).await
    }

    /// Handle on one object type through the active protocol.
    ///
    /// The name must start with an ASCII letter and contain only letters,
    /// digits and underscores.
    pub fn sobject(&self, name: &str) -> Result<ObjectHandle<'_, T>> {
        if !names::is_valid_object_name(name) {
            return Err(Error::invalid_value(format!("Not a valid object name {}", name)));
        }
        Ok(self.api.sobject(name))
    }
}
