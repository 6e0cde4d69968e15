//! The REST protocol API.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use tandem_sf_auth::{ensure_authenticated, Authentication, Credentials, RestLogin};
use tandem_sf_client::{
    dispatch, follow_cursor, get_request_url, json_content_headers, Error, HttpRequest,
    HttpTransport, QueryResult, RequestMethod, ResourceName, RestUrlResources, Result, Transport,
    UrlResources,
};

use crate::sobject::RestSObject;

/// Salesforce REST API client.
///
/// Owns the session, the `/services/data` resolver and a shared transport.
/// Every data operation requires a prior [`authenticate`](Self::authenticate)
/// (or an injected session via [`set_auth`](Self::set_auth)) and fails with
/// `AuthenticationFailed` otherwise.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tandem_sf_rest::RestApi;
/// use tandem_sf_auth::Credentials;
/// use tandem_sf_client::{HttpTransport, UrlResources};
///
/// let transport = Arc::new(HttpTransport::default_transport()?);
/// let mut api = RestApi::new(transport, UrlResources::for_environment(false, 45.0));
/// api.authenticate(&Credentials::from_env()).await?;
///
/// let accounts = api.query_all::<serde_json::Value>("SELECT Id, Name FROM Account").await?;
/// let id = api.sobject("Account").create(&json!({"Name": "Acme"})).await?;
/// ```
#[derive(Debug)]
pub struct RestApi<T: Transport = HttpTransport> {
    auth: Option<Authentication>,
    resources: RestUrlResources,
    transport: Arc<T>,
    login: Option<RestLogin>,
    page_limit: Option<usize>,
}

impl<T: Transport> Clone for RestApi<T> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            resources: self.resources.clone(),
            transport: Arc::clone(&self.transport),
            login: self.login.clone(),
            page_limit: self.page_limit,
        }
    }
}

impl<T: Transport> RestApi<T> {
    /// Create an unauthenticated API over `transport`.
    pub fn new(transport: Arc<T>, resources: UrlResources) -> Self {
        Self {
            auth: None,
            resources: RestUrlResources::new(resources),
            transport,
            login: None,
            page_limit: None,
        }
    }

    /// Carry an existing session into this API.
    pub fn with_auth(mut self, auth: Option<Authentication>) -> Self {
        self.auth = auth;
        self
    }

    /// Cap the number of pages `query_all` may read. `None` is unbounded.
    pub fn with_page_limit(mut self, page_limit: Option<usize>) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn auth(&self) -> Option<&Authentication> {
        self.auth.as_ref()
    }

    /// Replace the session. No merging with the previous one.
    pub fn set_auth(&mut self, auth: Option<Authentication>) {
        self.auth = auth;
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn set_transport(&mut self, transport: Arc<T>) {
        self.transport = transport;
    }

    pub fn resources(&self) -> &UrlResources {
        self.resources.resources()
    }

    pub fn resources_mut(&mut self) -> &mut UrlResources {
        self.resources.resources_mut()
    }

    pub fn url_resources(&self) -> &RestUrlResources {
        &self.resources
    }

    pub fn page_limit(&self) -> Option<usize> {
        self.page_limit
    }

    pub fn set_page_limit(&mut self, page_limit: Option<usize>) {
        self.page_limit = page_limit;
    }

    /// Build the web server flow login and return the URL the user visits
    /// to obtain a `code`.
    ///
    /// The login is kept so that a later `authenticate` with the code can
    /// finish the exchange.
    pub fn get_auth_uri(&mut self, credentials: &Credentials) -> Result<String> {
        let login = RestLogin::new(credentials)?;
        let uri = login.authorization_uri(self.resources.resources())?;
        self.login = Some(login);
        Ok(uri)
    }

    /// Obtain a session through OAuth.
    ///
    /// With a `code` in the credentials the login built by
    /// [`get_auth_uri`](Self::get_auth_uri) is reused; otherwise a new login
    /// is built from the credentials.
    #[instrument(skip(self, credentials))]
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<Authentication> {
        let login = match credentials.code {
            Some(_) => self.login.take().ok_or_else(|| {
                Error::authentication_failed(
                    "You first need to use the get_auth_uri() to get the `code`",
                )
            })?,
            None => RestLogin::new(credentials)?,
        };

        let result = login
            .authenticate(
                self.transport.as_ref(),
                self.resources.resources(),
                credentials.code.as_deref(),
            )
            .await;
        self.login = Some(login);

        let auth = result?;
        self.auth = Some(auth.clone());
        Ok(auth)
    }

    /// Run a SOQL query and return the first page.
    #[instrument(skip(self))]
    pub async fn query<R: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<R>> {
        let auth = self.session()?;
        let url = self
            .resources
            .full_resource_url(auth.instance_url(), ResourceName::Query);
        let value = self.get(&url, Some(&[("q", soql)][..])).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Run a SOQL query against `queryAll` (deleted and archived rows
    /// included) and follow `nextRecordsUrl` until the last page.
    ///
    /// `total_size` is summed over all pages and records keep arrival order.
    #[instrument(skip(self))]
    pub async fn query_all<R: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<R>> {
        let auth = self.session()?;
        let url = self
            .resources
            .full_resource_url(auth.instance_url(), ResourceName::QueryAll);
        let value = self.get(&url, Some(&[("q", soql)][..])).await?;
        let first: QueryResult<R> = serde_json::from_value(value)?;

        follow_cursor(first, self.page_limit, move |cursor| async move {
            self.query_more::<R>(&cursor).await
        })
        .await
    }

    /// Fetch one continuation page.
    ///
    /// A cursor under the versioned base path (with or without the
    /// instance URL) is followed as is. Anything else is taken as a suffix
    /// of the query resource.
    #[instrument(skip(self))]
    pub async fn query_more<R: DeserializeOwned>(&self, cursor: &str) -> Result<QueryResult<R>> {
        let auth = self.session()?;
        let url = self.cursor_url(auth.instance_url(), cursor);
        let value = self.get(&url, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Run a SOSL search.
    #[instrument(skip(self))]
    pub async fn search(&self, sosl: &str) -> Result<Value> {
        let auth = self.session()?;
        let url = self
            .resources
            .full_resource_url(auth.instance_url(), ResourceName::Search);
        self.get(&url, Some(&[("q", sosl)][..])).await
    }

    /// Search every searchable field for `term`.
    pub async fn quick_search(&self, term: &str) -> Result<Value> {
        self.search(&format!("FIND {{{}}}", term)).await
    }

    /// GET any REST resource.
    ///
    /// `url` may be absolute, server-relative or a bare suffix of the
    /// versioned base path.
    #[instrument(skip(self, params))]
    pub async fn get(&self, url: &str, params: Option<&[(&str, &str)]>) -> Result<Value> {
        let auth = self.session()?;
        let mut request = HttpRequest::new(RequestMethod::Get, self.request_url(auth, url));
        if let Some(params) = params {
            request = request.query(params)?;
        }
        self.send(auth, request).await
    }

    /// POST a JSON body to any REST resource.
    #[instrument(skip(self, data))]
    pub async fn post(&self, url: &str, data: &Value) -> Result<Value> {
        let auth = self.session()?;
        let request = HttpRequest::new(RequestMethod::Post, self.request_url(auth, url)).json(data)?;
        self.send(auth, request).await
    }

    /// Handle on one object type, e.g. `api.sobject("Account")`.
    ///
    /// Handles are cheap and built per call.
    pub fn sobject(&self, name: impl Into<String>) -> RestSObject<'_, T> {
        RestSObject::new(self, name.into())
    }

    pub(crate) fn session(&self) -> Result<&Authentication> {
        ensure_authenticated(self.auth.as_ref())
    }

    pub(crate) fn request_url(&self, auth: &Authentication, url: &str) -> String {
        get_request_url(url, auth.instance_url(), &self.resources.resource_url())
    }

    pub(crate) async fn send(&self, auth: &Authentication, request: HttpRequest) -> Result<Value> {
        let request = request.headers(json_content_headers(auth.access_token()));
        dispatch(self.transport.as_ref(), request).await?.into_json()
    }

    fn cursor_url(&self, instance_url: &str, cursor: &str) -> String {
        let base = self.resources.resource_url();
        if cursor.starts_with(&base) || cursor.starts_with(&format!("{}{}", instance_url, base)) {
            get_request_url(cursor, instance_url, &base)
        } else {
            let query_url = self
                .resources
                .full_resource_url(instance_url, ResourceName::Query);
            debug!(cursor, "Resolving cursor against the query resource");
            format!("{}{}", query_url, cursor.trim_start_matches('/'))
        }
    }
}
