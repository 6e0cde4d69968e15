//! The SOAP (partner) protocol API.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use tandem_sf_auth::{ensure_authenticated, Authentication, Credentials, SoapLogin};
use tandem_sf_client::{
    dispatch, follow_cursor, get_request_url, soap, xml_content_headers, Error, HttpRequest,
    HttpTransport, QueryResult, RequestMethod, Result, SoapUrlResources, Transport, UrlResources,
};

use crate::envelope::SoapEnvelope;
use crate::sobject::SoapSObject;

/// Calls accepted by [`SoapApi::post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Query,
    QueryAll,
    QueryMore,
    Search,
}

impl Action {
    /// The partner API method name, also sent as `SOAPAction`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Query => "query",
            Action::QueryAll => "queryAll",
            Action::QueryMore => "queryMore",
            Action::Search => "search",
        }
    }

    fn body(&self, data: &str) -> String {
        match self {
            Action::Query | Action::QueryAll => soap::query_body(data),
            Action::QueryMore => soap::query_more_body(data),
            Action::Search => soap::search_body(data),
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(action: &str) -> Result<Self> {
        match action {
            "query" => Ok(Action::Query),
            "queryAll" => Ok(Action::QueryAll),
            "queryMore" => Ok(Action::QueryMore),
            "search" => Ok(Action::Search),
            other => Err(Error::invalid_value(format!(
                "`action` {} is not supported!",
                other
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Salesforce SOAP (partner) API client.
///
/// Every call is a POST of a session-bearing envelope to
/// `/services/Soap/u/{version}`. Query-family replies are decoded into the
/// same [`QueryResult`] the REST client returns.
#[derive(Debug)]
pub struct SoapApi<T: Transport = HttpTransport> {
    auth: Option<Authentication>,
    resources: SoapUrlResources,
    transport: Arc<T>,
    page_limit: Option<usize>,
}

impl<T: Transport> Clone for SoapApi<T> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            resources: self.resources.clone(),
            transport: Arc::clone(&self.transport),
            page_limit: self.page_limit,
        }
    }
}

impl<T: Transport> SoapApi<T> {
    pub fn new(transport: Arc<T>, resources: UrlResources) -> Self {
        Self {
            auth: None,
            resources: SoapUrlResources::new(resources),
            transport,
            page_limit: None,
        }
    }

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

    pub fn page_limit(&self) -> Option<usize> {
        self.page_limit
    }

    pub fn set_page_limit(&mut self, page_limit: Option<usize>) {
        self.page_limit = page_limit;
    }

    /// Log in with username and password.
    #[instrument(skip(self, credentials))]
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<Authentication> {
        let auth = SoapLogin::new(credentials)?
            .authenticate(self.transport.as_ref(), self.resources.resources())
            .await?;
        self.auth = Some(auth.clone());
        Ok(auth)
    }

    /// Run a SOQL query and return the first page.
    #[instrument(skip(self))]
    pub async fn query(&self, soql: &str) -> Result<QueryResult<Value>> {
        self.post(soql, Action::Query).await?.query_result()
    }

    /// Run `queryAll` and follow the query locator until the last page.
    #[instrument(skip(self))]
    pub async fn query_all(&self, soql: &str) -> Result<QueryResult<Value>> {
        let first = self.post(soql, Action::QueryAll).await?.query_result()?;

        follow_cursor(first, self.page_limit, move |locator| async move {
            self.query_more(&locator).await
        })
        .await
    }

    /// Fetch the page a query locator points at.
    #[instrument(skip(self))]
    pub async fn query_more(&self, locator: &str) -> Result<QueryResult<Value>> {
        self.post(locator, Action::QueryMore).await?.query_result()
    }

    /// Run a SOSL search.
    #[instrument(skip(self))]
    pub async fn search(&self, sosl: &str) -> Result<SoapEnvelope> {
        self.post(sosl, Action::Search).await
    }

    /// Search every searchable field for `term`.
    pub async fn quick_search(&self, term: &str) -> Result<SoapEnvelope> {
        self.search(&format!("FIND {{{}}}", term)).await
    }

    /// Wrap `data` in the body for `action` and POST it.
    #[instrument(skip(self, data), fields(action = %action))]
    pub async fn post(&self, data: &str, action: Action) -> Result<SoapEnvelope> {
        let auth = self.session()?;
        self.call(auth, action.as_str(), &action.body(data)).await
    }

    /// The partner API has no generic GET; this only checks the session.
    pub async fn get(&self, _url: &str, _params: Option<&[(&str, &str)]>) -> Result<Value> {
        self.session()?;
        Err(Error::invalid_value("`get` is not supported by the SOAP API"))
    }

    /// Handle on one object type, e.g. `api.sobject("Account")`.
    pub fn sobject(&self, name: impl Into<String>) -> SoapSObject<'_, T> {
        SoapSObject::new(self, name.into())
    }

    pub(crate) fn session(&self) -> Result<&Authentication> {
        ensure_authenticated(self.auth.as_ref())
    }

    /// Send one envelope for `method` carrying the `request` fragment.
    pub(crate) async fn call(
        &self,
        auth: &Authentication,
        method: &str,
        request: &str,
    ) -> Result<SoapEnvelope> {
        let envelope = soap::request_envelope(auth.access_token(), method, request);
        let url = get_request_url(
            &self.resources.full_resource_url(auth.instance_url()),
            auth.instance_url(),
            &self.resources.resource_url(),
        );

        let request = HttpRequest::new(RequestMethod::Post, url)
            .headers(xml_content_headers(envelope.len(), method))
            .xml(envelope);

        let response = dispatch(self.transport.as_ref(), request).await?.into_raw()?;
        Ok(SoapEnvelope::new(response.text()))
    }
}
