//! Protocol selection and the operations both protocols share.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use tandem_sf_auth::{ensure_authenticated, Authentication, Credentials};
use tandem_sf_client::{Error, HttpTransport, QueryResult, Result, Transport, UrlResources};
use tandem_sf_rest::RestApi;
use tandem_sf_soap::{Action, SoapApi};

use crate::handle::ObjectHandle;

/// Wire protocol used for data operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[default]
    Rest,
    Soap,
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(protocol: &str) -> Result<Self> {
        match protocol.to_ascii_lowercase().as_str() {
            "rest" => Ok(Protocol::Rest),
            "soap" => Ok(Protocol::Soap),
            other => Err(Error::invalid_value(format!("Not a valid protocol {}", other))),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Rest => f.write_str("rest"),
            Protocol::Soap => f.write_str("soap"),
        }
    }
}

/// Build a fresh API for `protocol`, carrying the session and transport over.
///
/// The caller's API is never touched; switching protocols means replacing
/// it with the returned value.
pub fn select_protocol<T: Transport>(
    protocol: Protocol,
    auth: Option<Authentication>,
    transport: Arc<T>,
    resources: UrlResources,
) -> ProtocolApi<T> {
    match protocol {
        Protocol::Rest => ProtocolApi::Rest(RestApi::new(transport, resources).with_auth(auth)),
        Protocol::Soap => ProtocolApi::Soap(SoapApi::new(transport, resources).with_auth(auth)),
    }
}

/// Either protocol API behind one set of operations.
///
/// Query-family calls return [`QueryResult`] on both protocols. Search
/// results and SOAP replies are returned as JSON (`SoapEnvelope::to_value`
/// for SOAP).
#[derive(Debug)]
pub enum ProtocolApi<T: Transport = HttpTransport> {
    Rest(RestApi<T>),
    Soap(SoapApi<T>),
}

impl<T: Transport> Clone for ProtocolApi<T> {
    fn clone(&self) -> Self {
        match self {
            ProtocolApi::Rest(api) => ProtocolApi::Rest(api.clone()),
            ProtocolApi::Soap(api) => ProtocolApi::Soap(api.clone()),
        }
    }
}

impl<T: Transport> ProtocolApi<T> {
    pub fn protocol(&self) -> Protocol {
        match self {
            ProtocolApi::Rest(_) => Protocol::Rest,
            ProtocolApi::Soap(_) => Protocol::Soap,
        }
    }

    pub fn with_page_limit(self, page_limit: Option<usize>) -> Self {
        match self {
            ProtocolApi::Rest(api) => ProtocolApi::Rest(api.with_page_limit(page_limit)),
            ProtocolApi::Soap(api) => ProtocolApi::Soap(api.with_page_limit(page_limit)),
        }
    }

    pub fn auth(&self) -> Option<&Authentication> {
        match self {
            ProtocolApi::Rest(api) => api.auth(),
            ProtocolApi::Soap(api) => api.auth(),
        }
    }

    pub fn set_auth(&mut self, auth: Option<Authentication>) {
        match self {
            ProtocolApi::Rest(api) => api.set_auth(auth),
            ProtocolApi::Soap(api) => api.set_auth(auth),
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        match self {
            ProtocolApi::Rest(api) => api.transport(),
            ProtocolApi::Soap(api) => api.transport(),
        }
    }

    pub fn set_transport(&mut self, transport: Arc<T>) {
        match self {
            ProtocolApi::Rest(api) => api.set_transport(transport),
            ProtocolApi::Soap(api) => api.set_transport(transport),
        }
    }

    pub fn resources(&self) -> &UrlResources {
        match self {
            ProtocolApi::Rest(api) => api.resources(),
            ProtocolApi::Soap(api) => api.resources(),
        }
    }

    pub fn resources_mut(&mut self) -> &mut UrlResources {
        match self {
            ProtocolApi::Rest(api) => api.resources_mut(),
            ProtocolApi::Soap(api) => api.resources_mut(),
        }
    }

    pub fn set_page_limit(&mut self, page_limit: Option<usize>) {
        match self {
            ProtocolApi::Rest(api) => api.set_page_limit(page_limit),
            ProtocolApi::Soap(api) => api.set_page_limit(page_limit),
        }
    }

    /// OAuth for REST, SOAP login for SOAP.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<Authentication> {
        match self {
            ProtocolApi::Rest(api) => api.authenticate(credentials).await,
            ProtocolApi::Soap(api) => api.authenticate(credentials).await,
        }
    }

    pub async fn query(&self, soql: &str) -> Result<QueryResult<Value>> {
        match self {
            ProtocolApi::Rest(api) => api.query(soql).await,
            ProtocolApi::Soap(api) => api.query(soql).await,
        }
    }

    pub async fn query_all(&self, soql: &str) -> Result<QueryResult<Value>> {
        match self {
            ProtocolApi::Rest(api) => api.query_all(soql).await,
            ProtocolApi::Soap(api) => api.query_all(soql).await,
        }
    }

    /// `cursor` is a `nextRecordsUrl` (REST) or a query locator (SOAP).
    pub async fn query_more(&self, cursor: &str) -> Result<QueryResult<Value>> {
        match self {
            ProtocolApi::Rest(api) => api.query_more(cursor).await,
            ProtocolApi::Soap(api) => api.query_more(cursor).await,
        }
    }

    pub async fn search(&self, sosl: &str) -> Result<Value> {
        match self {
            ProtocolApi::Rest(api) => api.search(sosl).await,
            ProtocolApi::Soap(api) => api.search(sosl).await?.to_value(),
        }
    }

    pub async fn quick_search(&self, term: &str) -> Result<Value> {
        match self {
            ProtocolApi::Rest(api) => api.quick_search(term).await,
            ProtocolApi::Soap(api) => api.quick_search(term).await?.to_value(),
        }
    }

    /// Generic GET. Only REST has one; SOAP fails with `InvalidValue`
    /// once the session check passes.
    pub async fn get(&self, url: &str, params: Option<&[(&str, &str)]>) -> Result<Value> {
        match self {
            ProtocolApi::Rest(api) => api.get(url, params).await,
            ProtocolApi::Soap(api) => api.get(url, params).await,
        }
    }

    /// Generic POST.
    ///
    /// For REST `target` is a resource URL and `data` the JSON body. For
    /// SOAP `target` names an [`Action`] and `data` must be the string
    /// payload (query, locator or search).
    pub async fn post(&self, target: &str, data: &Value) -> Result<Value> {
        match self {
            ProtocolApi::Rest(api) => api.post(target, data).await,
            ProtocolApi::Soap(api) => {
                ensure_authenticated(api.auth())?;
                let action: Action = target.parse()?;
                let payload = data.as_str().ok_or_else(|| {
                    Error::type_mismatch(format!("`{}` requires a string payload", action))
                })?;
                api.post(payload, action).await?.to_value()
            }
        }
    }

    /// Handle on one object type. The name is not validated here.
    pub fn sobject(&self, name: impl Into<String>) -> ObjectHandle<'_, T> {
        match self {
            ProtocolApi::Rest(api) => ObjectHandle::Rest(api.sobject(name)),
            ProtocolApi::Soap(api) => ObjectHandle::Soap(api.sobject(name)),
        }
    }
}

impl<T: Transport> From<RestApi<T>> for ProtocolApi<T> {
    fn from(api: RestApi<T>) -> Self {
        ProtocolApi::Rest(api)
    }
}

impl<T: Transport> From<SoapApi<T>> for ProtocolApi<T> {
    fn from(api: SoapApi<T>) -> Self {
        ProtocolApi::Soap(api)
    }
}
