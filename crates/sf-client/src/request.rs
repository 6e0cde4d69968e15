//! HTTP request building with Salesforce-specific headers.

use std::collections::HashMap;

use bytes::Bytes;
use serde::Serialize;

use crate::error::Result;

/// Header that marks a request as a SOAP call.
pub const SOAP_ACTION: &str = "SOAPAction";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Patch => reqwest::Method::PATCH,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Uppercase verb as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Patch => "PATCH",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verb-agnostic request handed to a [`Transport`](crate::Transport).
///
/// Query parameters are folded into `url` when they are added, so a
/// transport only ever sees method, URL, headers and an optional body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: RequestMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a new request without headers or body.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add several headers at once.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Append form-encoded query parameters to the URL.
    pub fn query<K: Serialize, V: Serialize>(mut self, params: &[(K, V)]) -> Result<Self> {
        if params.is_empty() {
            return Ok(self);
        }
        let encoded = serde_urlencoded::to_string(params)?;
        let separator = if self.url.contains('?') { '&' } else { '?' };
        self.url.push(separator);
        self.url.push_str(&encoded);
        Ok(self)
    }

    /// Set a JSON body. Content-Type is left to the caller's header set.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body)?;
        self.body = Some(Bytes::from(bytes));
        Ok(self)
    }

    /// Set a form-encoded body.
    pub fn form<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(data)?;
        self.body = Some(Bytes::from(encoded));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        Ok(self)
    }

    /// Set a serialized SOAP envelope as the body.
    pub fn xml(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Bytes::from(body.into()));
        self
    }

    /// Returns true if this request carries a `SOAPAction` header.
    pub fn is_soap(&self) -> bool {
        self.headers.contains_key(SOAP_ACTION)
    }
}

/// Headers for a REST call made with the given bearer token.
pub fn json_content_headers(access_token: &str) -> HashMap<String, String> {
    HashMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        (
            "Authorization".to_string(),
            format!("Bearer {}", access_token),
        ),
        ("X-PrettyPrint".to_string(), "1".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ])
}

/// Headers for a SOAP call whose serialized envelope is `length` bytes long.
pub fn xml_content_headers(length: usize, action: &str) -> HashMap<String, String> {
    HashMap::from([
        ("Content-Type".to_string(), "text/xml".to_string()),
        ("charset".to_string(), "utf-8".to_string()),
        ("Content-length".to_string(), length.to_string()),
        (SOAP_ACTION.to_string(), action.to_string()),
    ])
}
