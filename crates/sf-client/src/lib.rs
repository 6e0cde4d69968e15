//! # sf-client
//!
//! Transport and wire-format infrastructure shared by the REST and SOAP
//! Salesforce clients.
//!
//! This crate provides:
//! - The [`Transport`] port and its reqwest-backed [`HttpTransport`]
//! - Response verification ([`dispatch`]) with one error vocabulary
//! - URL resolvers for `/services/data` and `/services/Soap/u`
//! - SOAP envelope construction and a small XML tree for reading replies
//! - [`QueryResult`] and cursor-following pagination
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Protocol APIs (sf-rest, sf-soap)               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  dispatch: status check, SOAPAction → raw, else JSON        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport (HttpTransport or any test double)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use tandem_sf_client::{dispatch, json_content_headers, HttpRequest, HttpTransport, RequestMethod};
//!
//! let transport = HttpTransport::default_transport()?;
//! let request = HttpRequest::new(RequestMethod::Get, "https://na1.salesforce.com/services/data/v45/limits/")
//!     .headers(json_content_headers(&token));
//! let limits = dispatch(&transport, request).await?.into_json()?;
//! ```

mod config;
mod error;
mod query;
mod request;
mod response;
pub mod security;
pub mod soap;
mod transport;
pub mod url;
pub mod xml;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use query::{follow_cursor, QueryResult};
pub use request::{json_content_headers, xml_content_headers, HttpRequest, RequestMethod, SOAP_ACTION};
pub use response::{RawResponse, Reply};
pub use transport::{dispatch, HttpTransport, Transport};
pub use url::{get_request_url, ResourceName, RestUrlResources, SoapUrlResources, UrlResources};
pub use xml::XmlNode;

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: f64 = 45.0;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("tandem-sf-api/", env!("CARGO_PKG_VERSION"));
