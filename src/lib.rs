//! # tandem-sf-api
//!
//! A Salesforce client speaking both the REST and the SOAP (partner) API
//! behind one facade.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets, passwords) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//! - Every value interpolated into a SOAP envelope is XML-escaped
//!
//! ## Crates
//!
//! - **tandem-sf-client** - Transport, response verification, URL resolvers, SOAP envelopes, pagination
//! - **tandem-sf-auth** - Session state, OAuth 2.0 flows and SOAP login
//! - **tandem-sf-rest** - REST API: query, search, SObject CRUD
//! - **tandem-sf-soap** - SOAP API: query, search, SObject CRUD
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tandem_sf_api::{Credentials, HttpTransport, Protocol, SalesForce, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tandem_sf_api::Error> {
//!     let transport = Arc::new(HttpTransport::default_transport()?);
//!     let mut sf = SalesForce::connect(transport, Settings::new()).await?;
//!     sf.authenticate(&Credentials::from_env()).await?;
//!
//!     let accounts = sf.query_all("SELECT Id, Name FROM Account").await?;
//!     for account in &accounts.records {
//!         println!("{}", account["Name"]);
//!     }
//!
//!     // Same query through the partner API, session carried over
//!     let soap = sf.via(Protocol::Soap).query("SELECT Id FROM Account").await?;
//!     println!("{} accounts", soap.total_size);
//!
//!     Ok(())
//! }
//! ```

mod facade;
mod handle;
mod protocol;
mod version;

pub use facade::{SalesForce, Settings};
pub use handle::ObjectHandle;
pub use protocol::{select_protocol, Protocol, ProtocolApi};
pub use version::{latest_version, ApiVersion, VERSIONS_URL};

// Re-export all crates for convenient access
pub use tandem_sf_auth as auth;
pub use tandem_sf_client as client;
pub use tandem_sf_rest as rest;
pub use tandem_sf_soap as soap;

// Re-export commonly used types at the top level
pub use tandem_sf_auth::{Authentication, Credentials};
pub use tandem_sf_client::{
    ClientConfig, Error, ErrorKind, HttpTransport, QueryResult, Result, Transport, UrlResources,
};
