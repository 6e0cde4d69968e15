//! # sf-soap
//!
//! Salesforce SOAP (partner) API client.
//!
//! Queries, searches and per-object CRUD are sent as envelopes carrying a
//! `SessionHeader`. Query-family replies decode to the same
//! [`QueryResult`] the REST client returns; other replies come back as a
//! [`SoapEnvelope`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use serde_json::json;
//! use tandem_sf_auth::Credentials;
//! use tandem_sf_client::{HttpTransport, UrlResources};
//! use tandem_sf_soap::SoapApi;
//!
//! let transport = Arc::new(HttpTransport::default_transport()?);
//! let mut api = SoapApi::new(transport, UrlResources::for_environment(false, 45.0));
//! api.authenticate(&Credentials::for_user("user@example.com", "password+token")).await?;
//!
//! let accounts = api.query_all("SELECT Id, Name FROM Account").await?;
//! api.sobject("Account").create(&json!([{"Name": "Acme"}])).await?;
//! ```

mod client;
mod envelope;
mod sobject;

pub use client::{Action, SoapApi};
pub use envelope::SoapEnvelope;
pub use sobject::{SObjectAction, SoapSObject};
pub use tandem_sf_client::{Error, ErrorKind, QueryResult, Result};
