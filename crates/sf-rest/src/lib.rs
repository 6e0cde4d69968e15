//! # sf-rest
//!
//! Salesforce REST API client: SOQL query with cursor pagination, SOSL
//! search, generic GET/POST and per-object CRUD.
//!
//! ## Features
//!
//! - **SOQL Query** - `query`, `query_more`, and `query_all` which follows
//!   `nextRecordsUrl` until the last page (with an optional page cap)
//! - **SOSL Search** - `search` and `quick_search`
//! - **SObject CRUD** - `describe`, `create`, `update`, `delete` through
//!   [`RestSObject`]
//! - **OAuth** - username-password and web server flows
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use serde_json::json;
//! use tandem_sf_auth::Credentials;
//! use tandem_sf_client::{HttpTransport, UrlResources};
//! use tandem_sf_rest::RestApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tandem_sf_rest::Error> {
//!     let transport = Arc::new(HttpTransport::default_transport()?);
//!     let mut api = RestApi::new(transport, UrlResources::for_environment(false, 45.0));
//!     api.authenticate(&Credentials::from_env()).await?;
//!
//!     // Query
//!     let accounts = api
//!         .query_all::<serde_json::Value>("SELECT Id, Name FROM Account")
//!         .await?;
//!
//!     // Create
//!     let account = api.sobject("Account");
//!     let created = account.create(&json!({"Name": "New Account"})).await?;
//!     let id = created["id"].as_str().unwrap_or_default();
//!
//!     // Update
//!     account.update(&json!([id, {"Name": "Updated"}])).await?;
//!
//!     // Delete
//!     account.delete(id).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod sobject;

pub use client::RestApi;
pub use sobject::RestSObject;
pub use tandem_sf_client::{Error, ErrorKind, QueryResult, Result};
