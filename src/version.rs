//! API version discovery.

use serde::Deserialize;
use tracing::{debug, instrument};

use tandem_sf_client::{
    dispatch, Error, ErrorKind, HttpRequest, RequestMethod, Result, Transport,
};

/// Version list used when none is configured.
pub const VERSIONS_URL: &str = "http://na1.salesforce.com/services/data/";

/// One entry of the version list.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiVersion {
    pub version: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// The highest version the server advertises.
///
/// Entries whose `version` is not numeric are ignored. An empty list fails
/// with `InvalidResponse`.
#[instrument(skip(transport))]
pub async fn latest_version<T: Transport + ?Sized>(transport: &T, url: &str) -> Result<f64> {
    let request =
        HttpRequest::new(RequestMethod::Get, url).header("Accept", "application/json");
    let value = dispatch(transport, request).await?.into_json()?;
    let versions: Vec<ApiVersion> = serde_json::from_value(value)?;

    let latest = versions
        .iter()
        .filter_map(|entry| entry.version.parse::<f64>().ok())
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))));

    match latest {
        Some(version) => {
            debug!(version, available = versions.len(), "Discovered API version");
            Ok(version)
        }
        None => Err(Error::new(ErrorKind::InvalidResponse(
            "version list has no usable entry".to_string(),
        ))),
    }
}
