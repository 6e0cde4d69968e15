//! The transport port and its reqwest-backed implementation.

use std::collections::HashMap;
use std::future::Future;

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::HttpRequest;
use crate::response::{RawResponse, Reply};

/// Anything that can carry an [`HttpRequest`] to the server and hand back
/// the raw response.
///
/// Implementations must not interpret status codes; verification happens in
/// [`dispatch`].
pub trait Transport: Send + Sync {
    /// Execute a single request.
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// Production transport built on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a transport with default configuration.
    pub fn default_transport() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), &request.url);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();

        if self.config.enable_tracing {
            let content_length = response.content_length();
            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await?;

        Ok(RawResponse::new(status, headers, body))
    }
}

/// Send a request and verify the response.
///
/// A status of 300 or more becomes [`ErrorKind::RequestFailed`]. Requests
/// carrying a `SOAPAction` header get the raw response back, everything
/// else is decoded as JSON.
#[instrument(skip(transport, request), fields(method = %request.method, url = %request.url))]
pub async fn dispatch<T: Transport + ?Sized>(transport: &T, request: HttpRequest) -> Result<Reply> {
    debug!("Sending request");
    let soap = request.is_soap();
    let response = transport.execute(request).await?;
    response.into_reply(soap)
}
