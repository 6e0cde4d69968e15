//! Transport configuration.

use std::time::Duration;

/// Settings the [`HttpTransport`](crate::HttpTransport) hands to its
/// `reqwest::Client`.
///
/// The transport never retries; a REST or SOAP call that times out
/// surfaces as `ErrorKind::Timeout` to the caller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole round trip, login exchanges and query pages alike.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// How long a pooled connection to an instance may sit unused.
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    /// Sent on REST, SOAP and OAuth requests.
    pub user_agent: String,
    /// Advertise gzip and deflate. Large `describe` and query pages shrink a
    /// lot; reqwest decodes before `RawResponse` sees the body.
    pub accept_compressed: bool,
    /// Log the status and length of every reply: `debug` on success, `info`
    /// otherwise. Bodies and headers are never logged.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: crate::USER_AGENT.to_string(),
            accept_compressed: true,
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`], starting from the defaults.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Toggle `Accept-Encoding: gzip, deflate`.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.accept_compressed = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Replace the default `tandem-sf-api/<version>` agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Toggle the per-reply status events of the transport.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert!(config.accept_compressed);
        assert!(config.user_agent.starts_with("tandem-sf-api/"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .with_timeout(Duration::from_secs(60))
            .with_compression(false)
            .with_user_agent("custom-agent/1.0")
            .with_tracing(false)
            .build();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(!config.accept_compressed);
        assert_eq!(config.user_agent, "custom-agent/1.0");
        assert!(!config.enable_tracing);
    }
}
