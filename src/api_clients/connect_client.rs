//! # Kafka Connect API Client
//!
//! HTTP client for the Kafka Connect REST API. Provides the connector status
//! lookup used by the check and the connector listing used by `--list`.
//!
//! Transport failures are returned as [`TransportFailure`] values rather than
//! errors so the node selector can fail over to the next candidate.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::{TransportConfig, DEFAULT_REQUEST_TIMEOUT_MS};
use crate::error::{ProbeError, ProbeResult, TransportFailure};

/// Configuration for the Kafka Connect API client
#[derive(Debug, Clone)]
pub struct ConnectApiConfig {
    /// Scheme prepended to base URLs given without one
    pub scheme: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// User-Agent override
    pub user_agent: Option<String>,
}

impl Default for ConnectApiConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: None,
        }
    }
}

impl From<&TransportConfig> for ConnectApiConfig {
    fn from(config: &TransportConfig) -> Self {
        Self {
            scheme: config.scheme.clone(),
            timeout_ms: config.request_timeout_ms,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Result of one connector status request
#[derive(Debug, Clone, PartialEq)]
pub struct StatusProbe {
    /// Parsed JSON document, or the failure that prevented getting one
    pub body: Result<Value, TransportFailure>,
    /// Wall-clock seconds spent on the request, millisecond precision
    pub latency_secs: f64,
}

/// Operations the check needs from a Kafka Connect node
#[async_trait]
pub trait ConnectApi: Send + Sync {
    /// GET `/connectors/{connector}/status` on `base_url`
    async fn get_status(&self, base_url: &str, connector: &str) -> StatusProbe;

    /// GET `/connectors` on `base_url`
    async fn list_connectors(&self, base_url: &str) -> Result<Vec<String>, TransportFailure>;
}

/// HTTP client for Kafka Connect API operations
pub struct ConnectApiClient {
    client: Client,
    config: ConnectApiConfig,
}

impl std::fmt::Debug for ConnectApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectApiClient")
            .field("scheme", &self.config.scheme)
            .field("timeout_ms", &self.config.timeout_ms)
            .finish()
    }
}

impl ConnectApiClient {
    /// Create new Kafka Connect API client with the given configuration
    pub fn new(config: ConnectApiConfig) -> ProbeResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("check-kafka-connector/{}", env!("CARGO_PKG_VERSION")));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(user_agent)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ProbeError::HttpClient(e.to_string()))?;

        info!(
            "Created ConnectApiClient with scheme: {}, timeout: {}ms",
            config.scheme, config.timeout_ms
        );

        Ok(Self { client, config })
    }

    /// Get the configured timeout in milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }

    /// Build the URL of `segments` below a candidate base URL
    ///
    /// Candidates are normally given as `host:port`; one that already carries
    /// a scheme is used as is. Each segment is percent-encoded, so a connector
    /// name cannot escape its path segment.
    pub fn endpoint(&self, base_url: &str, segments: &[&str]) -> Result<Url, TransportFailure> {
        let base = base_url.trim_end_matches('/');
        let base = if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            format!("{}://{}", self.config.scheme, base)
        };

        let invalid = |reason: String| {
            TransportFailure::Request(format!("Invalid node URL '{}': {}", base_url, reason))
        };
        let mut url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, TransportFailure> {
        debug!("Sending GET request to: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportFailure::from_reqwest(&e, self.config.timeout_ms))?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Received response");

        let text = response
            .text()
            .await
            .map_err(|e| TransportFailure::from_reqwest(&e, self.config.timeout_ms))?;

        // Kafka Connect reports errors such as 404 with a JSON body, which the
        // evaluator turns into a "not found" verdict
        serde_json::from_str(&text).map_err(|e| {
            TransportFailure::Decode(format!("HTTP {} with non-JSON body: {}", status, e))
        })
    }
}

#[async_trait]
impl ConnectApi for ConnectApiClient {
    async fn get_status(&self, base_url: &str, connector: &str) -> StatusProbe {
        let start = Instant::now();
        let body = match self.endpoint(base_url, &["connectors", connector, "status"]) {
            Ok(url) => self.get_json(url).await,
            Err(failure) => Err(failure),
        };
        let latency_secs = round_millis(start.elapsed().as_secs_f64());

        debug!(
            node = %base_url,
            connector = %connector,
            ok = body.is_ok(),
            latency_secs,
            "Connector status request finished"
        );

        StatusProbe { body, latency_secs }
    }

    async fn list_connectors(&self, base_url: &str) -> Result<Vec<String>, TransportFailure> {
        let url = self.endpoint(base_url, &["connectors"])?;
        let document = self.get_json(url).await?;

        let connectors: Vec<String> = serde_json::from_value(document)
            .map_err(|e| TransportFailure::Decode(format!("expected list of names: {}", e)))?;

        info!("Retrieved {} connectors", connectors.len());
        Ok(connectors)
    }
}

/// Round seconds to millisecond precision
#[must_use]
pub fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
