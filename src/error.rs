//! # Probe Error Types
//!
//! Unified error handling for the check library and the plugin binary.
//!
//! Two families live here. [`ProbeError`] aborts a check and is reported as
//! UNKNOWN. [`TransportFailure`] is captured as data at the HTTP boundary and
//! feeds node failover and the CRITICAL "not responding" verdict.

use thiserror::Error;

/// Probe operation result type
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that abort a check before a verdict can be computed
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid threshold range '{range}': {reason}")]
    InvalidThreshold { range: String, reason: String },

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to list connectors: {0}")]
    ListingFailed(TransportFailure),

    #[error("Timeout: check execution aborted after {seconds}s")]
    Timeout { seconds: u64 },
}

impl ProbeError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an invalid threshold error for a range expression
    pub fn invalid_threshold(range: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            range: range.into(),
            reason: reason.into(),
        }
    }
}

/// Transport-level failure of a single Kafka Connect request
///
/// Never raised above the API client; it travels inside
/// [`StatusProbe`](crate::api_clients::StatusProbe) instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportFailure {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out after {timeout_ms}ms: {detail}")]
    Timeout { timeout_ms: u64, detail: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl TransportFailure {
    /// Classify a reqwest error, keeping the full source chain as detail
    pub fn from_reqwest(error: &reqwest::Error, timeout_ms: u64) -> Self {
        let detail = error_chain(error);
        if error.is_timeout() {
            Self::Timeout { timeout_ms, detail }
        } else if error.is_connect() {
            Self::Connect(detail)
        } else if error.is_decode() || error.is_body() {
            Self::Decode(detail)
        } else {
            Self::Request(detail)
        }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut detail = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}
