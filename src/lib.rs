//! # Kafka Connect Connector Check
//!
//! Monitoring plugin library that probes a Kafka Connect REST API, evaluates the
//! status of a single connector and renders a Nagios-compatible verdict.
//! The `check_kafka_connector` binary is a thin CLI over [`plugin`].

pub mod api_clients;
pub mod check;
pub mod config;
pub mod error;
pub mod logging;
pub mod node_selector;
pub mod plugin;

// Re-export commonly used types for convenience
pub use api_clients::{ConnectApi, ConnectApiClient, ConnectApiConfig, StatusProbe};
pub use check::{Outcome, ServiceState, StateExt, ThresholdSet};
pub use config::ProbeConfig;
pub use error::{ProbeError, ProbeResult, TransportFailure};
pub use plugin::{CheckOutcome, CheckRequest};
