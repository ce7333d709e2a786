//! API Client Modules
//!
//! HTTP client for the Kafka Connect REST API and the [`ConnectApi`] seam the
//! node selector and listing mode are written against.

pub mod connect_client;

pub use connect_client::{ConnectApi, ConnectApiClient, ConnectApiConfig, StatusProbe};
