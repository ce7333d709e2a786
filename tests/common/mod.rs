//! Shared fixtures for integration tests: an in-process fake Kafka Connect node.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use check_kafka_connector::{ConnectApiClient, ConnectApiConfig};

/// What the fake node serves
#[derive(Debug, Clone, Default)]
pub struct FakeConnect {
    pub connectors: Vec<String>,
    pub statuses: HashMap<String, Value>,
    /// Serve this raw text instead of JSON status documents
    pub raw_body: Option<String>,
    /// Delay every response by this much
    pub delay: Option<Duration>,
}

impl FakeConnect {
    pub fn with_connector(mut self, name: &str, status: Value) -> Self {
        self.connectors.push(name.to_string());
        self.statuses.insert(name.to_string(), status);
        self
    }

    pub fn with_raw_body(mut self, body: &str) -> Self {
        self.raw_body = Some(body.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Serve on an ephemeral local port, returning `host:port`
    pub async fn spawn(self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new()
            .route("/connectors", get(list_connectors))
            .route("/connectors/:name/status", get(connector_status))
            .with_state(Arc::new(self));

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr.to_string()
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

async fn list_connectors(State(fake): State<Arc<FakeConnect>>) -> Response {
    if let Some(delay) = fake.delay {
        tokio::time::sleep(delay).await;
    }
    Json(fake.connectors.clone()).into_response()
}

async fn connector_status(
    State(fake): State<Arc<FakeConnect>>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(delay) = fake.delay {
        tokio::time::sleep(delay).await;
    }
    if !wants_json(&headers) {
        return (StatusCode::NOT_ACCEPTABLE, "json only").into_response();
    }
    if let Some(raw) = &fake.raw_body {
        return (StatusCode::OK, raw.clone()).into_response();
    }

    match fake.statuses.get(&name) {
        Some(status) => Json(status.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error_code": 404,
                "message": format!("No status found for connector {}", name)
            })),
        )
            .into_response(),
    }
}

/// `host:port` that refuses connections
pub fn dead_node() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

/// Status document of a healthy connector spread over two workers
pub fn healthy_status(name: &str) -> Value {
    json!({
        "name": name,
        "type": "sink",
        "connector": {"state": "RUNNING", "worker_id": "10.0.0.1:8083"},
        "tasks": [
            {"id": 0, "state": "RUNNING", "worker_id": "10.0.0.1:8083"},
            {"id": 1, "state": "RUNNING", "worker_id": "10.0.0.2:8083"},
            {"id": 2, "state": "RUNNING", "worker_id": "10.0.0.1:8083"}
        ]
    })
}

/// Client with a short request timeout for tests
pub fn client(timeout_ms: u64) -> ConnectApiClient {
    ConnectApiClient::new(ConnectApiConfig {
        timeout_ms,
        ..Default::default()
    })
    .unwrap()
}
