//! # Status Evaluator
//!
//! Turns the connector status document returned by the node selector into an
//! [`Outcome`]. Extraction runs in stages (identity, connector state, tasks);
//! the first stage that finds a required field missing ends evaluation and
//! nothing gathered so far is kept.

use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

use super::metric::{names, Metric};
use crate::api_clients::StatusProbe;

/// Message reported when no candidate node produced a status document
pub const UNREACHABLE_MESSAGE: &str = "Kafka Connect nodes are not responding!";
/// Message reported when a task entry lacks its worker
pub const TASK_INFO_MESSAGE: &str = "Failed to get task(s) information";
/// Message reported when the document carries no task list
pub const NO_TASKS_MESSAGE: &str = "No tasks found in response";

/// Exact connector and task state that counts as healthy
pub const RUNNING_STATE: &str = "RUNNING";

/// Extraction stage that found the document incomplete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    Identity,
    ConnectorState,
    Tasks,
    TaskEntry,
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            ExtractionStage::Identity => "identity",
            ExtractionStage::ConnectorState => "connector state",
            ExtractionStage::Tasks => "tasks",
            ExtractionStage::TaskEntry => "task entry",
        };
        f.write_str(stage)
    }
}

/// What one probe produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every metric was extracted, in emission order
    Metrics(Vec<Metric>),
    /// No node answered; `detail` is the last transport failure
    Unreachable { detail: String },
    /// A node answered but the document lacked a required field
    Malformed {
        stage: ExtractionStage,
        message: String,
    },
}

impl Outcome {
    fn malformed(stage: ExtractionStage, message: impl Into<String>) -> Self {
        let message = message.into();
        info!(%stage, %message, "connector status document incomplete");
        Outcome::Malformed { stage, message }
    }

    /// Extracted metrics, if extraction completed
    #[must_use]
    pub fn metrics(&self) -> Option<&[Metric]> {
        match self {
            Outcome::Metrics(metrics) => Some(metrics),
            _ => None,
        }
    }
}

/// Message for a connector missing from the node's answer
#[must_use]
pub fn not_found_message(connector: &str) -> String {
    format!("The connector '{}' was not found", connector)
}

/// Evaluate the probe of `connector`
pub fn evaluate(probe: &StatusProbe, connector: &str) -> Outcome {
    let document = match &probe.body {
        Ok(document) => document,
        Err(failure) => {
            return Outcome::Unreachable {
                detail: failure.to_string(),
            }
        }
    };

    let mut metrics = Vec::with_capacity(8);

    // identity
    let (Some(name), Some(kind)) = (text_field(document, "name"), text_field(document, "type"))
    else {
        return Outcome::malformed(ExtractionStage::Identity, not_found_message(connector));
    };
    info!("probe connector> name: {}", name);
    info!("probe connector> type: {}", kind);
    metrics.push(Metric::new(names::CONNECTOR_NAME, name));
    metrics.push(Metric::new(names::CONNECTOR_TYPE, kind));

    // connector state
    let status = document.get("connector");
    let (Some(state), Some(worker_id)) = (
        status.and_then(|s| text_field(s, "state")),
        status.and_then(|s| text_field(s, "worker_id")),
    ) else {
        return Outcome::malformed(ExtractionStage::ConnectorState, not_found_message(connector));
    };
    info!("probe connector> state: {}", state);
    metrics.push(Metric::new(names::CONNECTOR_STATE, state));
    metrics.push(Metric::new(names::CONNECTOR_WORKER_ID, worker_id));
    metrics.push(
        Metric::new(names::API_LATENCY, probe.latency_secs)
            .with_uom("s")
            .with_min(0.0),
    );

    // tasks
    let Some(tasks) = document.get("tasks").and_then(Value::as_array) else {
        return Outcome::malformed(ExtractionStage::Tasks, NO_TASKS_MESSAGE);
    };
    debug!("probe task> list: {:?}", tasks);

    let summary = match TaskSummary::from_tasks(tasks) {
        Ok(summary) => summary,
        Err((stage, message)) => return Outcome::malformed(stage, message),
    };
    info!("probe task> tasks running: {}", summary.running);

    let total = tasks.len() as f64;
    let (busiest_worker, busiest_count) = summary
        .busiest_worker()
        .map(|(worker, count)| (worker.to_string(), count))
        .unwrap_or_default();

    metrics.push(
        Metric::new(names::RUNNING_TASKS, summary.running)
            .with_min(0.0)
            .with_max(total),
    );
    metrics.push(
        Metric::new(names::WORKER_TASK_COUNT, busiest_count)
            .with_min(0.0)
            .with_max(total),
    );
    metrics.push(Metric::new(names::WORKER_NAME, busiest_worker));

    Outcome::Metrics(metrics)
}

/// Task counts of one connector
#[derive(Debug, Default, PartialEq)]
struct TaskSummary {
    /// Tasks per worker, in first-seen order
    assignments: Vec<(String, usize)>,
    running: usize,
}

impl TaskSummary {
    /// Workers are counted over every entry before any state is read, so a
    /// missing `worker_id` is reported ahead of a missing `state`
    fn from_tasks(tasks: &[Value]) -> Result<Self, (ExtractionStage, &'static str)> {
        let mut summary = Self::default();
        for task in tasks {
            let worker = text_field(task, "worker_id")
                .ok_or((ExtractionStage::TaskEntry, TASK_INFO_MESSAGE))?;
            match summary.assignments.iter_mut().find(|(w, _)| *w == worker) {
                Some((_, count)) => *count += 1,
                None => summary.assignments.push((worker, 1)),
            }
        }

        for task in tasks {
            let state =
                text_field(task, "state").ok_or((ExtractionStage::Tasks, NO_TASKS_MESSAGE))?;
            if state == RUNNING_STATE {
                summary.running += 1;
            }
        }
        Ok(summary)
    }

    /// Worker with the most tasks; ties go to the first-seen worker
    fn busiest_worker(&self) -> Option<(&str, usize)> {
        // Iterator::max_by_key keeps the last maximum, so fold by hand
        let mut busiest: Option<(&str, usize)> = None;
        for (worker, count) in &self.assignments {
            if busiest.map_or(true, |(_, top)| *count > top) {
                busiest = Some((worker.as_str(), *count));
            }
        }
        busiest
    }
}

/// Read a scalar field as text; missing and `null` fields are absent
fn text_field(document: &Value, key: &str) -> Option<String> {
    match document.get(key)? {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::metric::MetricValue;
    use crate::error::TransportFailure;
    use serde_json::json;

    fn probe(document: Value) -> StatusProbe {
        StatusProbe {
            body: Ok(document),
            latency_secs: 0.021,
        }
    }

    fn healthy_document() -> Value {
        json!({
            "name": "orders-sink",
            "type": "sink",
            "connector": {"state": "RUNNING", "worker_id": "10.0.0.1:8083"},
            "tasks": [
                {"id": 0, "state": "RUNNING", "worker_id": "10.0.0.1:8083"},
                {"id": 1, "state": "RUNNING", "worker_id": "10.0.0.2:8083"},
                {"id": 2, "state": "RUNNING", "worker_id": "10.0.0.2:8083"}
            ]
        })
    }

    fn value_of<'a>(outcome: &'a Outcome, name: &str) -> &'a MetricValue {
        &outcome
            .metrics()
            .unwrap()
            .iter()
            .find(|m| m.name == name)
            .unwrap()
            .value
    }

    #[test]
    fn test_metrics_in_emission_order() {
        let outcome = evaluate(&probe(healthy_document()), "orders-sink");
        let names: Vec<&str> = outcome
            .metrics()
            .unwrap()
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "connector_name",
                "connector_type",
                "connector_state",
                "connector_wrkid",
                "api_latency",
                "running_tasks",
                "worker_task_count",
                "worker_name"
            ]
        );
    }

    #[test]
    fn test_healthy_connector_values() {
        let outcome = evaluate(&probe(healthy_document()), "orders-sink");
        assert_eq!(value_of(&outcome, "connector_name"), &MetricValue::from("orders-sink"));
        assert_eq!(value_of(&outcome, "connector_state"), &MetricValue::from("RUNNING"));
        assert_eq!(value_of(&outcome, "api_latency"), &MetricValue::Number(0.021));
        assert_eq!(value_of(&outcome, "running_tasks"), &MetricValue::Number(3.0));
        assert_eq!(value_of(&outcome, "worker_task_count"), &MetricValue::Number(2.0));
        assert_eq!(value_of(&outcome, "worker_name"), &MetricValue::from("10.0.0.2:8083"));

        let running = outcome
            .metrics()
            .unwrap()
            .iter()
            .find(|m| m.name == "running_tasks")
            .unwrap();
        assert_eq!(running.min, Some(0.0));
        assert_eq!(running.max, Some(3.0));
    }

    #[test]
    fn test_unreachable_carries_transport_detail() {
        let failed = StatusProbe {
            body: Err(TransportFailure::Connect("connection refused".into())),
            latency_secs: 0.002,
        };
        assert_eq!(
            evaluate(&failed, "orders-sink"),
            Outcome::Unreachable {
                detail: "Connection failed: connection refused".into()
            }
        );
    }

    #[test]
    fn test_missing_connector_is_not_found() {
        let mut document = healthy_document();
        document.as_object_mut().unwrap().remove("connector");

        assert_eq!(
            evaluate(&probe(document), "orders-sink"),
            Outcome::Malformed {
                stage: ExtractionStage::ConnectorState,
                message: "The connector 'orders-sink' was not found".into()
            }
        );
    }

    #[test]
    fn test_kafka_connect_404_body_is_not_found() {
        let document = json!({"error_code": 404, "message": "No status found for connector ghost"});
        assert_eq!(
            evaluate(&probe(document), "ghost"),
            Outcome::Malformed {
                stage: ExtractionStage::Identity,
                message: "The connector 'ghost' was not found".into()
            }
        );
    }

    #[test]
    fn test_missing_worker_id_on_connector_is_not_found() {
        let mut document = healthy_document();
        document["connector"]
            .as_object_mut()
            .unwrap()
            .remove("worker_id");

        let outcome = evaluate(&probe(document), "orders-sink");
        assert!(matches!(
            outcome,
            Outcome::Malformed { stage: ExtractionStage::ConnectorState, .. }
        ));
    }

    #[test]
    fn test_missing_tasks_key() {
        let mut document = healthy_document();
        document.as_object_mut().unwrap().remove("tasks");

        assert_eq!(
            evaluate(&probe(document), "orders-sink"),
            Outcome::Malformed {
                stage: ExtractionStage::Tasks,
                message: NO_TASKS_MESSAGE.into()
            }
        );
    }

    #[test]
    fn test_task_without_worker_aborts() {
        let mut document = healthy_document();
        document["tasks"][1].as_object_mut().unwrap().remove("worker_id");

        assert_eq!(
            evaluate(&probe(document), "orders-sink"),
            Outcome::Malformed {
                stage: ExtractionStage::TaskEntry,
                message: TASK_INFO_MESSAGE.into()
            }
        );
    }

    #[test]
    fn test_task_without_state_reports_no_tasks() {
        let document = json!({
            "name": "c", "type": "source",
            "connector": {"state": "RUNNING", "worker_id": "w1"},
            "tasks": [{"worker_id": "w1"}]
        });

        assert_eq!(
            evaluate(&probe(document), "c"),
            Outcome::Malformed {
                stage: ExtractionStage::Tasks,
                message: NO_TASKS_MESSAGE.into()
            }
        );
    }

    #[test]
    fn test_missing_worker_reported_before_missing_state() {
        let mut document = healthy_document();
        document["tasks"][0].as_object_mut().unwrap().remove("state");
        document["tasks"][2].as_object_mut().unwrap().remove("worker_id");

        assert_eq!(
            evaluate(&probe(document), "orders-sink"),
            Outcome::Malformed {
                stage: ExtractionStage::TaskEntry,
                message: TASK_INFO_MESSAGE.into()
            }
        );
    }

    #[test]
    fn test_running_is_case_sensitive() {
        let mut document = healthy_document();
        document["tasks"][0]["state"] = json!("running");
        document["tasks"][1]["state"] = json!("FAILED");

        let outcome = evaluate(&probe(document), "orders-sink");
        assert_eq!(value_of(&outcome, "running_tasks"), &MetricValue::Number(1.0));
    }

    #[test]
    fn test_busiest_worker_tie_goes_to_first_seen() {
        let document = json!({
            "name": "c", "type": "source",
            "connector": {"state": "RUNNING", "worker_id": "w1"},
            "tasks": [
                {"state": "RUNNING", "worker_id": "w2"},
                {"state": "RUNNING", "worker_id": "w1"},
                {"state": "RUNNING", "worker_id": "w1"},
                {"state": "RUNNING", "worker_id": "w2"},
                {"state": "RUNNING", "worker_id": "w3"}
            ]
        });

        for _ in 0..3 {
            let outcome = evaluate(&probe(document.clone()), "c");
            assert_eq!(value_of(&outcome, "worker_name"), &MetricValue::from("w2"));
            assert_eq!(value_of(&outcome, "worker_task_count"), &MetricValue::Number(2.0));
        }
    }

    #[test]
    fn test_empty_task_list() {
        let mut document = healthy_document();
        document["tasks"] = json!([]);

        let outcome = evaluate(&probe(document), "orders-sink");
        assert_eq!(value_of(&outcome, "running_tasks"), &MetricValue::Number(0.0));
        assert_eq!(value_of(&outcome, "worker_task_count"), &MetricValue::Number(0.0));
        assert_eq!(value_of(&outcome, "worker_name"), &MetricValue::from(""));
    }
}
