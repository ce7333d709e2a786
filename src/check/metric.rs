//! Metric values and service states.

use std::fmt;

/// Metric names emitted by the evaluator, in emission order
pub mod names {
    pub const CONNECTOR_NAME: &str = "connector_name";
    pub const CONNECTOR_TYPE: &str = "connector_type";
    pub const CONNECTOR_STATE: &str = "connector_state";
    pub const CONNECTOR_WORKER_ID: &str = "connector_wrkid";
    pub const API_LATENCY: &str = "api_latency";
    pub const RUNNING_TASKS: &str = "running_tasks";
    pub const WORKER_TASK_COUNT: &str = "worker_task_count";
    pub const WORKER_NAME: &str = "worker_name";
}

pub use nagiosplugin::ServiceState;

/// Status-line helpers on top of [`ServiceState`]
pub trait StateExt: Copy {
    /// Process exit code for this state
    fn exit_status(self) -> u8;

    /// Upper-case label used in the status line
    fn status_label(self) -> &'static str;

    /// Rank used to pick the most significant state, higher is worse
    fn severity(self) -> u8;
}

impl StateExt for ServiceState {
    fn exit_status(self) -> u8 {
        u8::try_from(self.exit_code()).unwrap_or(3)
    }

    fn status_label(self) -> &'static str {
        match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        }
    }

    fn severity(self) -> u8 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warning => 1,
            ServiceState::Critical => 2,
            ServiceState::Unknown => 3,
        }
    }
}

/// Worst state of a sequence, `Ok` when empty
pub fn worst_state<I>(states: I) -> ServiceState
where
    I: IntoIterator<Item = ServiceState>,
{
    states
        .into_iter()
        .max_by_key(|state| state.severity())
        .unwrap_or(ServiceState::Ok)
}

/// Value carried by a metric
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Text(String),
    Number(f64),
}

impl MetricValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<usize> for MetricValue {
    fn from(value: usize) -> Self {
        MetricValue::Number(value as f64)
    }
}

/// A single named measurement produced by one probe
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    /// Unit of measure, e.g. `s`
    pub uom: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            uom: None,
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Value followed by its unit, e.g. `0.012s`
    #[must_use]
    pub fn value_with_unit(&self) -> String {
        format!("{}{}", self.value, self.uom.as_deref().unwrap_or(""))
    }
}
