//! # Classification Contexts
//!
//! Assigns a [`ServiceState`] to every metric of an [`Outcome`]:
//!
//! - `api_latency`, `running_tasks` and `worker_task_count` are scalar metrics
//!   classified against the `--warning` / `--critical` ranges, bound by
//!   position in that order.
//! - `connector_state` is CRITICAL unless it is exactly `RUNNING`.
//! - Every other metric is informational and always OK.
//! - Unreachable and malformed outcomes are a single CRITICAL result.

use std::fmt;
use tracing::{debug, warn};

use super::evaluator::{Outcome, RUNNING_STATE, UNREACHABLE_MESSAGE};
use super::metric::{names, worst_state, Metric, MetricValue, ServiceState, StateExt};
use super::range::Range;
use crate::error::ProbeResult;

/// Warning and critical ranges of one scalar metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarThresholds {
    pub warning: Option<Range>,
    pub critical: Option<Range>,
}

impl ScalarThresholds {
    /// Classify `value`, returning the violated range as hint
    #[must_use]
    pub fn classify(&self, value: f64) -> (ServiceState, Option<String>) {
        if let Some(critical) = self.critical.as_ref().filter(|r| !r.contains(value)) {
            return (ServiceState::Critical, Some(critical.violation()));
        }
        if let Some(warning) = self.warning.as_ref().filter(|r| !r.contains(value)) {
            return (ServiceState::Warning, Some(warning.violation()));
        }
        (ServiceState::Ok, None)
    }
}

/// Thresholds for the three scalar metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdSet {
    pub api_latency: ScalarThresholds,
    pub running_tasks: ScalarThresholds,
    pub worker_task_count: ScalarThresholds,
}

impl ThresholdSet {
    /// Build from the comma-separated `--warning` and `--critical` arguments
    ///
    /// Positions are `api_latency,running_tasks,worker_task_count`; empty or
    /// missing positions leave that level unchecked.
    pub fn from_args(warning: &str, critical: &str) -> ProbeResult<Self> {
        let [w_latency, w_running, w_worker] = positional_ranges(warning)?;
        let [c_latency, c_running, c_worker] = positional_ranges(critical)?;

        Ok(Self {
            api_latency: ScalarThresholds {
                warning: w_latency,
                critical: c_latency,
            },
            running_tasks: ScalarThresholds {
                warning: w_running,
                critical: c_running,
            },
            worker_task_count: ScalarThresholds {
                warning: w_worker,
                critical: c_worker,
            },
        })
    }

    fn for_metric(&self, name: &str) -> Option<&ScalarThresholds> {
        match name {
            names::API_LATENCY => Some(&self.api_latency),
            names::RUNNING_TASKS => Some(&self.running_tasks),
            names::WORKER_TASK_COUNT => Some(&self.worker_task_count),
            _ => None,
        }
    }
}

fn positional_ranges(list: &str) -> ProbeResult<[Option<Range>; 3]> {
    let parts: Vec<&str> = list.split(',').collect();
    if parts.len() > 3 {
        warn!(
            "ignoring {} extra threshold position(s) in '{}'",
            parts.len() - 3,
            list
        );
    }

    let mut ranges: [Option<Range>; 3] = Default::default();
    for (slot, part) in ranges.iter_mut().zip(parts) {
        *slot = Range::parse_optional(part)?;
    }
    Ok(ranges)
}

/// A classified metric or sentinel
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub state: ServiceState,
    /// Metric name, or the sentinel's message
    pub name: String,
    pub metric: Option<Metric>,
    /// Human-readable rendering of the metric
    pub description: Option<String>,
    pub hint: Option<String>,
    /// Detail kept for verbose output only
    pub detail: Option<String>,
    /// Nagios performance data, scalar metrics only
    pub performance: Option<String>,
}

impl CheckResult {
    fn sentinel(message: &str, detail: Option<String>) -> Self {
        Self {
            state: ServiceState::Critical,
            name: message.to_string(),
            metric: None,
            description: Some(message.to_string()),
            hint: None,
            detail,
            performance: None,
        }
    }

    fn from_metric(metric: &Metric, state: ServiceState) -> Self {
        Self {
            state,
            name: metric.name.clone(),
            metric: Some(metric.clone()),
            description: None,
            hint: None,
            detail: None,
            performance: None,
        }
    }

    /// Informational metrics carry no description and render as their state
    fn informational(metric: &Metric) -> Self {
        Self::from_metric(metric, ServiceState::Ok)
    }

    /// Metric value, when this result carries a metric
    #[must_use]
    pub fn value(&self) -> Option<&MetricValue> {
        self.metric.as_ref().map(|m| &m.value)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.description, &self.hint) {
            (Some(description), Some(hint)) => write!(f, "{} ({})", description, hint),
            (None, Some(hint)) => f.write_str(hint),
            (Some(description), None) => f.write_str(description),
            (None, None) => f.write_str(&self.state.status_label().to_lowercase()),
        }
    }
}

/// Ordered results of one check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    results: Vec<CheckResult>,
}

impl Results {
    #[must_use]
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self { results }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter()
    }

    #[must_use]
    pub fn first(&self) -> Option<&CheckResult> {
        self.results.first()
    }

    /// Result of the metric called `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Metric value rendered as text, empty when absent
    #[must_use]
    pub fn value_text(&self, name: &str) -> String {
        self.get(name)
            .and_then(CheckResult::value)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Worst state across all results
    #[must_use]
    pub fn most_significant_state(&self) -> ServiceState {
        worst_state(self.results.iter().map(|r| r.state))
    }

    /// First result carrying the worst state
    #[must_use]
    pub fn first_significant(&self) -> Option<&CheckResult> {
        let worst = self.most_significant_state();
        self.results.iter().find(|r| r.state == worst)
    }
}

/// Classify every metric of `outcome`
pub fn classify(outcome: &Outcome, thresholds: &ThresholdSet) -> Results {
    let results = match outcome {
        Outcome::Unreachable { detail } => {
            vec![CheckResult::sentinel(UNREACHABLE_MESSAGE, Some(detail.clone()))]
        }
        Outcome::Malformed { message, .. } => vec![CheckResult::sentinel(message, None)],
        Outcome::Metrics(metrics) => metrics
            .iter()
            .map(|metric| classify_metric(metric, thresholds))
            .collect(),
    };
    Results::new(results)
}

fn classify_metric(metric: &Metric, thresholds: &ThresholdSet) -> CheckResult {
    if metric.name == names::CONNECTOR_STATE {
        return connector_state(metric);
    }

    match (thresholds.for_metric(&metric.name), metric.value.as_f64()) {
        (Some(scalar), Some(value)) => {
            let (state, hint) = scalar.classify(value);
            CheckResult {
                description: Some(describe_scalar(metric)),
                hint,
                performance: Some(performance(metric, scalar)),
                ..CheckResult::from_metric(metric, state)
            }
        }
        _ => CheckResult::informational(metric),
    }
}

fn connector_state(metric: &Metric) -> CheckResult {
    debug!("context eval> connector: {}", metric.value);
    match &metric.value {
        MetricValue::Text(state) if state == RUNNING_STATE => {
            CheckResult::from_metric(metric, ServiceState::Ok)
        }
        other => CheckResult {
            hint: Some(format!("connector is in an {} state", other)),
            ..CheckResult::from_metric(metric, ServiceState::Critical)
        },
    }
}

fn describe_scalar(metric: &Metric) -> String {
    match metric.name.as_str() {
        names::API_LATENCY => format!("api responsetime is {}", metric.value_with_unit()),
        names::RUNNING_TASKS => format!(
            "{}/{} running task(s)",
            metric.value,
            metric.max.map(|m| m.to_string()).unwrap_or_default()
        ),
        _ => format!("{} is {}", metric.name, metric.value_with_unit()),
    }
}

/// Nagios perfdata: `label=value[uom];warn;crit;min;max`, trailing empties trimmed
fn performance(metric: &Metric, thresholds: &ScalarThresholds) -> String {
    fn optional<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    let perfdata = format!(
        "{}={};{};{};{};{}",
        metric.name,
        metric.value_with_unit(),
        optional(thresholds.warning.as_ref()),
        optional(thresholds.critical.as_ref()),
        optional(metric.min),
        optional(metric.max),
    );
    perfdata.trim_end_matches(';').to_string()
}
