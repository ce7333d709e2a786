//! # Connector Check
//!
//! The decision engine of the plugin: extraction of metrics from a connector
//! status document ([`evaluator`]), per-metric classification against
//! threshold ranges ([`context`], [`range`]) and the one-line summary
//! ([`summary`]).

pub mod context;
pub mod evaluator;
pub mod metric;
pub mod range;
pub mod summary;

pub use context::{classify, CheckResult, Results, ScalarThresholds, ThresholdSet};
pub use evaluator::{evaluate, ExtractionStage, Outcome};
pub use metric::{worst_state, Metric, MetricValue, ServiceState, StateExt};
pub use range::Range;
pub use summary::summarize;
