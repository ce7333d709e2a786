//! # Result Summarizer
//!
//! Builds the one-line summary shown after the state in the status line.

use super::context::Results;
use super::metric::{names, ServiceState};

/// Summarize classified results into the user-facing line
#[must_use]
pub fn summarize(results: &Results) -> String {
    match results.most_significant_state() {
        ServiceState::Ok => ok(results),
        _ => problem(results),
    }
}

fn ok(results: &Results) -> String {
    if results.len() > 1 {
        format!(
            "{} ({}) is {} with {} task(s).",
            results.value_text(names::CONNECTOR_NAME),
            results.value_text(names::CONNECTOR_WORKER_ID),
            results.value_text(names::CONNECTOR_STATE).to_lowercase(),
            results.value_text(names::RUNNING_TASKS),
        )
    } else {
        results.first().map(ToString::to_string).unwrap_or_default()
    }
}

fn problem(results: &Results) -> String {
    if results.len() > 1 {
        let state_of = |name: &str| results.get(name).map(|r| r.state);

        if state_of(names::CONNECTOR_STATE) == Some(ServiceState::Critical) {
            return first_significant(results);
        }
        if matches!(
            state_of(names::WORKER_TASK_COUNT),
            Some(ServiceState::Critical | ServiceState::Warning)
        ) {
            return format!(
                "{} is running {} task(s)",
                results.value_text(names::WORKER_NAME),
                results.value_text(names::WORKER_TASK_COUNT),
            );
        }
    }
    first_significant(results)
}

fn first_significant(results: &Results) -> String {
    results
        .first_significant()
        .map(ToString::to_string)
        .unwrap_or_default()
}
