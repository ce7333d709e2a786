//! # Plugin Harness
//!
//! Runs a check end to end and renders it the way monitoring schedulers expect:
//!
//! ```text
//! CONNECTOR OK - orders-sink (10.0.0.1:8083) is running with 3 task(s). | api_latency=0.012s;0.5;1;0 ...
//! ```
//!
//! The first line carries the state and summary, optionally followed by
//! performance data. With `-v` the non-OK results follow as long output, one per
//! line. The exit code follows the Nagios convention (0 OK, 1 WARNING,
//! 2 CRITICAL, 3 UNKNOWN).

use std::time::Duration;
use tracing::{debug, info};

use crate::api_clients::ConnectApi;
use crate::check::{classify, evaluate, summarize, Results, ServiceState, StateExt, ThresholdSet};
use crate::error::{ProbeError, ProbeResult};
use crate::node_selector::{select_active_node, split_candidates};

/// Name printed at the start of the status line
pub const CHECK_NAME: &str = "CONNECTOR";

/// Everything needed to check one connector
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// Comma-separated candidate base URLs
    pub urls: String,
    pub connector: String,
    pub thresholds: ThresholdSet,
}

/// Final verdict of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub state: ServiceState,
    pub summary: String,
    pub results: Results,
}

impl CheckOutcome {
    /// Verdict for a completed evaluation
    #[must_use]
    pub fn from_results(results: Results) -> Self {
        Self {
            state: results.most_significant_state(),
            summary: summarize(&results),
            results,
        }
    }

    /// UNKNOWN verdict for a check that could not run
    #[must_use]
    pub fn from_error(err: &ProbeError) -> Self {
        Self {
            state: ServiceState::Unknown,
            summary: err.to_string(),
            results: Results::default(),
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.state.exit_status()
    }

    /// Space-separated performance data of all scalar results
    #[must_use]
    pub fn performance_data(&self) -> String {
        self.results
            .iter()
            .filter_map(|r| r.performance.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Status line plus long output for the given verbosity
    #[must_use]
    pub fn render(&self, verbosity: u8) -> String {
        let mut out = format!("{} {}", CHECK_NAME, self.state.status_label());
        if !self.summary.is_empty() {
            out.push_str(" - ");
            out.push_str(&self.summary);
        }

        let perfdata = self.performance_data();
        if !perfdata.is_empty() {
            out.push_str(" | ");
            out.push_str(&perfdata);
        }

        if verbosity > 0 {
            for result in self.results.iter() {
                if result.state == ServiceState::Ok && verbosity < 3 {
                    continue;
                }
                out.push('\n');
                out.push_str(&format!(
                    "{}: {}",
                    result.state.status_label().to_lowercase(),
                    result
                ));
                if let Some(detail) = &result.detail {
                    out.push_str(&format!(" ({})", detail));
                }
            }
        }
        out
    }
}

/// Probe the candidates, evaluate the connector and summarize
pub async fn run_check<A>(api: &A, request: &CheckRequest) -> ProbeResult<CheckOutcome>
where
    A: ConnectApi + ?Sized,
{
    let candidates = split_candidates(&request.urls);
    let probe = select_active_node(api, &candidates, &request.connector).await?;
    let outcome = evaluate(&probe, &request.connector);
    let results = classify(&outcome, &request.thresholds);

    let check = CheckOutcome::from_results(results);
    info!(
        connector = %request.connector,
        state = check.state.status_label(),
        "check finished"
    );
    Ok(check)
}

/// [`run_check`] bounded by the outer plugin timeout
///
/// Expiry drops the in-flight request and any remaining candidates.
pub async fn run_check_with_timeout<A>(
    api: &A,
    request: &CheckRequest,
    timeout: Duration,
) -> ProbeResult<CheckOutcome>
where
    A: ConnectApi + ?Sized,
{
    tokio::time::timeout(timeout, run_check(api, request))
        .await
        .map_err(|_| ProbeError::Timeout {
            seconds: timeout.as_secs(),
        })?
}

/// List connector names known to the first candidate node
///
/// Failures are returned to the caller, which reports them.
pub async fn list_connectors<A>(api: &A, urls: &str) -> ProbeResult<Vec<String>>
where
    A: ConnectApi + ?Sized,
{
    let first = split_candidates(urls).into_iter().next().unwrap_or_default();
    if first.is_empty() {
        return Err(ProbeError::InvalidUrl(first));
    }

    api.list_connectors(&first).await.map_err(|failure| {
        debug!(node = %first, error = %failure, "connector listing failed");
        ProbeError::ListingFailed(failure)
    })
}

/// Render a listing as one connector name per line
#[must_use]
pub fn render_listing(connectors: &[String]) -> String {
    connectors.join("\n")
}
