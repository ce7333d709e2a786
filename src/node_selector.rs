//! # Node Selector
//!
//! Ordered failover across the candidate Kafka Connect nodes given on the
//! command line. One pass, one attempt per node, first success wins.
//!
//! When every node fails only the last failure is returned; earlier failures
//! are logged at debug level and then dropped.

use tracing::{debug, info};

use crate::api_clients::{ConnectApi, StatusProbe};
use crate::error::{ProbeError, ProbeResult};

/// Split a comma-delimited `--url` argument into candidates
///
/// Empty entries are kept so that [`select_active_node`] can reject them when
/// it reaches them.
#[must_use]
pub fn split_candidates(urls: &str) -> Vec<String> {
    urls.split(',').map(|url| url.trim().to_string()).collect()
}

/// Query candidates in order until one returns a status document
///
/// An empty candidate aborts the scan with [`ProbeError::InvalidUrl`] as soon
/// as it is reached; later candidates are not tried.
pub async fn select_active_node<A>(
    api: &A,
    candidates: &[String],
    connector: &str,
) -> ProbeResult<StatusProbe>
where
    A: ConnectApi + ?Sized,
{
    let max_iter = candidates.len();
    let mut last_probe = None;

    debug!("Node check iteration start");
    for (i, candidate) in candidates.iter().enumerate() {
        let cur_iter = i + 1;
        info!("checking node: {} / {} - {}", cur_iter, max_iter, candidate);

        if candidate.is_empty() {
            return Err(ProbeError::InvalidUrl(candidate.clone()));
        }

        let probe = api.get_status(candidate, connector).await;
        match &probe.body {
            Ok(_) => {
                info!("node is active");
                return Ok(probe);
            }
            Err(failure) if cur_iter == max_iter => {
                info!("url list exhausted");
                debug!(node = %candidate, error = %failure, "last node failed");
            }
            Err(failure) => {
                info!("node is inactive");
                debug!(node = %candidate, error = %failure, "node is inactive response");
            }
        }
        last_probe = Some(probe);
    }

    last_probe.ok_or_else(|| ProbeError::InvalidUrl(String::new()))
}
