//! Connector check handler

use std::time::Duration;

use check_kafka_connector::plugin::run_check_with_timeout;
use check_kafka_connector::{
    CheckOutcome, CheckRequest, ConnectApiClient, ConnectApiConfig, ProbeConfig, ProbeError,
    ProbeResult, ThresholdSet,
};

use crate::Cli;

/// Run the check, print the status line and return the exit code
pub async fn handle_check_command(cli: &Cli, config: &ProbeConfig) -> u8 {
    let outcome = match check(cli, config).await {
        Ok(outcome) => outcome,
        Err(err) => CheckOutcome::from_error(&err),
    };

    println!("{}", outcome.render(cli.verbose));
    outcome.exit_code()
}

async fn check(cli: &Cli, config: &ProbeConfig) -> ProbeResult<CheckOutcome> {
    let connector = cli
        .connector
        .clone()
        .ok_or_else(|| ProbeError::MissingArgument("--connector".to_string()))?;
    let thresholds = ThresholdSet::from_args(
        cli.warning.as_deref().unwrap_or_default(),
        cli.critical.as_deref().unwrap_or_default(),
    )?;

    let client = ConnectApiClient::new(ConnectApiConfig::from(&config.transport))?;
    let request = CheckRequest {
        urls: cli.url.clone(),
        connector,
        thresholds,
    };

    let timeout_secs = cli.timeout.unwrap_or(config.check.timeout_secs);
    run_check_with_timeout(&client, &request, Duration::from_secs(timeout_secs)).await
}
