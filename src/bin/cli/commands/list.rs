//! Connector listing handler

use std::time::Duration;

use check_kafka_connector::plugin::{list_connectors, render_listing};
use check_kafka_connector::{
    ConnectApiClient, ConnectApiConfig, ProbeConfig, ProbeError, ProbeResult, ServiceState, StateExt,
};
use tracing::error;

use crate::Cli;

/// Print one connector per line; on failure print nothing and exit UNKNOWN
pub async fn handle_list_command(cli: &Cli, config: &ProbeConfig) -> u8 {
    match list(cli, config).await {
        Ok(connectors) => {
            if !connectors.is_empty() {
                println!("{}", render_listing(&connectors));
            }
            ServiceState::Ok.exit_status()
        }
        Err(err) => {
            error!("{}", err);
            ServiceState::Unknown.exit_status()
        }
    }
}

async fn list(cli: &Cli, config: &ProbeConfig) -> ProbeResult<Vec<String>> {
    let client = ConnectApiClient::new(ConnectApiConfig::from(&config.transport))?;
    let timeout_secs = cli.timeout.unwrap_or(config.check.timeout_secs);

    tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        list_connectors(&client, &cli.url),
    )
    .await
    .map_err(|_| ProbeError::Timeout {
        seconds: timeout_secs,
    })?
}
