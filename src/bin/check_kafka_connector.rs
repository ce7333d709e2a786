//! # check_kafka_connector
//!
//! Monitoring plugin for Kafka Connect. Checks one connector's state, task
//! health and worker balance through the Kafka Connect REST API, or lists the
//! connectors a node knows about.

mod cli;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use check_kafka_connector::{logging, CheckOutcome, ProbeConfig, ServiceState, StateExt};
use cli::{handle_check_command, handle_list_command};

#[derive(Parser, Debug)]
#[command(name = "check_kafka_connector")]
#[command(about = "Check the health of a Kafka Connect connector")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// URL of the API, or a comma-separated list of nodes to fail over across
    #[arg(short, long, value_name = "URL", env = "KAFKA_CONNECT_URL")]
    url: String,

    /// Name of the connector to check
    #[arg(
        short = 'C',
        long,
        value_name = "CONNECTOR",
        required_unless_present = "list",
        requires_all = ["warning", "critical"]
    )]
    connector: Option<String>,

    /// Warning ranges for api_latency,running_tasks,worker_task_count
    #[arg(short, long, value_name = "WARN RANGE", allow_hyphen_values = true)]
    warning: Option<String>,

    /// Critical ranges for api_latency,running_tasks,worker_task_count
    #[arg(short, long, value_name = "CRIT RANGE", allow_hyphen_values = true)]
    critical: Option<String>,

    /// Timeout in seconds for the whole check (default: 10)
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// List available connectors
    #[arg(short, long)]
    list: bool,

    /// Increase output verbosity (up to 3 times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Usage errors are UNKNOWN to the scheduler, not CRITICAL; help and version succeed
fn usage_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        ServiceState::Unknown.exit_status()
    } else {
        ServiceState::Ok.exit_status()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(usage_exit_code(&err));
        }
    };

    logging::init_logging(cli.verbose);

    let config = match ProbeConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            let outcome = CheckOutcome::from_error(&err);
            println!("{}", outcome.render(cli.verbose));
            return ExitCode::from(outcome.exit_code());
        }
    };
    debug!(?cli, "Parsed command line");

    let code = if cli.list {
        handle_list_command(&cli, &config).await
    } else {
        handle_check_command(&cli, &config).await
    };
    ExitCode::from(code)
}
