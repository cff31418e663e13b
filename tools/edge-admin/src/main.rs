//! Edge-Admin: polygon-sdk validator helper

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use edge_admin::cli::Cli;
use edge_admin::commands;
use edge_telemetry::{init_logging, TelemetryConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if cli.verbose {
        telemetry = telemetry.with_level("debug");
    }
    if let Err(e) = init_logging(&telemetry) {
        eprintln!("Warning: {}", e);
    }

    let config = match commands::config_from(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match commands::run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
