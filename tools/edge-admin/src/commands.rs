//! Subcommand dispatch onto `edge-core`.

use anyhow::{Context, Result};
use edge_core::{
    chain_data, genesis, loadbot, node_process, sdk, EdgeConfig, LoadbotOptions, ResetOptions,
    ServerOptions,
};
use edge_telemetry::operation_span;
use tracing::{info, Instrument};

use crate::cli::{Cli, Command};

/// Build the configuration from the environment plus global flags.
pub fn config_from(cli: &Cli) -> Result<EdgeConfig> {
    let mut config = EdgeConfig::from_env();
    if let Some(home) = &cli.home {
        config.workspace_dir = home.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Execute one subcommand.
pub async fn run(command: Command, config: &EdgeConfig) -> Result<()> {
    match command {
        Command::Init => {
            let span = operation_span!("init", url = %config.sdk_url);
            let binary = sdk::init(config)
                .instrument(span)
                .await
                .context("SDK initialization failed")?;
            info!(binary = %binary.display(), "SDK installed");
        }

        Command::GenerateGenesis(args) => {
            let _span =
                operation_span!("generate_genesis", node_list = %args.node_list.display())
                    .entered();
            genesis::generate_genesis(config, &args.node_list, args.premine_list.as_deref())
                .context("Genesis generation failed")?;
        }

        Command::StartValidator(args) => {
            let _span = operation_span!("start_validator", ip = %args.ip).entered();
            let options = ServerOptions {
                ip: args.ip,
                jsonrpc_port: args.jsonrpc,
                grpc_port: args.grpc,
            };
            node_process::start_validator(config, &options)
                .context("Unable to start the validator")?;
        }

        Command::HaltNode => {
            let _span = operation_span!("halt_node").entered();
            node_process::halt_node(config)?;
        }

        Command::Status(args) => {
            let _span = operation_span!("status").entered();
            let status = node_process::node_status(config, args.lines)?;
            println!("Node running with pid {}", status.pid);
            for line in status.log_tail {
                println!("{}", line);
            }
        }

        Command::Backup(args) => {
            let _span = operation_span!("backup").entered();
            let dest = args
                .backup_dest
                .unwrap_or_else(|| config.workspace_dir.clone());
            let folder = chain_data::backup(config, &dest, &args.backup_prefix)
                .context("Unable to backup")?;
            println!("{}", folder.display());
        }

        Command::Restore(args) => {
            let _span =
                operation_span!("restore", backup = %args.backup_path.display()).entered();
            if let Some(safety) = chain_data::restore(config, &args.backup_path)? {
                info!(backup = %safety.display(), "Previous chain data saved");
            }
        }

        Command::Reset(args) => {
            let _span = operation_span!("reset", hard = args.hard_reset).entered();
            let options = ResetOptions {
                hard: args.hard_reset,
                make_backup: args.make_backup,
            };
            if let Some(safety) = chain_data::reset(config, options)? {
                info!(backup = %safety.display(), "Chain data backed up before reset");
            }
        }

        Command::Loadbot(args) => {
            let _span = operation_span!("loadbot", jsonrpc = %args.jsonrpc).entered();
            let options = LoadbotOptions {
                jsonrpc: args.jsonrpc,
                sender: args.sender,
                receiver: args.receiver,
                tps: args.tps,
                count: args.count,
            };
            loadbot::run_loadbot(config, &options)?;
        }
    }

    Ok(())
}
