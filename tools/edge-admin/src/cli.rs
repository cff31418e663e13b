//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use edge_core::config::{LOCALHOST, NULL_ADDRESS};
use edge_core::node_process::DEFAULT_STATUS_LINES;

/// Edge Helper: polygon-sdk validator configuration
#[derive(Parser, Debug)]
#[command(name = "edge-admin")]
#[command(author, version, about = "Utility for edge-sdk configuration.", long_about = None)]
pub struct Cli {
    /// Workspace directory holding the SDK binary and chain data
    #[arg(long, global = true, env = "EDGE_HOME")]
    pub home: Option<PathBuf>,

    /// Log at debug level (shows every SDK invocation)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
pub enum Command {
    /// Download the SDK and initialize node secrets.
    Init,

    /// Generate genesis.json from a node list and an optional premine list.
    GenerateGenesis(GenerateGenesisArgs),

    /// Start a previously configured validator.
    StartValidator(StartValidatorArgs),

    /// Halt the running node.
    HaltNode,

    /// Print the node status.
    Status(StatusArgs),

    /// Back up blockchain data and the genesis.json file.
    Backup(BackupArgs),

    /// Restore a blockchain backup.
    Restore(RestoreArgs),

    /// Delete the blockchain data.
    Reset(ResetArgs),

    /// Stress test the chain with the SDK loadbot.
    Loadbot(LoadbotArgs),
}

#[derive(Args, Debug)]
pub struct GenerateGenesisArgs {
    /// CSV with header `address,peerId,validatorKey,port,isBootnode`
    #[arg(long, alias = "node_list", default_value = "./nodelist.csv")]
    pub node_list: PathBuf,

    /// CSV with header `account,balance`; an error if given but absent
    #[arg(long, alias = "premine_list")]
    pub premine_list: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StartValidatorArgs {
    /// Your IP address. Without it jsonrpc and grpc are not exposed.
    #[arg(long, default_value = LOCALHOST)]
    pub ip: String,

    /// jsonrpc port
    #[arg(long, default_value_t = 8545)]
    pub jsonrpc: u16,

    /// grpc port
    #[arg(long, default_value_t = 10000)]
    pub grpc: u16,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of log lines to print
    #[arg(short = 'n', long, default_value_t = DEFAULT_STATUS_LINES)]
    pub lines: usize,
}

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Where the backup folder is created (default: the workspace)
    #[arg(long, alias = "backup_dest")]
    pub backup_dest: Option<PathBuf>,

    /// Backup folder name prefix
    #[arg(long, alias = "backup_prefix", default_value = "backup")]
    pub backup_prefix: String,
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Full path to the backup folder
    #[arg(long, alias = "backup_path")]
    pub backup_path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Also delete genesis.json
    #[arg(long, alias = "hard_reset", default_value = "False", action = ArgAction::Set, value_parser = parse_switch)]
    pub hard_reset: bool,

    /// Back up data before deletion
    #[arg(long, alias = "make_backup", default_value = "True", action = ArgAction::Set, value_parser = parse_switch)]
    pub make_backup: bool,
}

#[derive(Args, Debug)]
pub struct LoadbotArgs {
    /// The jsonrpc endpoint
    #[arg(long)]
    pub jsonrpc: String,

    /// The sender address. Its keys must be set in the environment.
    #[arg(long)]
    pub sender: String,

    /// The receiver address
    #[arg(long, default_value = NULL_ADDRESS)]
    pub receiver: String,

    /// Transactions per second
    #[arg(long, default_value_t = 100)]
    pub tps: u64,

    /// Total number of transactions
    #[arg(long, default_value_t = 2000)]
    pub count: u64,
}

/// `True`, `true` and `y` switch on; anything else switches off.
fn parse_switch(value: &str) -> Result<bool, String> {
    Ok(matches!(value, "True" | "true" | "y"))
}
