//! Load testing through the SDK's `loadbot` subcommand.
//!
//! The sender's keys are read by the SDK from the environment; this module
//! only validates the endpoint and builds the call.

use tracing::info;
use url::Url;

use crate::config::{EdgeConfig, NULL_ADDRESS};
use crate::error::EdgeError;
use crate::invocation::SdkInvocation;

/// Value sent with every loadbot transaction.
const TX_VALUE: &str = "0x100";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadbotOptions {
    /// JSON-RPC endpoint of the chain under test.
    pub jsonrpc: String,
    pub sender: String,
    pub receiver: String,
    /// Transactions per second.
    pub tps: u64,
    /// Total transactions.
    pub count: u64,
}

impl LoadbotOptions {
    pub fn new(jsonrpc: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            jsonrpc: jsonrpc.into(),
            sender: sender.into(),
            receiver: NULL_ADDRESS.to_string(),
            tps: 100,
            count: 2000,
        }
    }
}

/// Parse `endpoint`, accepting absolute http(s) or ws(s) URLs with a host.
pub fn validate_endpoint(endpoint: &str) -> Result<Url, EdgeError> {
    let invalid = || EdgeError::InvalidEndpoint(endpoint.to_string());
    let url = Url::parse(endpoint).map_err(|_| invalid())?;

    let supported = matches!(url.scheme(), "http" | "https" | "ws" | "wss");
    if supported && url.host().is_some() {
        Ok(url)
    } else {
        Err(invalid())
    }
}

/// `polygon-sdk loadbot ...`, after validating the endpoint.
pub fn loadbot_invocation(
    config: &EdgeConfig,
    options: &LoadbotOptions,
) -> Result<SdkInvocation, EdgeError> {
    validate_endpoint(&options.jsonrpc)?;

    Ok(SdkInvocation::new(config, "loadbot")
        .args(["--jsonrpc", options.jsonrpc.as_str()])
        .args(["--sender", options.sender.as_str()])
        .args(["--receiver", options.receiver.as_str()])
        .arg("--count")
        .arg(options.count.to_string())
        .args(["--value", TX_VALUE])
        .arg("--tps")
        .arg(options.tps.to_string()))
}

/// Run the loadbot to completion, streaming its output.
pub fn run_loadbot(config: &EdgeConfig, options: &LoadbotOptions) -> Result<(), EdgeError> {
    let invocation = loadbot_invocation(config, options)?;
    info!(
        jsonrpc = %options.jsonrpc,
        tps = options.tps,
        count = options.count,
        "Starting loadbot"
    );
    invocation.run()
}
