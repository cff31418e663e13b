//! # Genesis Command Builder
//!
//! Derives the arguments of `polygon-sdk genesis` from the node list and an
//! optional premine list.
//!
//! ## Argument order
//!
//! ```text
//! --ibft-validator=<key>         every node, input order
//! --bootnode=<multiaddr>         every bootnode, input order
//! --premine=<account>:<balance>  every premine entry, input order
//! ```
//!
//! The SDK does not care about the order of these flags; the grouping above
//! is fixed so the output is reproducible.
//!
//! ## Invocation
//!
//! 1. Load the node list (and premine list, if given)
//! 2. Build the argument list; nothing is emitted if any row is bad
//! 3. Run `genesis --consensus <engine> <args> [--block-gas-limit <n>]`
//!    inside the workspace, which writes `genesis.json` there

use std::path::Path;

use tracing::info;

use crate::config::EdgeConfig;
use crate::error::{EdgeError, SourceError};
use crate::invocation::SdkInvocation;
use crate::node_list::{load_node_list, NodeRecord};
use crate::premine::{load_premine_list, PremineEntry};

pub const VALIDATOR_FLAG: &str = "--ibft-validator";
pub const BOOTNODE_FLAG: &str = "--bootnode";
pub const PREMINE_FLAG: &str = "--premine";

/// Derived genesis arguments plus the counts reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisCommand {
    /// Nodes flagged as bootnodes.
    pub bootnode_count: usize,
    /// Every node is a validator.
    pub validator_count: usize,
    /// Argument tokens, one `--flag=value` per token.
    pub args: Vec<String>,
}

impl GenesisCommand {
    /// Full SDK invocation for these arguments.
    pub fn invocation(&self, config: &EdgeConfig) -> SdkInvocation {
        let invocation = SdkInvocation::new(config, "genesis")
            .args(["--consensus", config.consensus.as_str()])
            .args(self.args.iter().cloned());

        match config.block_gas_limit {
            Some(limit) => invocation.args(["--block-gas-limit".to_string(), limit.to_string()]),
            None => invocation,
        }
    }

    /// Arguments carrying the given flag, e.g. [`BOOTNODE_FLAG`].
    pub fn args_with_flag<'a>(&'a self, flag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.args
            .iter()
            .filter_map(move |arg| arg.strip_prefix(flag)?.strip_prefix('='))
    }
}

/// Builder for [`GenesisCommand`].
#[derive(Debug, Clone, Copy)]
pub struct GenesisBuilder<'a> {
    nodes: &'a [NodeRecord],
    premine: &'a [PremineEntry],
}

impl<'a> GenesisBuilder<'a> {
    pub fn new(nodes: &'a [NodeRecord]) -> Self {
        Self {
            nodes,
            premine: &[],
        }
    }

    pub fn with_premine(mut self, premine: &'a [PremineEntry]) -> Self {
        self.premine = premine;
        self
    }

    pub fn build(self) -> GenesisCommand {
        let mut validators = Vec::with_capacity(self.nodes.len());
        let mut bootnodes = Vec::new();

        for node in self.nodes {
            if node.is_bootnode {
                bootnodes.push(format!("{}={}", BOOTNODE_FLAG, node.multiaddr()));
            }
            validators.push(format!("{}={}", VALIDATOR_FLAG, node.validator_key));
        }

        let bootnode_count = bootnodes.len();
        let validator_count = validators.len();

        let mut args = validators;
        args.append(&mut bootnodes);
        args.extend(
            self.premine
                .iter()
                .map(|entry| format!("{}={}", PREMINE_FLAG, entry)),
        );

        GenesisCommand {
            bootnode_count,
            validator_count,
            args,
        }
    }
}

/// Load both tables and derive the genesis arguments.
///
/// A premine path that is given but absent is an error, same as a missing
/// node list.
pub fn load_genesis_command(
    node_list: &Path,
    premine_list: Option<&Path>,
) -> Result<GenesisCommand, SourceError> {
    let nodes = load_node_list(node_list)?;
    let premine = match premine_list {
        Some(path) => {
            let entries = load_premine_list(path)?;
            info!(entries = entries.len(), "Found premine file");
            entries
        }
        None => Vec::new(),
    };

    Ok(GenesisBuilder::new(&nodes).with_premine(&premine).build())
}

/// Generate `genesis.json` in the workspace.
pub fn generate_genesis(
    config: &EdgeConfig,
    node_list: &Path,
    premine_list: Option<&Path>,
) -> Result<GenesisCommand, EdgeError> {
    let command = load_genesis_command(node_list, premine_list)?;
    info!(
        "Found {} bootnodes out of {}.",
        command.bootnode_count, command.validator_count
    );

    command.invocation(config).run()?;
    info!(
        genesis = %config.genesis_path().display(),
        "Now you need to give the genesis file to the other nodes, so that they can use it to start the chain."
    );

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(address: &str, peer_id: &str, key: &str, is_bootnode: bool) -> NodeRecord {
        NodeRecord {
            address: address.into(),
            peer_id: peer_id.into(),
            validator_key: key.into(),
            port: 1478,
            is_bootnode,
        }
    }

    #[test]
    fn test_counts_and_order() {
        let nodes = vec![
            node("10.0.0.1", "QmA", "keyA", true),
            node("10.0.0.2", "QmB", "keyB", false),
            node("10.0.0.3", "QmC", "keyC", true),
        ];
        let command = GenesisBuilder::new(&nodes).build();

        assert_eq!(command.bootnode_count, 2);
        assert_eq!(command.validator_count, 3);
        assert_eq!(
            command.args,
            vec![
                "--ibft-validator=keyA",
                "--ibft-validator=keyB",
                "--ibft-validator=keyC",
                "--bootnode=/ip4/10.0.0.1/tcp/1478/p2p/QmA",
                "--bootnode=/ip4/10.0.0.3/tcp/1478/p2p/QmC",
            ]
        );
    }

    #[test]
    fn test_premine_comes_last() {
        let nodes = vec![node("10.0.0.1", "QmA", "keyA", true)];
        let premine = vec![PremineEntry {
            account: "0xabc".into(),
            balance: "1000".into(),
        }];
        let command = GenesisBuilder::new(&nodes).with_premine(&premine).build();

        assert_eq!(command.args.last().unwrap(), "--premine=0xabc:1000");
        assert_eq!(command.args_with_flag(PREMINE_FLAG).collect::<Vec<_>>(), vec!["0xabc:1000"]);
    }

    #[test]
    fn test_empty_node_list() {
        let command = GenesisBuilder::new(&[]).build();
        assert_eq!(command.bootnode_count, 0);
        assert_eq!(command.validator_count, 0);
        assert!(command.args.is_empty());
    }

    #[test]
    fn test_args_with_flag_does_not_match_prefixes() {
        let command = GenesisCommand {
            bootnode_count: 0,
            validator_count: 0,
            args: vec!["--bootnodes=x".into(), "--bootnode=y".into()],
        };
        assert_eq!(command.args_with_flag(BOOTNODE_FLAG).collect::<Vec<_>>(), vec!["y"]);
    }

    #[test]
    fn test_invocation_wraps_args() {
        let nodes = vec![node("10.0.0.1", "QmA", "keyA", true)];
        let command = GenesisBuilder::new(&nodes).build();
        let config = EdgeConfig::default();

        assert_eq!(
            command.invocation(&config).arguments(),
            &[
                "genesis",
                "--consensus",
                "ibft",
                "--ibft-validator=keyA",
                "--bootnode=/ip4/10.0.0.1/tcp/1478/p2p/QmA",
                "--block-gas-limit",
                "9000000",
            ]
        );
    }

    #[test]
    fn test_invocation_without_gas_limit() {
        let config = EdgeConfig {
            block_gas_limit: None,
            ..Default::default()
        };
        let command = GenesisBuilder::new(&[]).build();
        assert_eq!(
            command.invocation(&config).arguments(),
            &["genesis", "--consensus", "ibft"]
        );
    }
}
