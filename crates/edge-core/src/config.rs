//! # Edge Configuration
//!
//! Everything the helper needs to know about where the SDK lives and how it
//! is invoked. Passed explicitly into every operation.
//!
//! ## Layout on disk
//!
//! ```text
//! <workspace_dir>/
//! ├── polygon-sdk        SDK binary extracted from the release archive
//! ├── data-dir/          node secrets and chain database
//! ├── genesis.json       written by `polygon-sdk genesis`
//! ├── node.info          output of `secrets init`
//! ├── node.log           stdout/stderr of the running server
//! └── node.pid           pid of the running server
//! ```

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Release archive of the SDK.
pub const DEFAULT_SDK_URL: &str = "https://github.com/0xPolygon/polygon-edge/releases/download/v0.1.0/polygon-sdk_0.1.0_linux_amd64.tar.gz";

/// Default libp2p port.
pub const DEFAULT_P2P_PORT: u16 = 1478;

/// Loopback address. `--nat` is only passed for other addresses.
pub const LOCALHOST: &str = "127.0.0.1";

/// Receiver used by the loadbot when none is given.
pub const NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is empty.
    #[error("Configuration value `{0}` must not be empty")]
    Empty(&'static str),
}

/// Complete helper configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeConfig {
    /// Where the SDK release archive is downloaded from.
    pub sdk_url: String,
    /// Working directory holding the binary and all chain data.
    pub workspace_dir: PathBuf,
    /// File name of the SDK binary inside the archive and the workspace.
    pub binary_name: String,
    /// Name of the node data directory inside the workspace.
    pub data_dir_name: String,
    /// Name of the genesis file inside the workspace.
    pub genesis_file: String,
    /// Consensus engine passed to `genesis --consensus`.
    pub consensus: String,
    /// Block gas limit passed to `genesis`. `None` leaves the SDK default.
    pub block_gas_limit: Option<u64>,
    /// libp2p listen address for the server.
    pub libp2p_listen: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            sdk_url: DEFAULT_SDK_URL.to_string(),
            workspace_dir: PathBuf::from("edge"),
            binary_name: "polygon-sdk".to_string(),
            data_dir_name: "data-dir".to_string(),
            genesis_file: "genesis.json".to_string(),
            consensus: "ibft".to_string(),
            block_gas_limit: Some(9_000_000),
            libp2p_listen: format!("0.0.0.0:{}", DEFAULT_P2P_PORT),
        }
    }
}

impl EdgeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EDGE_SDK_URL`: release archive URL
    /// - `EDGE_HOME`: workspace directory (default: edge)
    /// - `EDGE_SDK_BINARY`: binary name (default: polygon-sdk)
    /// - `EDGE_BLOCK_GAS_LIMIT`: block gas limit, `0` to omit (default: 9000000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            sdk_url: env::var("EDGE_SDK_URL").unwrap_or(defaults.sdk_url),

            workspace_dir: env::var("EDGE_HOME")
                .map(PathBuf::from)
                .unwrap_or(defaults.workspace_dir),

            binary_name: env::var("EDGE_SDK_BINARY").unwrap_or(defaults.binary_name),

            block_gas_limit: match env::var("EDGE_BLOCK_GAS_LIMIT")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
            {
                Some(0) => None,
                Some(limit) => Some(limit),
                None => defaults.block_gas_limit,
            },

            ..defaults
        }
    }

    /// Reject settings that would produce nonsensical paths or commands.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.binary_name.is_empty() {
            return Err(ConfigError::Empty("binary_name"));
        }
        if self.workspace_dir.as_os_str().is_empty() {
            return Err(ConfigError::Empty("workspace_dir"));
        }
        if self.data_dir_name.is_empty() {
            return Err(ConfigError::Empty("data_dir_name"));
        }
        if self.genesis_file.is_empty() {
            return Err(ConfigError::Empty("genesis_file"));
        }
        Ok(())
    }

    /// Path of the SDK binary.
    pub fn binary_path(&self) -> PathBuf {
        self.workspace_dir.join(&self.binary_name)
    }

    /// Path of the node data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.workspace_dir.join(&self.data_dir_name)
    }

    /// Path of `genesis.json`.
    pub fn genesis_path(&self) -> PathBuf {
        self.workspace_dir.join(&self.genesis_file)
    }

    /// Where `secrets init` output is stored.
    pub fn node_info_path(&self) -> PathBuf {
        self.workspace_dir.join("node.info")
    }

    /// Server log file.
    pub fn log_path(&self) -> PathBuf {
        self.workspace_dir.join("node.log")
    }

    /// Pid file of the running server.
    pub fn pid_path(&self) -> PathBuf {
        self.workspace_dir.join("node.pid")
    }

    /// Temporary location of the downloaded archive.
    pub fn archive_path(&self) -> PathBuf {
        self.workspace_dir.join("edge.tar.gz")
    }
}
