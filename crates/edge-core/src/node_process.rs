//! Node lifecycle management
//!
//! Starts the SDK server in the background, tracks it through a pid file in
//! the workspace and stops it with SIGTERM.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{debug, info, warn};

use crate::chain_data;
use crate::config::{EdgeConfig, LOCALHOST};
use crate::error::EdgeError;
use crate::invocation::SdkInvocation;

/// Lines printed by `status` when no count is given.
pub const DEFAULT_STATUS_LINES: usize = 10;

/// Network settings for `polygon-sdk server`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Address the gRPC and JSON-RPC endpoints bind to. Anything other than
    /// loopback is also announced with `--nat`.
    pub ip: String,
    pub jsonrpc_port: u16,
    pub grpc_port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            ip: LOCALHOST.to_string(),
            jsonrpc_port: 8545,
            grpc_port: 10000,
        }
    }
}

/// What `status` reports for a running node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    pub pid: i32,
    pub log_tail: Vec<String>,
}

/// `polygon-sdk server ... --seal`
pub fn server_invocation(config: &EdgeConfig, options: &ServerOptions) -> SdkInvocation {
    let invocation = SdkInvocation::new(config, "server")
        .args(["--data-dir", config.data_dir_name.as_str()])
        .args(["--chain", config.genesis_file.as_str()])
        .args(["--libp2p", config.libp2p_listen.as_str()])
        .arg("--grpc")
        .arg(format!("{}:{}", options.ip, options.grpc_port))
        .arg("--jsonrpc")
        .arg(format!("{}:{}", options.ip, options.jsonrpc_port));

    let invocation = if options.ip != LOCALHOST {
        invocation.args(["--nat", options.ip.as_str()])
    } else {
        invocation
    };

    invocation.arg("--seal")
}

/// Start the validator in the background and record its pid.
pub fn start_validator(config: &EdgeConfig, options: &ServerOptions) -> Result<i32, EdgeError> {
    if let Some(pid) = running_pid(config)? {
        return Err(EdgeError::NodeAlreadyRunning(pid));
    }
    chain_data::ensure_consistent(config)?;

    let child = server_invocation(config, options).spawn_detached(&config.log_path())?;
    let pid = child.id() as i32;

    let pid_path = config.pid_path();
    fs::write(&pid_path, pid.to_string()).map_err(EdgeError::io(&pid_path))?;

    info!(
        pid,
        log = %config.log_path().display(),
        jsonrpc = %format!("{}:{}", options.ip, options.jsonrpc_port),
        "Validator started"
    );
    Ok(pid)
}

/// Pid of the running node, if any.
///
/// A pid file pointing at a dead process is removed.
pub fn running_pid(config: &EdgeConfig) -> Result<Option<i32>, EdgeError> {
    let pid_path = config.pid_path();
    let raw = match fs::read_to_string(&pid_path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(EdgeError::io(&pid_path)(err)),
    };

    let pid = match raw.trim().parse::<i32>() {
        Ok(pid) if pid > 0 => pid,
        _ => {
            warn!(path = %pid_path.display(), "Ignoring unreadable pid file");
            remove_pid_file(config)?;
            return Ok(None);
        }
    };

    match signal::kill(Pid::from_raw(pid), None) {
        // EPERM: alive but owned by someone else.
        Ok(()) | Err(Errno::EPERM) => Ok(Some(pid)),
        Err(Errno::ESRCH) => {
            debug!(pid, "Removing stale pid file");
            remove_pid_file(config)?;
            Ok(None)
        }
        Err(source) => Err(EdgeError::Signal { pid, source }),
    }
}

/// Send SIGTERM to the running node.
pub fn halt_node(config: &EdgeConfig) -> Result<i32, EdgeError> {
    let pid = running_pid(config)?.ok_or(EdgeError::NodeNotRunning)?;
    debug!(pid, "Node pid");

    signal::kill(Pid::from_raw(pid), Signal::SIGTERM)
        .map_err(|source| EdgeError::Signal { pid, source })?;
    remove_pid_file(config)?;

    info!(pid, "Sent SIGTERM to node");
    Ok(pid)
}

/// Pid and the last `lines` lines of the node log.
pub fn node_status(config: &EdgeConfig, lines: usize) -> Result<NodeStatus, EdgeError> {
    let pid = running_pid(config)?.ok_or(EdgeError::NodeNotRunning)?;

    let log_path = config.log_path();
    let log_tail = match File::open(&log_path) {
        Ok(file) => tail(BufReader::new(file), lines).map_err(EdgeError::io(&log_path))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(EdgeError::io(&log_path)(err)),
    };

    Ok(NodeStatus { pid, log_tail })
}

fn tail<R: BufRead>(reader: R, lines: usize) -> io::Result<Vec<String>> {
    let mut window = VecDeque::new();
    for line in reader.lines() {
        let line = line?;
        if window.len() == lines {
            window.pop_front();
        }
        if lines > 0 {
            window.push_back(line);
        }
    }
    Ok(window.into())
}

fn remove_pid_file(config: &EdgeConfig) -> Result<(), EdgeError> {
    let pid_path = config.pid_path();
    match fs::remove_file(&pid_path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(EdgeError::io(&pid_path)(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> EdgeConfig {
        EdgeConfig {
            workspace_dir: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_server_invocation_localhost() {
        let config = EdgeConfig::default();
        let invocation = server_invocation(&config, &ServerOptions::default());
        assert_eq!(
            invocation.arguments(),
            &[
                "server",
                "--data-dir",
                "data-dir",
                "--chain",
                "genesis.json",
                "--libp2p",
                "0.0.0.0:1478",
                "--grpc",
                "127.0.0.1:10000",
                "--jsonrpc",
                "127.0.0.1:8545",
                "--seal",
            ]
        );
    }

    #[test]
    fn test_server_invocation_public_ip_adds_nat() {
        let config = EdgeConfig::default();
        let options = ServerOptions {
            ip: "203.0.113.7".into(),
            ..Default::default()
        };
        let args = server_invocation(&config, &options).arguments().to_vec();
        let nat = args.iter().position(|a| a == "--nat").unwrap();
        assert_eq!(args[nat + 1], "203.0.113.7");
        assert_eq!(args.last().unwrap(), "--seal");
    }

    #[test]
    fn test_no_pid_file_means_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        assert_eq!(running_pid(&config).unwrap(), None);
        assert!(matches!(halt_node(&config), Err(EdgeError::NodeNotRunning)));
        assert!(matches!(node_status(&config, 10), Err(EdgeError::NodeNotRunning)));
    }

    #[test]
    fn test_garbage_pid_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        fs::write(config.pid_path(), "not-a-pid").unwrap();

        assert_eq!(running_pid(&config).unwrap(), None);
        assert!(!config.pid_path().exists());
    }

    #[test]
    fn test_status_of_live_process() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        // The test process itself stands in for the node.
        let pid = std::process::id() as i32;
        fs::write(config.pid_path(), pid.to_string()).unwrap();
        let log: String = (1..=15).map(|i| format!("line {}\n", i)).collect();
        fs::write(config.log_path(), log).unwrap();

        let status = node_status(&config, 3).unwrap();
        assert_eq!(status.pid, pid);
        assert_eq!(status.log_tail, vec!["line 13", "line 14", "line 15"]);
    }

    #[test]
    fn test_start_requires_chain_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let err = start_validator(&config, &ServerOptions::default()).unwrap_err();
        assert!(matches!(err, EdgeError::ChainDataMissing { .. }));
    }

    #[test]
    fn test_tail_with_huge_window() {
        let lines = tail("a\nb\n".as_bytes(), usize::MAX).unwrap();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_tail_shorter_than_window() {
        let lines = tail("a\nb\n".as_bytes(), 10).unwrap();
        assert_eq!(lines, vec!["a", "b"]);
        assert!(tail("a\nb\n".as_bytes(), 0).unwrap().is_empty());
    }
}
