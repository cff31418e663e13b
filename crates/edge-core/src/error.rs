//! Error types.
//!
//! [`SourceError`] covers reading the node and premine tables. [`EdgeError`]
//! covers everything that touches the SDK, the filesystem layout or the
//! running process.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::config::ConfigError;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    NodeList,
    PremineList,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::NodeList => write!(f, "node list"),
            SourceKind::PremineList => write!(f, "premine list"),
        }
    }
}

/// Failures while loading an input table. All of them abort the load.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input path does not exist.
    #[error("{kind} file not found at {}. Path may be wrong.", .path.display())]
    SourceNotFound { kind: SourceKind, path: PathBuf },

    /// A row has the wrong shape or an unusable field.
    #[error("{kind}: malformed row at line {line}: {reason}")]
    MalformedRow {
        kind: SourceKind,
        line: u64,
        reason: String,
    },

    /// The underlying reader failed.
    #[error("{kind}: failed to read input: {source}")]
    Read {
        kind: SourceKind,
        #[source]
        source: csv::Error,
    },
}

/// Failures of helper operations.
#[derive(Debug, Error)]
pub enum EdgeError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The SDK binary has not been installed yet.
    #[error("SDK binary not found at {}. Run `init` first.", .0.display())]
    SdkMissing(PathBuf),

    /// The SDK exited with a failure status.
    #[error("`{program} {subcommand}` failed with {status}")]
    SdkFailed {
        program: String,
        subcommand: String,
        status: ExitStatus,
    },

    /// Download of the release archive failed.
    #[error("Unable to download the SDK from {url}: {reason}")]
    Download { url: String, reason: String },

    /// The release archive does not contain the expected binary.
    #[error("Archive does not contain `{0}`")]
    BinaryNotInArchive(String),

    /// `genesis.json` or the data directory is absent.
    #[error("Blockchain data not consistent: {} or {} missing", .data_dir.display(), .genesis.display())]
    ChainDataMissing { data_dir: PathBuf, genesis: PathBuf },

    /// The folder given to `restore` is not a usable backup.
    #[error("Backup not found at {}. Please check the given path.", .0.display())]
    BackupNotFound(PathBuf),

    #[error("Node is already running with pid {0}")]
    NodeAlreadyRunning(i32),

    #[error("Node seems to be inactive")]
    NodeNotRunning,

    /// The loadbot endpoint is not a usable URL.
    #[error("Endpoint url `{0}` is not valid")]
    InvalidEndpoint(String),

    #[error("Failed to signal process {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: nix::Error,
    },

    #[error("Failed to copy {}: {reason}", .path.display())]
    Copy { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EdgeError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| EdgeError::Io { path, source }
    }
}
