//! # Chain Data
//!
//! Backup, restore and reset of the node's on-disk state.
//!
//! Chain data is consistent when both `<workspace>/data-dir` and
//! `<workspace>/genesis.json` exist. Every operation here requires that,
//! except restoring into an empty workspace.
//!
//! ## Backup layout
//!
//! ```text
//! <dest>/<prefix>_<unix-millis>/
//! ├── genesis.json
//! └── data-dir/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fs_extra::dir::CopyOptions;
use tracing::{info, warn};

use crate::config::EdgeConfig;
use crate::error::EdgeError;

/// Prefix of the safety backup taken by `reset`.
pub const RESET_BACKUP_PREFIX: &str = "reset";

/// Options for [`reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOptions {
    /// Also delete `genesis.json`.
    pub hard: bool,
    /// Back up into the workspace before deleting anything.
    pub make_backup: bool,
}

impl Default for ResetOptions {
    fn default() -> Self {
        Self {
            hard: false,
            make_backup: true,
        }
    }
}

pub fn is_consistent(config: &EdgeConfig) -> bool {
    config.data_dir().is_dir() && config.genesis_path().is_file()
}

pub(crate) fn ensure_consistent(config: &EdgeConfig) -> Result<(), EdgeError> {
    if is_consistent(config) {
        Ok(())
    } else {
        Err(EdgeError::ChainDataMissing {
            data_dir: config.data_dir(),
            genesis: config.genesis_path(),
        })
    }
}

/// Copy `genesis.json` and the data directory into a new timestamped folder
/// under `dest`. Returns the folder.
pub fn backup(config: &EdgeConfig, dest: &Path, prefix: &str) -> Result<PathBuf, EdgeError> {
    ensure_consistent(config)?;

    let folder = dest.join(format!(
        "{}_{}",
        prefix,
        chrono::Utc::now().timestamp_millis()
    ));
    fs::create_dir_all(&folder).map_err(EdgeError::io(&folder))?;

    copy_chain_data(
        &config.genesis_path(),
        &config.data_dir(),
        &folder,
        &config.genesis_file,
    )?;

    info!(backup = %folder.display(), "Chain data backed up");
    Ok(folder)
}

/// Delete chain data. Returns the safety backup, if one was taken.
pub fn reset(config: &EdgeConfig, options: ResetOptions) -> Result<Option<PathBuf>, EdgeError> {
    ensure_consistent(config)?;

    let backup_folder = if options.make_backup {
        Some(backup(config, &config.workspace_dir, RESET_BACKUP_PREFIX)?)
    } else {
        None
    };

    if options.hard {
        let genesis = config.genesis_path();
        fs::remove_file(&genesis).map_err(EdgeError::io(&genesis))?;
    }
    let data_dir = config.data_dir();
    fs::remove_dir_all(&data_dir).map_err(EdgeError::io(&data_dir))?;

    info!(hard = options.hard, "Chain data deleted");
    Ok(backup_folder)
}

/// Replace chain data with the contents of `backup_path`.
///
/// The backup is checked before anything is touched. Existing chain data is
/// backed up and hard-reset first; the safety backup is returned. A workspace
/// holding only one of the two items is left alone with
/// [`EdgeError::ChainDataMissing`].
pub fn restore(config: &EdgeConfig, backup_path: &Path) -> Result<Option<PathBuf>, EdgeError> {
    let backup_genesis = backup_path.join(&config.genesis_file);
    let backup_data_dir = backup_path.join(&config.data_dir_name);
    if !backup_genesis.is_file() || !backup_data_dir.is_dir() {
        return Err(EdgeError::BackupNotFound(backup_path.to_path_buf()));
    }

    let safety_backup = if is_consistent(config) {
        reset(
            config,
            ResetOptions {
                hard: true,
                make_backup: true,
            },
        )?
    } else if config.data_dir().exists() || config.genesis_path().exists() {
        warn!("Partial chain data present; refusing to restore over it");
        return Err(EdgeError::ChainDataMissing {
            data_dir: config.data_dir(),
            genesis: config.genesis_path(),
        });
    } else {
        None
    };

    fs::create_dir_all(&config.workspace_dir).map_err(EdgeError::io(&config.workspace_dir))?;
    copy_chain_data(
        &backup_genesis,
        &backup_data_dir,
        &config.workspace_dir,
        &config.genesis_file,
    )?;

    info!(backup = %backup_path.display(), "Backup restored");
    Ok(safety_backup)
}

/// Copy a data directory and a genesis file into `into`.
///
/// The data directory goes first so a failed copy never leaves a new
/// genesis next to old chain data.
fn copy_chain_data(
    genesis: &Path,
    data_dir: &Path,
    into: &Path,
    genesis_file: &str,
) -> Result<(), EdgeError> {
    fs_extra::dir::copy(data_dir, into, &CopyOptions::new()).map_err(|err| EdgeError::Copy {
        path: data_dir.to_path_buf(),
        reason: err.to_string(),
    })?;

    let genesis_dest = into.join(genesis_file);
    fs::copy(genesis, &genesis_dest).map_err(EdgeError::io(&genesis_dest))?;
    Ok(())
}
