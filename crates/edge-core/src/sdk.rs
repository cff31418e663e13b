//! # SDK Installation
//!
//! `init` wipes the workspace, downloads the release archive, extracts only
//! the SDK binary and generates the node secrets.
//!
//! ## Sequence
//!
//! 1. Remove any previous workspace (a fresh chain starts from scratch)
//! 2. Download `sdk_url` to `<workspace>/edge.tar.gz`
//! 3. Extract the entry named `binary_name` next to it
//! 4. Delete the archive
//! 5. `secrets init --data-dir data-dir > node.info`

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info};

use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::invocation::SdkInvocation;

/// `polygon-sdk secrets init --data-dir <data-dir>`, stdout to `node.info`.
pub fn secrets_init_invocation(config: &EdgeConfig) -> SdkInvocation {
    SdkInvocation::new(config, "secrets")
        .args(["init", "--data-dir", config.data_dir_name.as_str()])
        .stdout_to(config.node_info_path())
}

/// Download and install the SDK, then generate node secrets.
///
/// Returns the path of the installed binary.
pub async fn init(config: &EdgeConfig) -> Result<PathBuf, EdgeError> {
    config.validate()?;
    let workspace = &config.workspace_dir;

    if workspace.exists() {
        info!(path = %workspace.display(), "Removing previous chain");
        fs::remove_dir_all(workspace).map_err(EdgeError::io(workspace))?;
    }
    fs::create_dir_all(workspace).map_err(EdgeError::io(workspace))?;

    info!(url = %config.sdk_url, "Downloading the SDK.");
    let archive = download(&config.sdk_url).await?;
    let archive_path = config.archive_path();
    fs::write(&archive_path, &archive).map_err(EdgeError::io(&archive_path))?;
    debug!(bytes = archive.len(), path = %archive_path.display(), "Archive saved");

    info!("Extracting the SDK.");
    let file = File::open(&archive_path).map_err(EdgeError::io(&archive_path))?;
    let binary = extract_binary(BufReader::new(file), &config.binary_name, workspace)?;
    fs::remove_file(&archive_path).map_err(EdgeError::io(&archive_path))?;

    info!("Generating secrets.");
    secrets_init_invocation(config).run()?;
    info!(node_info = %config.node_info_path().display(), "Node secrets generated");

    Ok(binary)
}

async fn download(url: &str) -> Result<Vec<u8>, EdgeError> {
    let failed = |reason: String| EdgeError::Download {
        url: url.to_string(),
        reason,
    };

    let response = reqwest::get(url).await.map_err(|e| failed(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(failed(format!("server answered {}", status)));
    }

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Unpack the entry called `binary_name` from a `.tar.gz` stream into `dest`.
///
/// Other entries are skipped. File permissions from the archive are kept.
pub fn extract_binary<R: Read>(
    archive: R,
    binary_name: &str,
    dest: &Path,
) -> Result<PathBuf, EdgeError> {
    let mut archive = Archive::new(GzDecoder::new(archive));
    let entries = archive.entries().map_err(EdgeError::io(dest))?;

    for entry in entries {
        let mut entry = entry.map_err(EdgeError::io(dest))?;
        let is_binary = entry.path().map_err(EdgeError::io(dest))? == Path::new(binary_name);
        if !is_binary {
            continue;
        }

        let target = dest.join(binary_name);
        entry.unpack(&target).map_err(EdgeError::io(&target))?;
        return Ok(target);
    }

    Err(EdgeError::BinaryNotInArchive(binary_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn archive_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (name, body) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *body).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_extracts_only_the_binary() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_with(&[
            ("README.md", b"docs"),
            ("polygon-sdk", b"\x7fELF"),
            ("LICENSE", b"license"),
        ]);

        let path = extract_binary(archive.as_slice(), "polygon-sdk", dir.path()).unwrap();

        assert_eq!(path, dir.path().join("polygon-sdk"));
        assert_eq!(fs::read(&path).unwrap(), b"\x7fELF");
        assert!(!dir.path().join("README.md").exists());
    }

    #[test]
    fn test_missing_binary_in_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_with(&[("README.md", b"docs")]);

        let err = extract_binary(archive.as_slice(), "polygon-sdk", dir.path()).unwrap_err();
        assert!(matches!(err, EdgeError::BinaryNotInArchive(name) if name == "polygon-sdk"));
    }

    #[test]
    fn test_secrets_init_invocation() {
        let config = EdgeConfig::default();
        let invocation = secrets_init_invocation(&config);
        assert_eq!(
            invocation.arguments(),
            &["secrets", "init", "--data-dir", "data-dir"]
        );
        assert_eq!(
            invocation.stdout(),
            &crate::invocation::Stdout::File(config.node_info_path())
        );
    }
}
