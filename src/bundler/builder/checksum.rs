//! Artifact checksum calculation.
//!
//! SHA-256 for single files (the installer) and for directory trees (the
//! one-folder application bundle).

use crate::{
    bail,
    bundler::{ArtifactKind, BundledArtifact, Result, error::ErrorExt, utils::fs},
};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates SHA256 checksum of a file or directory.
///
/// Returns the hex-encoded digest (64 characters).
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading metadata", path)?;

    if metadata.is_file() {
        calculate_file_sha256(path).await
    } else if metadata.is_dir() {
        calculate_directory_sha256(path).await
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }
}

/// Size and checksum for a produced artifact.
pub async fn describe_artifact(kind: ArtifactKind, path: &Path) -> Result<BundledArtifact> {
    let checksum = calculate_sha256(path).await?;
    let owned = path.to_path_buf();
    let size = tokio::task::spawn_blocking(move || fs::total_size(&owned))
        .await
        .map_err(|e| crate::bundler::Error::GenericError(format!("size task failed: {e}")))??;

    Ok(BundledArtifact {
        kind,
        path: path.to_path_buf(),
        size,
        checksum,
    })
}

async fn calculate_file_sha256(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Hashes every file's relative path and content, in sorted path order.
///
/// Each file contributes its path length, path, content length and content,
/// so no two distinct trees feed the same byte stream. Relative paths use
/// `/` separators so the digest of a bundle does not depend on the host
/// platform.
async fn calculate_directory_sha256(dir_path: &Path) -> Result<String> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir_path).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            entries.push(entry.into_path());
        }
    }
    entries.sort();

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    for path in entries {
        let relative = path.strip_prefix(dir_path)?;
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        hasher.update((relative.len() as u64).to_le_bytes());
        hasher.update(relative.as_bytes());

        let mut file = tokio::fs::File::open(&path)
            .await
            .fs_context("opening file for hashing", &path)?;
        let length = file
            .metadata()
            .await
            .fs_context("reading metadata", &path)?
            .len();
        hasher.update(length.to_le_bytes());
        loop {
            let n = file
                .read(&mut buffer)
                .await
                .fs_context("reading file for hash calculation", &path)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}
