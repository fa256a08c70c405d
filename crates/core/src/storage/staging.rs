//! Encrypted staging of local files before upload.
//!
//! Private uploads are never sent as plaintext: the source file is read,
//! sealed with the caller's passphrase, and materialized as a uniquely named
//! temporary file that downstream upload logic treats like any other local
//! file. The staged file is owned by a guard that removes it on every exit
//! path, so failed uploads cannot leak ciphertext onto local disk.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::error::StorageError;
use crate::crypto;

/// Guard owning a staged ciphertext file for the duration of one upload.
///
/// Dropping the guard removes the file. Removal failure is logged, never
/// propagated: a cleanup problem after a successful remote write must not
/// invalidate the upload.
#[derive(Debug)]
pub struct StagedCiphertext {
    path: PathBuf,
}

impl StagedCiphertext {
    /// Path of the staged ciphertext file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedCiphertext {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to remove staged ciphertext"
                );
            }
        }
    }
}

/// Encrypt `source` with `passphrase` and stage it in the system temp dir.
pub async fn stage_encrypted(
    source: &Path,
    passphrase: &str,
) -> Result<StagedCiphertext, StorageError> {
    stage_encrypted_in(&std::env::temp_dir(), source, passphrase).await
}

/// Encrypt `source` with `passphrase` and stage it under `dir`.
///
/// The staged file name is unique per call, so concurrent stagings of the
/// same source never collide.
pub async fn stage_encrypted_in(
    dir: &Path,
    source: &Path,
    passphrase: &str,
) -> Result<StagedCiphertext, StorageError> {
    let plaintext = tokio::fs::read(source)
        .await
        .map_err(|err| StorageError::FileRead {
            path: source.to_path_buf(),
            source: err,
        })?;

    let payload = crypto::encrypt(&plaintext, passphrase)?;

    let path = dir.join(format!("staged-{}.enc", Uuid::new_v4()));
    tokio::fs::write(&path, payload)
        .await
        .map_err(|err| StorageError::FileWrite {
            path: path.clone(),
            source: err,
        })?;

    tracing::debug!(
        source = %source.display(),
        staged = %path.display(),
        "staged encrypted file"
    );

    Ok(StagedCiphertext { path })
}
