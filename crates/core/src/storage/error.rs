//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::CryptoError;

/// Storage operation errors.
///
/// Every error is terminal for the call that raised it; the service never
/// retries internally. Variants carry the operation's path or object
/// identifier so callers can log a precise cause.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Local source file could not be opened or read.
    #[error("failed to read local file {path}: {source}")]
    FileRead {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Staged ciphertext file could not be written.
    #[error("failed to write staged file {path}: {source}")]
    FileWrite {
        /// Path of the unwritable file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// At-rest encryption failed while staging.
    #[error("encryption failed: {0}")]
    Encryption(#[from] CryptoError),

    /// Provider rejected or failed the upload.
    #[error("upload of {object} failed: {reason}")]
    Upload {
        /// Object path or local file involved.
        object: String,
        /// Underlying transport/provider cause.
        reason: String,
    },

    /// Provider response carried no object identifier.
    #[error("provider returned an empty object id for upload into '{folder}'")]
    EmptyObjectId {
        /// Destination folder of the failed upload.
        folder: String,
    },

    /// Provider rejected or failed the deletion (including "not found").
    #[error("delete of {object} failed: {reason}")]
    Delete {
        /// Object identifier involved.
        object: String,
        /// Underlying transport/provider cause.
        reason: String,
    },

    /// Resource type could not be resolved to a deliverable asset kind.
    #[error("cannot resolve resource type '{resource_type}'")]
    AssetResolution {
        /// The unresolvable resource type.
        resource_type: String,
    },

    /// A well-formed URL could not be constructed for the object.
    #[error("cannot construct URL for '{object}': {reason}")]
    UrlConstruction {
        /// Object identifier involved.
        object: String,
        /// Why construction failed.
        reason: String,
    },

    /// Signing a time-limited URL failed.
    #[error("signing URL for {object} failed: {reason}")]
    Signing {
        /// Object identifier involved.
        object: String,
        /// Underlying signing cause.
        reason: String,
    },

    /// Backend configuration or credentials are invalid.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create an upload error.
    #[must_use]
    pub fn upload(object: impl Into<String>, reason: impl ToString) -> Self {
        Self::Upload {
            object: object.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a delete error.
    #[must_use]
    pub fn delete(object: impl Into<String>, reason: impl ToString) -> Self {
        Self::Delete {
            object: object.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a signing error.
    #[must_use]
    pub fn signing(object: impl Into<String>, reason: impl ToString) -> Self {
        Self::Signing {
            object: object.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
