//! Secure object storage service.
//!
//! This module provides a provider-agnostic interface for persisting files
//! to remote object storage:
//! - Two interchangeable backends (GCS bucket store, CDN media platform)
//! - At-rest encryption of sensitive files before upload
//! - Public and time-limited signed download URLs
//! - Folder routing from content attributes
//!
//! Application code talks only to [`ObjectStorage`]; both backends expose
//! byte-for-byte the same operation set, so callers are fully
//! backend-agnostic. Only URL shape and signature algorithm differ, and
//! those are contained within each backend.

pub mod config;
mod error;
mod gcs;
mod media;
pub mod routing;
pub mod signing;
mod staging;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub use config::{StorageConfig, StorageProvider, normalize_private_key};
pub use error::StorageError;
pub use gcs::GcsStorage;
pub use media::MediaStorage;
pub use routing::{Category, MediaKind, Visibility, route_folder};
pub use staging::{StagedCiphertext, stage_encrypted, stage_encrypted_in};

/// Deliverable asset kind, needed by the CDN backend to construct URLs.
///
/// The bucket backend ignores it; its URLs are resource-type agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceType {
    /// Photographic or graphic content.
    #[default]
    Image,
    /// Video content.
    Video,
    /// Generic media (documents, archives, anything else).
    Raw,
}

impl ResourceType {
    /// Provider path segment for this asset kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Raw => "raw",
        }
    }
}

impl FromStr for ResourceType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "raw" => Ok(Self::Raw),
            other => Err(StorageError::AssetResolution {
                resource_type: other.to_string(),
            }),
        }
    }
}

/// Polymorphic storage backend.
///
/// A closed set of exactly two implementations, selected by configuration at
/// construction. All state (client handles, credentials) is set once and
/// immutable afterwards, so a single instance is safe for concurrent use.
pub enum ObjectStorage {
    /// Bucket-style object store (Google Cloud Storage).
    Gcs(GcsStorage),
    /// CDN-style media platform (Cloudinary-compatible).
    Media(MediaStorage),
}

impl ObjectStorage {
    /// Construct the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized from the
    /// credential bundle.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match &config.provider {
            StorageProvider::Gcs {
                bucket,
                client_email,
                private_key,
            } => Ok(Self::Gcs(GcsStorage::new(
                bucket.clone(),
                client_email,
                private_key,
            )?)),
            StorageProvider::Media {
                cloud_name,
                api_key,
                api_secret,
            } => Ok(Self::Media(MediaStorage::new(
                cloud_name.clone(),
                api_key.clone(),
                api_secret.clone(),
            ))),
        }
    }

    /// Upload a local file into `dest_folder`. Returns the ObjectID.
    ///
    /// The ObjectID is sufficient on its own for later deletion and URL
    /// construction.
    pub async fn upload(
        &self,
        local_path: &Path,
        dest_folder: &str,
    ) -> Result<String, StorageError> {
        match self {
            Self::Gcs(backend) => backend.upload(local_path, dest_folder).await,
            Self::Media(backend) => backend.upload(local_path, dest_folder).await,
        }
    }

    /// Encrypt a local file with `passphrase`, then upload the ciphertext.
    ///
    /// The staged ciphertext file is removed on every exit path, including
    /// upload failure. There is no partial success: either the remote object
    /// exists and its ObjectID is returned, or an error is returned.
    pub async fn upload_encrypted(
        &self,
        local_path: &Path,
        dest_folder: &str,
        passphrase: &str,
    ) -> Result<String, StorageError> {
        let staged = stage_encrypted(local_path, passphrase).await?;
        let object_id = self.upload(staged.path(), dest_folder).await?;
        // The guard drops here, removing the staged file; it also drops on
        // the error paths above.
        Ok(object_id)
    }

    /// Delete an object by its ObjectID.
    ///
    /// A missing object is surfaced as an error, not silent success.
    pub async fn delete(&self, object_id: &str) -> Result<(), StorageError> {
        match self {
            Self::Gcs(backend) => backend.delete(object_id).await,
            Self::Media(backend) => backend.delete(object_id).await,
        }
    }

    /// Durable, unsigned, publicly-resolvable URL for an object.
    pub fn download_url(
        &self,
        object_id: &str,
        resource_type: ResourceType,
    ) -> Result<String, StorageError> {
        match self {
            Self::Gcs(backend) => backend.download_url(object_id),
            Self::Media(backend) => backend.download_url(object_id, resource_type),
        }
    }

    /// Time-limited authorized URL, expiring `expiry` from now.
    pub async fn secure_download_url(
        &self,
        object_id: &str,
        resource_type: ResourceType,
        expiry: Duration,
    ) -> Result<String, StorageError> {
        match self {
            Self::Gcs(backend) => backend.secure_download_url(object_id, expiry).await,
            Self::Media(backend) => backend.secure_download_url(object_id, resource_type, expiry),
        }
    }

    /// Name of the active backend, for diagnostics.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Gcs(_) => "gcs",
            Self::Media(_) => "media",
        }
    }
}
