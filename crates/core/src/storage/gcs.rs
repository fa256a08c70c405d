//! Bucket storage backend over Google Cloud Storage.
//!
//! Objects are addressed by their full bucket path; the path returned from
//! an upload is the ObjectID and is sufficient on its own for deletion and
//! URL construction. Signed URLs are delegated to the provider's native
//! canonicalized-request signing via the service account credential.

use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use opendal::{Operator, services};

use super::config::normalize_private_key;
use super::error::StorageError;
use super::routing;

/// Google Cloud Storage backend.
///
/// Holds two operators built once at construction: one applying a
/// public-read ACL for non-private uploads, one private. Both handles are
/// immutable afterwards and safe for concurrent use.
pub struct GcsStorage {
    op_public: Operator,
    op_private: Operator,
    bucket: String,
}

impl GcsStorage {
    /// Create a new backend from a service account credential bundle.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] if the operator cannot be
    /// initialized from the credential.
    pub fn new(
        bucket: impl Into<String>,
        client_email: &str,
        private_key: &str,
    ) -> Result<Self, StorageError> {
        let bucket = bucket.into();
        let credential = service_account_credential(client_email, private_key);

        let op_public = build_operator(&bucket, &credential, true)?;
        let op_private = build_operator(&bucket, &credential, false)?;

        Ok(Self {
            op_public,
            op_private,
            bucket,
        })
    }

    /// Build a backend over an existing operator. Test seam.
    #[cfg(test)]
    pub(crate) fn with_operator(op: Operator, bucket: impl Into<String>) -> Self {
        Self {
            op_public: op.clone(),
            op_private: op,
            bucket: bucket.into(),
        }
    }

    /// Upload a local file under `dest_folder`, keyed by its base name.
    ///
    /// Sets a best-effort content type from the file extension and a
    /// public-read access rule when the destination folder is not private.
    /// Returns the object path as the ObjectID.
    pub async fn upload(
        &self,
        local_path: &Path,
        dest_folder: &str,
    ) -> Result<String, StorageError> {
        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                StorageError::upload(local_path.display().to_string(), "path has no file name")
            })?;
        let object_id = format!("{}/{}", dest_folder.trim_end_matches('/'), file_name);

        let data = tokio::fs::read(local_path)
            .await
            .map_err(|err| StorageError::FileRead {
                path: local_path.to_path_buf(),
                source: err,
            })?;

        let op = if routing::is_private_folder(dest_folder) {
            &self.op_private
        } else {
            &self.op_public
        };

        let mut write = op.write_with(&object_id, data);
        if let Some(content_type) = content_type_for(file_name) {
            write = write.content_type(content_type);
        }
        write
            .await
            .map_err(|err| StorageError::upload(object_id.clone(), err))?;

        tracing::debug!(object = %object_id, bucket = %self.bucket, "uploaded object");
        Ok(object_id)
    }

    /// Delete an object by its ObjectID.
    ///
    /// OpenDAL's delete is idempotent; the object is stat'ed first so a
    /// missing object surfaces as an error rather than silent success.
    pub async fn delete(&self, object_id: &str) -> Result<(), StorageError> {
        self.op_private
            .stat(object_id)
            .await
            .map_err(|err| StorageError::delete(object_id, err))?;
        self.op_private
            .delete(object_id)
            .await
            .map_err(|err| StorageError::delete(object_id, err))?;

        tracing::debug!(object = %object_id, bucket = %self.bucket, "deleted object");
        Ok(())
    }

    /// Durable, unsigned, publicly-resolvable URL for an object.
    pub fn download_url(&self, object_id: &str) -> Result<String, StorageError> {
        if object_id.is_empty() {
            return Err(StorageError::UrlConstruction {
                object: String::new(),
                reason: "empty object id".to_string(),
            });
        }

        Ok(format!(
            "https://storage.googleapis.com/storage/v1/b/{}/o/{}?alt=media",
            self.bucket,
            urlencoding::encode(object_id)
        ))
    }

    /// Time-limited signed GET URL, expiring `expiry` from now.
    pub async fn secure_download_url(
        &self,
        object_id: &str,
        expiry: Duration,
    ) -> Result<String, StorageError> {
        let presigned = self
            .op_private
            .presign_read(object_id, expiry)
            .await
            .map_err(|err| StorageError::signing(object_id, err))?;

        Ok(presigned.uri().to_string())
    }

    /// Bucket name this backend writes to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn build_operator(
    bucket: &str,
    credential: &str,
    public_read: bool,
) -> Result<Operator, StorageError> {
    let mut builder = services::Gcs::default().bucket(bucket).credential(credential);
    if public_read {
        builder = builder.predefined_acl("publicRead");
    }

    Ok(Operator::new(builder)
        .map_err(|err| StorageError::configuration(err.to_string()))?
        .finish())
}

/// Assemble the base64 service-account credential OpenDAL expects.
fn service_account_credential(client_email: &str, private_key: &str) -> String {
    let json = serde_json::json!({
        "type": "service_account",
        "client_email": client_email,
        "private_key": normalize_private_key(private_key),
    });
    BASE64.encode(json.to_string())
}

/// Best-effort content type from a file extension.
fn content_type_for(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        "mp4" => Some("video/mp4"),
        "doc" => Some("application/msword"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => None,
    }
}
