//! CDN media platform backend (Cloudinary-compatible API).
//!
//! Uploads are folder-scoped signed multipart requests; the provider assigns
//! the object identifier. Delivery URLs are rendered locally, and
//! time-limited access is authorized by a locally computed signature the
//! provider's edge verifies, no signing round-trip is made.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use super::ResourceType;
use super::error::StorageError;
use super::signing;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// CDN media platform backend.
pub struct MediaStorage {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base: String,
    delivery_base: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    #[serde(default)]
    result: String,
}

impl MediaStorage {
    /// Create a new backend from an API credential bundle.
    #[must_use]
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
        }
    }

    /// Override the provider base URLs. Test seam for stub servers.
    #[must_use]
    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        delivery_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.delivery_base = delivery_base.into();
        self
    }

    /// Upload a local file into `dest_folder`.
    ///
    /// The provider assigns the object identifier; a response without one is
    /// rejected as [`StorageError::EmptyObjectId`].
    pub async fn upload(
        &self,
        local_path: &Path,
        dest_folder: &str,
    ) -> Result<String, StorageError> {
        let data = tokio::fs::read(local_path)
            .await
            .map_err(|err| StorageError::FileRead {
                path: local_path.to_path_buf(),
                source: err,
            })?;
        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("file")
            .to_string();

        let timestamp = Utc::now().timestamp().to_string();
        let signature = signing::api_signature(
            &[("folder", dest_folder), ("timestamp", &timestamp)],
            &self.api_secret,
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(data).file_name(file_name),
            )
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", dest_folder.to_string())
            .text("signature", signature);

        let url = format!("{}/{}/auto/upload", self.api_base, self.cloud_name);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| StorageError::upload(local_path.display().to_string(), err))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::upload(
                local_path.display().to_string(),
                format!("provider returned {status}: {body}"),
            ));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| StorageError::upload(local_path.display().to_string(), err))?;

        match body.public_id {
            Some(public_id) if !public_id.is_empty() => {
                tracing::debug!(object = %public_id, folder = %dest_folder, "uploaded media asset");
                Ok(public_id)
            }
            _ => Err(StorageError::EmptyObjectId {
                folder: dest_folder.to_string(),
            }),
        }
    }

    /// Delete an asset by its ObjectID.
    ///
    /// The destroy endpoint is resource-typed; the contract passes only the
    /// ObjectID, so image assets are assumed. Any provider result other than
    /// `ok` (including `not found`) is surfaced as an error.
    pub async fn delete(&self, object_id: &str) -> Result<(), StorageError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = signing::api_signature(
            &[("public_id", object_id), ("timestamp", &timestamp)],
            &self.api_secret,
        );

        let url = format!(
            "{}/{}/{}/destroy",
            self.api_base,
            self.cloud_name,
            ResourceType::Image.as_str()
        );
        let response = self
            .http
            .post(&url)
            .form(&[
                ("public_id", object_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .map_err(|err| StorageError::delete(object_id, err))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(StorageError::delete(
                object_id,
                format!("provider returned {status}"),
            ));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|err| StorageError::delete(object_id, err))?;

        if body.result != "ok" {
            return Err(StorageError::delete(
                object_id,
                format!("provider result '{}'", body.result),
            ));
        }

        tracing::debug!(object = %object_id, "deleted media asset");
        Ok(())
    }

    /// Durable, unsigned, publicly-resolvable delivery URL for an asset.
    pub fn download_url(
        &self,
        object_id: &str,
        resource_type: ResourceType,
    ) -> Result<String, StorageError> {
        if object_id.is_empty() {
            return Err(StorageError::UrlConstruction {
                object: String::new(),
                reason: "empty object id".to_string(),
            });
        }

        Ok(format!(
            "{}/{}/{}/upload/{}",
            self.delivery_base,
            self.cloud_name,
            resource_type.as_str(),
            object_id
        ))
    }

    /// Time-limited authenticated delivery URL, expiring `expiry` from now.
    pub fn secure_download_url(
        &self,
        object_id: &str,
        resource_type: ResourceType,
        expiry: Duration,
    ) -> Result<String, StorageError> {
        if object_id.is_empty() {
            return Err(StorageError::UrlConstruction {
                object: String::new(),
                reason: "empty object id".to_string(),
            });
        }

        let expires_at = signing::expires_at(expiry);
        let segment = signing::authenticated_path_segment(object_id, expires_at, &self.api_secret);

        Ok(format!(
            "{}/{}/{}/authenticated/{}",
            self.delivery_base,
            self.cloud_name,
            resource_type.as_str(),
            segment
        ))
    }

    /// Cloud name this backend uploads into.
    #[must_use]
    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "shhh-secret";

    fn stub_backend(server: &MockServer) -> MediaStorage {
        MediaStorage::new("demo", "api-key", SECRET)
            .with_base_urls(server.uri(), "https://res.example.com")
    }

    async fn write_fixture(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
        let local = dir.path().join(name);
        tokio::fs::write(&local, data).await.unwrap();
        local
    }

    #[tokio::test]
    async fn test_upload_returns_provider_assigned_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/auto/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": "private/restricted/images/xk29fa",
                "resource_type": "image",
            })))
            .mount(&server)
            .await;

        let backend = stub_backend(&server);
        let dir = tempfile::tempdir().unwrap();
        let local = write_fixture(&dir, "passport.png", b"scan").await;

        let object_id = backend
            .upload(&local, "private/restricted/images")
            .await
            .unwrap();
        assert_eq!(object_id, "private/restricted/images/xk29fa");
    }

    #[tokio::test]
    async fn test_upload_without_public_id_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/auto/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let backend = stub_backend(&server);
        let dir = tempfile::tempdir().unwrap();
        let local = write_fixture(&dir, "passport.png", b"scan").await;

        let result = backend.upload(&local, "private/restricted/images").await;
        assert!(matches!(result, Err(StorageError::EmptyObjectId { .. })));
    }

    #[tokio::test]
    async fn test_upload_provider_failure_is_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/auto/upload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = stub_backend(&server);
        let dir = tempfile::tempdir().unwrap();
        let local = write_fixture(&dir, "passport.png", b"scan").await;

        let result = backend.upload(&local, "private/restricted/images").await;
        assert!(matches!(result, Err(StorageError::Upload { .. })));
    }

    #[tokio::test]
    async fn test_delete_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/destroy"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "ok"})),
            )
            .mount(&server)
            .await;

        let backend = stub_backend(&server);
        backend.delete("abc123xyz").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_not_found_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/destroy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"result": "not found"})),
            )
            .mount(&server)
            .await;

        let backend = stub_backend(&server);
        let result = backend.delete("never-uploaded").await;
        assert!(matches!(result, Err(StorageError::Delete { .. })));
    }

    #[test]
    fn test_download_url_by_resource_type() {
        let backend =
            MediaStorage::new("demo", "api-key", SECRET).with_base_urls("unused", "https://res.example.com");

        assert_eq!(
            backend.download_url("abc123xyz", ResourceType::Image).unwrap(),
            "https://res.example.com/demo/image/upload/abc123xyz"
        );
        assert_eq!(
            backend.download_url("abc123xyz", ResourceType::Video).unwrap(),
            "https://res.example.com/demo/video/upload/abc123xyz"
        );
        assert_eq!(
            backend.download_url("abc123xyz", ResourceType::Raw).unwrap(),
            "https://res.example.com/demo/raw/upload/abc123xyz"
        );
    }

    #[test]
    fn test_download_url_rejects_empty_object_id() {
        let backend = MediaStorage::new("demo", "api-key", SECRET);
        assert!(matches!(
            backend.download_url("", ResourceType::Image),
            Err(StorageError::UrlConstruction { .. })
        ));
    }

    #[test]
    fn test_secure_download_url_embeds_expiry_and_signature() {
        let backend =
            MediaStorage::new("demo", "api-key", SECRET).with_base_urls("unused", "https://res.example.com");

        let before = Utc::now().timestamp();
        let url = backend
            .secure_download_url("abc123xyz", ResourceType::Image, Duration::from_secs(600))
            .unwrap();
        let after = Utc::now().timestamp();

        let expires_at = url
            .split("/expires_")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .and_then(|ts| ts.parse::<i64>().ok())
            .expect("URL embeds an expiry timestamp");
        assert!(expires_at >= before + 600 && expires_at <= after + 600);

        let expected = signing::delivery_signature("abc123xyz", expires_at, SECRET);
        assert_eq!(
            url,
            format!(
                "https://res.example.com/demo/image/authenticated/s--{expected}--/expires_{expires_at}/abc123xyz"
            )
        );
    }
}
