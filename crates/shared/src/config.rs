//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Object storage configuration.
    pub storage: StorageSettings,
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Provider credential bundle.
    pub provider: StorageProviderSettings,
    /// Signed download URL lifetime in seconds.
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_secs: u64,
}

/// Credential bundle for a storage provider.
///
/// Exactly one provider is active per deployment; the storage core turns
/// this into its typed backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProviderSettings {
    /// Google Cloud Storage bucket.
    Gcs {
        /// Bucket name.
        bucket: String,
        /// Service account email.
        client_email: String,
        /// Service account private key (PEM, possibly with escaped newlines).
        private_key: String,
    },
    /// CDN media platform (Cloudinary-compatible API).
    Media {
        /// Cloud name identifying the account.
        cloud_name: String,
        /// API key.
        api_key: String,
        /// API secret used for request and delivery-URL signing.
        api_secret: String,
    },
}

fn default_signed_url_ttl() -> u64 {
    3600 // 1 hour
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LOCKBOX").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
