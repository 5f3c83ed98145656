//! Storage configuration types.

use super::error::StorageError;
use depot_shared::{AppConfig, StorageBackend};

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageBackend,
    /// Bucket that uploads land in.
    pub bucket: String,
    /// Base URL under which objects are publicly reachable.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Create a new storage config.
    #[must_use]
    pub fn new(
        provider: StorageBackend,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Build from application settings.
    ///
    /// An S3 provider without an endpoint points at the Supabase project's
    /// S3 gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if no public base URL is configured or derivable.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, StorageError> {
        let public_base_url = config.public_base_url().ok_or_else(|| {
            StorageError::configuration(format!(
                "no public base URL for the {} provider",
                provider_label(&config.storage.provider)
            ))
        })?;

        let provider = match config.storage.provider.clone() {
            StorageBackend::S3 {
                endpoint: None,
                access_key_id,
                secret_access_key,
                region,
            } => StorageBackend::S3 {
                endpoint: Some(config.supabase_s3_endpoint()),
                access_key_id,
                secret_access_key,
                region,
            },
            other => other,
        };

        Ok(Self::new(provider, &config.storage.bucket, public_base_url))
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        provider_label(&self.provider)
    }

    /// Public URL for a storage key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}

fn provider_label(provider: &StorageBackend) -> &'static str {
    match provider {
        StorageBackend::S3 { .. } => "s3",
        StorageBackend::LocalFs { .. } => "local",
        StorageBackend::Memory => "memory",
    }
}
