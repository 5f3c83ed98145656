//! Storage service implementation using Apache OpenDAL.

use async_trait::async_trait;
use bytes::Bytes;
use opendal::{ErrorKind, Operator, services};
use tracing::debug;

use super::ObjectStore;
use super::config::StorageConfig;
use super::error::StorageError;
use depot_shared::StorageBackend;

/// Object store backed by an OpenDAL operator.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(config: &StorageConfig) -> Result<Operator, StorageError> {
        match &config.provider {
            StorageBackend::S3 {
                endpoint,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let endpoint = endpoint
                    .as_deref()
                    .ok_or_else(|| StorageError::configuration("s3 endpoint is not set"))?;
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(&config.bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageBackend::LocalFs { root } => {
                let root = root.join(&config.bucket);
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageBackend::Memory => Ok(Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish()),
        }
    }

    /// Check if a file exists in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails for a reason other than absence.
    pub async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self.operator.stat(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    /// Get the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn upload(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        validate_key(key)?;

        if !overwrite && self.exists(key).await? {
            return Err(StorageError::already_exists(key));
        }

        let size = bytes.len();
        let supports_content_type = self
            .operator
            .info()
            .full_capability()
            .write_with_content_type;

        if supports_content_type {
            self.operator
                .write_with(key, bytes)
                .content_type(content_type)
                .await?;
        } else {
            self.operator.write(key, bytes).await?;
        }

        debug!(key, size, content_type, provider = self.provider_name(), "object stored");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }
}

/// Rejects keys that would escape the bucket or address a directory.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.ends_with('/') {
        return Err(StorageError::InvalidKey(format!("'{key}' does not name a file")));
    }
    if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(format!("'{key}' escapes the bucket")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_service() -> StorageService {
        let config = StorageConfig::new(
            StorageBackend::Memory,
            "avatars",
            "https://demo.supabase.co/storage/v1/object/public/avatars",
        );
        StorageService::from_config(config).expect("should create service")
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("public/user-1").is_ok());
        assert!(validate_key("public/1700000000000_me.png").is_ok());
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key("public/"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key("/etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key("public/../x"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_s3_requires_endpoint() {
        let config = StorageConfig::new(
            StorageBackend::S3 {
                endpoint: None,
                access_key_id: "id".into(),
                secret_access_key: "secret".into(),
                region: "us-east-1".into(),
            },
            "avatars",
            "",
        );
        assert!(matches!(
            StorageService::from_config(config),
            Err(StorageError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_then_read_back() {
        let service = memory_service();
        service
            .upload("public/u1", Bytes::from_static(b"png-bytes"), "image/png", true)
            .await
            .expect("upload should succeed");

        let stored = service.operator.read("public/u1").await.expect("readable");
        assert_eq!(stored.to_bytes(), Bytes::from_static(b"png-bytes"));
        assert!(service.exists("public/u1").await.expect("stat works"));
    }

    #[tokio::test]
    async fn test_upload_overwrite_replaces_object() {
        let service = memory_service();
        service
            .upload("public/u1", Bytes::from_static(b"old"), "image/png", true)
            .await
            .expect("first upload");
        service
            .upload("public/u1", Bytes::from_static(b"new"), "image/png", true)
            .await
            .expect("second upload");

        let stored = service.operator.read("public/u1").await.expect("readable");
        assert_eq!(stored.to_bytes(), Bytes::from_static(b"new"));
    }

    #[tokio::test]
    async fn test_upload_without_overwrite_keeps_existing() {
        let service = memory_service();
        service
            .upload("public/u1", Bytes::from_static(b"old"), "image/png", true)
            .await
            .expect("first upload");

        let err = service
            .upload("public/u1", Bytes::from_static(b"new"), "image/png", false)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));

        let stored = service.operator.read("public/u1").await.expect("readable");
        assert_eq!(stored.to_bytes(), Bytes::from_static(b"old"));
    }

    #[tokio::test]
    async fn test_exists_missing_key() {
        let service = memory_service();
        assert!(!service.exists("public/nobody").await.expect("stat works"));
    }

    #[test]
    fn test_public_url() {
        let service = memory_service();
        assert_eq!(
            service.public_url("public/u1"),
            "https://demo.supabase.co/storage/v1/object/public/avatars/public/u1"
        );
        assert_eq!(service.bucket(), "avatars");
        assert_eq!(service.provider_name(), "memory");
    }
}
