//! Avatar upload service.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::info;

use super::error::AvatarError;
use super::key::derive_key;
use crate::storage::ObjectStore;
use depot_shared::{Identity, KeyStrategy, UploadConfig};

/// Content type recorded when the client declared none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Startup-time choice between the upload variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Whether the upload route sits behind the auth guard.
    pub require_auth: bool,
    /// How storage keys are derived.
    pub key_strategy: KeyStrategy,
    /// Maximum accepted request body in bytes.
    pub max_file_size: usize,
}

impl From<&UploadConfig> for UploadPolicy {
    fn from(config: &UploadConfig) -> Self {
        Self {
            require_auth: config.require_auth,
            key_strategy: config.key_strategy,
            max_file_size: config.max_file_size,
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from(&UploadConfig::default())
    }
}

/// A file received from the client, fully buffered.
#[derive(Debug, Clone)]
pub struct AvatarFile {
    /// Raw file contents.
    pub bytes: Bytes,
    /// Declared MIME type.
    pub content_type: Option<String>,
    /// Client-side filename.
    pub file_name: Option<String>,
}

/// Forwards avatar uploads to the object store.
pub struct AvatarService {
    store: Arc<dyn ObjectStore>,
    policy: UploadPolicy,
}

impl AvatarService {
    /// Create a new avatar service.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, policy: UploadPolicy) -> Self {
        Self { store, policy }
    }

    /// The policy this service was built with.
    #[must_use]
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Store an avatar and return its public URL.
    ///
    /// The object is written with overwrite enabled, so a fixed per-user key
    /// replaces the previous avatar.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No file was sent
    /// - The key strategy needs an identity and none is present
    /// - The object store rejects the upload
    pub async fn upload(
        &self,
        file: Option<AvatarFile>,
        identity: Option<&Identity>,
    ) -> Result<String, AvatarError> {
        let file = file.ok_or(AvatarError::MissingFile)?;

        let key = derive_key(
            self.policy.key_strategy,
            identity,
            file.file_name.as_deref(),
            Utc::now(),
        )?;
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or(FALLBACK_CONTENT_TYPE);
        let size = file.bytes.len();

        self.store
            .upload(&key, file.bytes, content_type, true)
            .await?;

        let url = self.store.public_url(&key);
        info!(
            key = %key,
            size,
            user_id = identity.map(|i| i.id.as_str()),
            "Avatar uploaded"
        );
        Ok(url)
    }
}
