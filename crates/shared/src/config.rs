//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Supabase project configuration.
    pub supabase: SupabaseConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Avatar upload configuration.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4321
}

/// Supabase project configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    pub url: String,
    /// Service role key, sent as `apikey` on every auth call.
    pub service_role_key: String,
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Bucket that holds avatars.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Storage backend.
    #[serde(default)]
    pub provider: StorageBackend,
    /// Base URL for public object links. Required unless the provider is the
    /// Supabase project's S3 gateway, whose public URL is derived.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            provider: StorageBackend::default(),
            public_base_url: None,
        }
    }
}

fn default_bucket() -> String {
    "avatars".to_string()
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// S3-compatible storage: Supabase Storage, Cloudflare R2, AWS S3
    S3 {
        /// S3 endpoint URL. Defaults to the Supabase project's S3 gateway.
        #[serde(default)]
        endpoint: Option<String>,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        #[serde(default = "default_region")]
        region: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory (tests only)
    Memory,
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::LocalFs {
            root: PathBuf::from("./uploads"),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// How the storage key of an uploaded avatar is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// `public/{user_id}`; a new upload replaces the previous avatar.
    #[default]
    FixedPerUser,
    /// `public/{unix_millis}_{filename}`; every upload gets its own object.
    Timestamped,
}

/// Avatar upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Whether `/upload-avatar` sits behind the auth guard.
    #[serde(default = "default_require_auth")]
    pub require_auth: bool,
    /// Storage key derivation.
    #[serde(default)]
    pub key_strategy: KeyStrategy,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            require_auth: default_require_auth(),
            key_strategy: KeyStrategy::default(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_require_auth() -> bool {
    true
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// The plain `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY` variables take
    /// precedence over everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is inconsistent.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("DEPOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("supabase.url", std::env::var("SUPABASE_URL").ok())?
            .set_override_option(
                "supabase.service_role_key",
                std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
            )?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks combinations that deserialize fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.upload.key_strategy == KeyStrategy::FixedPerUser && !self.upload.require_auth {
            return Err(config::ConfigError::Message(
                "upload.key_strategy = fixed_per_user requires upload.require_auth = true"
                    .to_string(),
            ));
        }
        if self.upload.max_file_size == 0 {
            return Err(config::ConfigError::Message(
                "upload.max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.public_base_url().is_none() {
            return Err(config::ConfigError::Message(
                "storage.public_base_url must be set unless storage.provider is the Supabase S3 gateway"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL under which uploaded objects are publicly reachable.
    ///
    /// Falls back to the Supabase public object URL only when objects are
    /// actually written to the Supabase project's storage.
    #[must_use]
    pub fn public_base_url(&self) -> Option<String> {
        if let Some(url) = &self.storage.public_base_url {
            return Some(url.clone());
        }
        self.targets_supabase_storage().then(|| {
            format!(
                "{}/storage/v1/object/public/{}",
                self.supabase.url.trim_end_matches('/'),
                self.storage.bucket
            )
        })
    }

    /// Whether the storage provider writes to the Supabase project's S3 gateway.
    #[must_use]
    pub fn targets_supabase_storage(&self) -> bool {
        match &self.storage.provider {
            StorageBackend::S3 { endpoint: None, .. } => true,
            StorageBackend::S3 {
                endpoint: Some(endpoint),
                ..
            } => endpoint.trim_end_matches('/') == self.supabase_s3_endpoint(),
            StorageBackend::LocalFs { .. } | StorageBackend::Memory => false,
        }
    }

    /// S3 endpoint of the Supabase project's storage gateway.
    #[must_use]
    pub fn supabase_s3_endpoint(&self) -> String {
        format!("{}/storage/v1/s3", self.supabase.url.trim_end_matches('/'))
    }
}
