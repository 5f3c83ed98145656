//! Object storage for uploaded avatars using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Supabase Storage, Cloudflare R2, AWS S3
//! - Local filesystem (development only)
//! - Process memory (tests only)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     ObjectStore (port)                          │
//! │   upload(key, bytes, content_type, overwrite)  public_url(key)  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                 StorageService (Apache OpenDAL)                 │
//! │   op.write_with("key", data)     op.stat("key")                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::StorageConfig;
pub use error::StorageError;
pub use service::StorageService;

use async_trait::async_trait;
use bytes::Bytes;

/// Port to the external object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `key`.
    ///
    /// With `overwrite = false` an existing object is left untouched and
    /// [`StorageError::AlreadyExists`] is returned.
    async fn upload(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> Result<(), StorageError>;

    /// Public URL of the object stored under `key`.
    fn public_url(&self, key: &str) -> String;
}
