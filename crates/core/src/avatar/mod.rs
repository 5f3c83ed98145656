//! Avatar upload pipeline.
//!
//! One handler serves both deployment variants; [`UploadPolicy`] decides
//! whether an identity is required and how the storage key is derived.

mod error;
mod key;
mod service;

pub use error::AvatarError;
pub use key::{derive_key, sanitize_filename};
pub use service::{AvatarFile, AvatarService, UploadPolicy};
