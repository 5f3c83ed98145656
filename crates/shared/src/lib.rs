//! Shared types, errors, and configuration for Depot.
//!
//! This crate provides common types used across all other crates:
//! - Identity and session types returned by the auth provider
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;

pub use auth::{AuthSession, Credentials, Identity, Session};
pub use config::{AppConfig, KeyStrategy, StorageBackend, UploadConfig};
pub use error::AppError;
