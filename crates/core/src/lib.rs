//! Core domain logic for Depot.
//!
//! This crate contains the domain types and the ports to the two external
//! collaborators, with NO web framework dependencies.
//!
//! # Modules
//!
//! - `container` - In-memory container registry
//! - `identity` - Identity gateway port and the Supabase auth adapter
//! - `storage` - Object store port and the OpenDAL adapter
//! - `avatar` - Avatar upload pipeline

pub mod avatar;
pub mod container;
pub mod identity;
pub mod storage;
