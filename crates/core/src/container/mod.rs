//! In-memory container registry.
//!
//! Containers live for the lifetime of the process only. Records are kept in
//! insertion order and never updated or deleted.

mod error;
mod registry;

pub use error::RegistryError;
pub use registry::{Container, ContainerRegistry};
