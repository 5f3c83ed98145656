//! Registry error types.

use thiserror::Error;

/// Container registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No container with this ID.
    #[error("container not found: {0}")]
    NotFound(i64),
}

impl From<RegistryError> for depot_shared::AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => Self::NotFound("Not found".to_string()),
        }
    }
}
