//! Avatar upload error types.

use thiserror::Error;

use crate::storage::StorageError;
use depot_shared::AppError;

/// Avatar upload errors.
#[derive(Debug, Error)]
pub enum AvatarError {
    /// The request carried no `avatar` file.
    #[error("no avatar file in request")]
    MissingFile,

    /// The key strategy needs a user but the request is anonymous.
    #[error("storage key requires an authenticated user")]
    MissingIdentity,

    /// The object store refused the upload.
    #[error("object store upload failed: {0}")]
    Storage(#[from] StorageError),
}

impl From<AvatarError> for AppError {
    fn from(err: AvatarError) -> Self {
        match err {
            AvatarError::MissingFile => Self::BadRequest("No image was sent".to_string()),
            AvatarError::MissingIdentity => {
                Self::Unauthorized("Authentication required".to_string())
            }
            AvatarError::Storage(e) => Self::UploadFailed(e.to_string()),
        }
    }
}
