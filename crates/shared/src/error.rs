//! Application-wide error types.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body exceeds the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The object store rejected an upload.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::PayloadTooLarge(_) => 413,
            Self::UploadFailed(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::UploadFailed(_) => "UPLOAD_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors whose detail must stay server-side.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message that is safe to hand back to the client.
    ///
    /// Client errors carry their own message; server errors are replaced by a
    /// fixed sentence so upstream or internal detail never leaks.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::PayloadTooLarge(msg) => msg.clone(),
            Self::UploadFailed(_) => "Failed to upload file".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::BadRequest(String::new()).status_code(), 400);
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::PayloadTooLarge(String::new()).status_code(), 413);
        assert_eq!(AppError::UploadFailed(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::BadRequest(String::new()).error_code(), "BAD_REQUEST");
        assert_eq!(
            AppError::Unauthorized(String::new()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::PayloadTooLarge(String::new()).error_code(),
            "PAYLOAD_TOO_LARGE"
        );
        assert_eq!(
            AppError::UploadFailed(String::new()).error_code(),
            "UPLOAD_FAILED"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::BadRequest("msg".into()).to_string(),
            "Bad request: msg"
        );
        assert_eq!(
            AppError::Unauthorized("msg".into()).to_string(),
            "Authentication failed: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::UploadFailed("msg".into()).to_string(),
            "Upload failed: msg"
        );
        assert_eq!(
            AppError::Internal("msg".into()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn test_public_message_hides_server_detail() {
        let err = AppError::UploadFailed("bucket avatars: connection reset at s3.rs:42".into());
        assert!(err.is_server_error());
        assert!(!err.public_message().contains("s3.rs"));

        let err = AppError::Internal("panicked at 'index out of bounds'".into());
        assert!(!err.public_message().contains("panicked"));
    }

    #[test]
    fn test_public_message_keeps_client_detail() {
        let err = AppError::Unauthorized("Invalid login credentials".into());
        assert!(!err.is_server_error());
        assert_eq!(err.public_message(), "Invalid login credentials");
    }
}
