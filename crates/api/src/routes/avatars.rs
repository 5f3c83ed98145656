//! Avatar upload route.

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use serde::Serialize;
use tracing::debug;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use depot_core::avatar::AvatarFile;
use depot_shared::AppError;

/// Multipart field that carries the image.
const AVATAR_FIELD: &str = "avatar";

/// Response for a stored avatar.
#[derive(Debug, Serialize)]
pub struct UploadAvatarResponse {
    /// Public URL of the stored image.
    pub url: String,
}

/// POST /upload-avatar - Store the `avatar` file and return its public URL.
///
/// Whether an authenticated user is required depends on the upload policy;
/// the auth middleware is installed in front of this handler when it is.
pub async fn upload_avatar(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadAvatarResponse>, ApiError> {
    let file = match multipart {
        Ok(multipart) => read_avatar(multipart).await?,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Upload is not multipart");
            None
        }
    };

    let url = state
        .avatars
        .upload(file, user.as_ref().map(AuthUser::identity))
        .await?;

    Ok(Json(UploadAvatarResponse { url }))
}

/// Buffers the first file part named `avatar`, skipping everything else.
async fn read_avatar(mut multipart: Multipart) -> Result<Option<AvatarFile>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        // A plain form value named `avatar` is not a file.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(Some(AvatarFile {
            bytes,
            content_type,
            file_name: Some(file_name),
        }));
    }
    Ok(None)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text()).into()
    } else {
        AppError::BadRequest(err.body_text()).into()
    }
}
