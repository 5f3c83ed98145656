//! Signup and login passthrough to the identity provider.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use tracing::{info, warn};

use crate::{AppState, error::ApiError};
use depot_shared::{AppError, AuthSession, Credentials};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Unreadable bodies are treated like empty ones so the caller gets the
/// same "email and password are required" answer.
fn credentials(payload: Result<Json<Credentials>, JsonRejection>) -> Credentials {
    payload.map(|Json(c)| c).unwrap_or_default()
}

/// POST /signup - Create an account with the identity provider.
async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let creds = credentials(payload);
    let (email, password) = creds.require()?;

    match state.identity.sign_up(email, password).await {
        Ok(auth) => {
            info!(
                user_id = %auth.user.id,
                confirmed = auth.session.is_some(),
                "New user registered"
            );
            Ok((StatusCode::CREATED, Json(auth)))
        }
        Err(e) => {
            warn!(error = %e, "Signup rejected");
            Err(AppError::BadRequest(e.user_message().to_string()).into())
        }
    }
}

/// POST /login - Password sign-in with the identity provider.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let creds = credentials(payload);
    let (email, password) = creds.require()?;

    match state.identity.sign_in_with_password(email, password).await {
        Ok(auth) => {
            info!(user_id = %auth.user.id, "User logged in successfully");
            Ok(Json(auth))
        }
        Err(e) => {
            info!(error = %e, "Failed login attempt");
            Err(AppError::Unauthorized(e.user_message().to_string()).into())
        }
    }
}
