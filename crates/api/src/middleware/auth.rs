//! Authentication middleware for protected routes.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{AppState, error::ApiError};
use depot_core::identity::GatewayError;
use depot_shared::{AppError, Identity};

/// Extracts the bearer token from the Authorization header.
///
/// Only the first word after the scheme is the token; anything after it is ignored.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .and_then(|rest| rest.split_whitespace().next())
}

/// Authentication middleware that resolves bearer tokens through the identity provider.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Resolves the owning user with a single identity provider call
/// 3. Stores the [`Identity`] in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError(AppError::Unauthorized(
            "Missing or malformed bearer token".to_string(),
        ))
        .into_response();
    };

    match state.identity.resolve_user(token).await {
        Ok(identity) => {
            debug!(user_id = %identity.id, "Request authenticated");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            match &e {
                GatewayError::Rejected { status, .. } => {
                    debug!(status, "Token rejected by identity provider");
                }
                _ => warn!(error = %e, "Token validation failed"),
            }
            ApiError(AppError::Unauthorized(
                "Invalid or expired token".to_string(),
            ))
            .into_response()
        }
    }
}

/// Extractor for the authenticated user.
///
/// Use this in handlers behind [`auth_middleware`]:
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let user_id = user.user_id();
///     // ...
/// }
/// ```
///
/// `Option<AuthUser>` never rejects and yields `None` on routes where the
/// middleware is not installed.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    /// Returns the user ID.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.0.id
    }

    /// Returns the inner identity.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".to_string())))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().map(AuthUser))
    }
}
