//! API route definitions.

use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod avatars;
pub mod containers;
pub mod health;

/// Creates the public API routes that need no per-deployment wiring.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(containers::routes())
        .merge(auth::routes())
}

/// Creates the full API router, guarding the upload route when the upload
/// policy requires authentication.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let policy = *state.avatars.policy();

    let upload_routes = Router::new()
        .route("/upload-avatar", post(avatars::upload_avatar))
        .route_layer(DefaultBodyLimit::max(policy.max_file_size));

    let upload_routes = if policy.require_auth {
        upload_routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
    } else {
        upload_routes
    };

    Router::new().merge(api_routes()).merge(upload_routes)
}
