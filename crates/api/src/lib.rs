//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Request extractors
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use depot_core::avatar::AvatarService;
use depot_core::container::ContainerRegistry;
use depot_core::identity::IdentityGateway;
use depot_shared::AppError;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// In-memory container registry.
    pub containers: Arc<ContainerRegistry>,
    /// Identity provider used for signup, login and token checks.
    pub identity: Arc<dyn IdentityGateway>,
    /// Avatar upload pipeline.
    pub avatars: Arc<AvatarService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    with_layers(routes::api_routes_with_state(state.clone()), state)
}

/// Wraps routes in the panic, trace and CORS layers and binds the state.
fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .with_state(state)
}

/// Turns a handler panic into a generic 500 without leaking the payload.
#[allow(clippy::needless_pass_by_value)]
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    error!(panic = %detail, "Handler panicked");
    ApiError(AppError::Internal(detail)).into_response()
}
