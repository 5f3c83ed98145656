//! Container CRUD routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::{AppState, error::ApiError};
use depot_core::container::Container;
use depot_shared::AppError;

/// Creates the container routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/containers", get(list_containers).post(create_container))
        .route("/containers/{id}", get(get_container))
}

/// GET /containers - All containers in insertion order.
async fn list_containers(State(state): State<AppState>) -> Json<Vec<Container>> {
    Json(state.containers.list())
}

/// GET /containers/{id} - A single container.
///
/// A path segment that is not an integer cannot match any record and is
/// answered like an unknown ID.
async fn get_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Container>, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::NotFound("Not found".to_string()))?;

    Ok(Json(state.containers.get(id)?))
}

/// POST /containers - Create a container from an arbitrary JSON object.
async fn create_container(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<Container>), ApiError> {
    let Json(fields) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let container = state.containers.create(fields);
    info!(container_id = container.id, "Container created");

    Ok((StatusCode::CREATED, Json(container)))
}
