//! Emergency route endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/emergency-routes` | Dispatch a vehicle |
//! | `GET` | `/emergency-routes` | List routes in creation order |
//! | `DELETE` | `/emergency-routes/{id}` | Remove a route |
//!
//! Creation and deletion go through the [`Dispatcher`], which stores the
//! change and broadcasts it before the response is built.
//!
//! [`Dispatcher`]: siren_core::Dispatcher

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use siren_core::DispatchError;
use siren_types::{EmergencyRoute, RouteId};

use crate::error::ApiError;
use crate::state::AppState;

/// Message for a delete that matched nothing.
const ROUTE_NOT_FOUND: &str = "Route not found";

/// Create an emergency route and broadcast it as `emergency_route`.
pub async fn create_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EmergencyRoute>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let route = state.dispatcher.create_route(payload).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// Every stored route, oldest first.
pub async fn list_routes(State(state): State<Arc<AppState>>) -> Json<Vec<EmergencyRoute>> {
    Json(state.dispatcher.list_routes().await)
}

/// Delete a route and broadcast `emergency_route_deleted`.
///
/// A non-numeric id cannot match any route and is reported as not found.
pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = raw_id
        .parse::<RouteId>()
        .ok()
        .ok_or_else(|| DispatchError::NotFound(ROUTE_NOT_FOUND.to_owned()))?;
    state.dispatcher.delete_route(id).await?;
    Ok(Json(json!({ "message": "Route deleted successfully" })))
}
