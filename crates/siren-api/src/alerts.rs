//! Alert endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/alerts` | Record an alert from the vehicle counter |
//! | `GET` | `/alerts` | List alerts in creation order |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde_json::Value;
use siren_types::Alert;

use crate::error::ApiError;
use crate::state::AppState;

/// Store an alert and broadcast it as `alert`.
///
/// Only `incident` and `location` are required; every other field is
/// kept verbatim.
pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Alert>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let alert = state.dispatcher.create_alert(payload).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// Every stored alert, oldest first.
pub async fn list_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<Alert>> {
    Json(state.dispatcher.list_alerts().await)
}
