//! Lane configuration endpoint for the external vehicle counter.
//!
//! `POST /api/configure` takes `{ lanes: [...] }`, validates every lane,
//! and writes the resolved list to the configured JSON file. Nothing is
//! written if any lane is invalid.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

/// Validate and save a lane configuration.
pub async fn configure(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let saved = state.lanes.save(&payload).await?;
    Ok(Json(json!({ "ok": true, "saved": saved })))
}
