//! Upstream proxy endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/route` | Driving route between two coordinates |
//! | `GET` | `/api/geocode` | Address lookup |
//!
//! Both relay the upstream body byte for byte on success. Failures are
//! rendered by [`ApiError`] with the upstream status mirrored where
//! one exists.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde_json::value::RawValue;
use siren_routing::RouteQuery;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for `GET /api/geocode`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct GeocodeQuery {
    /// Free-text address.
    pub q: Option<String>,
}

/// Proxy a route request to the routing service.
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<Box<RawValue>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    let endpoints = query.endpoints()?;
    let route = state.routing.route(&endpoints).await?;
    Ok(Json(route))
}

/// Proxy an address search to the geocoder.
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    query: Result<Query<GeocodeQuery>, QueryRejection>,
) -> Result<Json<Box<RawValue>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    let result = state
        .geocoding
        .search(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(result))
}
