//! Axum router construction for the dispatch API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for the browser dashboard.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{alerts, emergency_routes, handlers, lanes, routing, ws};

/// Build the complete Axum router for the dispatch server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- `WebSocket` realtime event stream
/// - `POST /alerts`, `GET /alerts` -- create and list alerts
/// - `POST /emergency-routes`, `GET /emergency-routes` -- create and list routes
/// - `DELETE /emergency-routes/{id}` -- remove a route
/// - `GET /traffic/status`, `GET /api/status` -- traffic readout
/// - `GET /route`, `GET /api/route` -- routing proxy
/// - `GET /api/geocode` -- geocoder proxy
/// - `POST /api/configure` -- lane configuration
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_events))
        // Dispatch
        .route("/alerts", post(alerts::create_alert).get(alerts::list_alerts))
        .route(
            "/emergency-routes",
            post(emergency_routes::create_route).get(emergency_routes::list_routes),
        )
        .route("/emergency-routes/{id}", delete(emergency_routes::delete_route))
        .route("/traffic/status", get(handlers::traffic_status))
        .route("/api/status", get(handlers::traffic_status))
        // Upstream proxies
        .route("/route", get(routing::get_route))
        .route("/api/route", get(routing::get_route))
        .route("/api/geocode", get(routing::geocode))
        // Lane configuration
        .route("/api/configure", post(lanes::configure))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
