//! Shared application state for the dispatch API server.
//!
//! [`AppState`] is built once at startup and handed to every handler
//! behind an `Arc`. It owns the [`Dispatcher`] (record store plus
//! realtime fan-out) and the upstream clients, so no handler touches
//! process-global state.

use chrono::{DateTime, Utc};
use siren_core::{Broadcaster, Dispatcher, LaneConfigWriter, SirenConfig};
use siren_routing::{GeocodingClient, RoutingClient, RoutingError};

/// Shared state available to all Axum handlers via `State<Arc<AppState>>`.
#[derive(Debug)]
pub struct AppState {
    /// Record store and realtime broadcaster.
    pub dispatcher: Dispatcher,
    /// Routing service proxy.
    pub routing: RoutingClient,
    /// Geocoder proxy.
    pub geocoding: GeocodingClient,
    /// Lane configuration output.
    pub lanes: LaneConfigWriter,
    /// When the server state was built.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build the state from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Internal`] if an upstream HTTP client
    /// cannot be constructed.
    pub fn new(config: &SirenConfig) -> Result<Self, RoutingError> {
        let broadcaster = Broadcaster::new(config.realtime.channel_capacity);
        Ok(Self {
            dispatcher: Dispatcher::new(broadcaster),
            routing: RoutingClient::new(&config.routing)?,
            geocoding: GeocodingClient::new(&config.geocoding, &config.routing.user_agent)?,
            lanes: LaneConfigWriter::new(&config.lanes),
            started_at: Utc::now(),
        })
    }
}
