//! Dispatch orchestration: validate, mutate, then broadcast.
//!
//! Every mutating operation on [`Dispatcher`] runs the same fixed
//! sequence inside one function body:
//!
//! 1. validate the payload (no lock held, nothing touched on failure)
//! 2. take the store write lock and apply exactly one mutation
//! 3. emit the realtime event while still holding the lock
//! 4. return the stored record to the caller, who then responds
//!
//! Emitting under the lock keeps the event order on every subscriber
//! identical to the order in which mutations hit the store.

use chrono::Utc;
use serde_json::Value;
use siren_types::{Alert, EmergencyRoute, RealtimeEvent, RouteId, TrafficStatus};
use tokio::sync::{RwLock, broadcast};
use tracing::info;

use crate::broadcast::Broadcaster;
use crate::error::DispatchError;
use crate::store::RecordStore;
use crate::validation::{RouteRequest, is_truthy, validate_alert};

/// Owns the record store and the broadcaster for the whole process.
#[derive(Debug)]
pub struct Dispatcher {
    store: RwLock<RecordStore>,
    broadcaster: Broadcaster,
}

impl Dispatcher {
    /// Create a dispatcher over an empty store.
    pub fn new(broadcaster: Broadcaster) -> Self {
        Self {
            store: RwLock::new(RecordStore::new()),
            broadcaster,
        }
    }

    /// The realtime publish point.
    pub const fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Subscribe to realtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.broadcaster.subscribe()
    }

    // -----------------------------------------------------------------------
    // Emergency routes
    // -----------------------------------------------------------------------

    /// Validate and store a new emergency route, then announce it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Validation`] if `source` or `destination`
    /// is missing or the payload is malformed. Nothing is stored or
    /// emitted in that case.
    pub async fn create_route(&self, payload: Value) -> Result<EmergencyRoute, DispatchError> {
        let draft = RouteRequest::from_value(payload)?.into_draft(Utc::now().timestamp_millis())?;

        let mut store = self.store.write().await;
        let route = store.create_route(draft);
        let delivered = self
            .broadcaster
            .emit(RealtimeEvent::EmergencyRoute(Box::new(route.clone())));
        drop(store);

        info!(
            route_id = %route.id,
            vehicle_type = route.vehicle_type,
            priority = route.priority,
            delivered,
            "Emergency route dispatched"
        );
        Ok(route)
    }

    /// Snapshot of all live emergency routes in insertion order.
    pub async fn list_routes(&self) -> Vec<EmergencyRoute> {
        self.store.read().await.list_routes()
    }

    /// Remove an emergency route, then announce the removal.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] if no route has that id.
    /// Nothing is emitted in that case.
    pub async fn delete_route(&self, id: RouteId) -> Result<(), DispatchError> {
        let mut store = self.store.write().await;
        if !store.delete_route(id) {
            return Err(DispatchError::NotFound("Route not found".to_owned()));
        }
        let delivered = self
            .broadcaster
            .emit(RealtimeEvent::EmergencyRouteDeleted { id });
        drop(store);

        info!(route_id = %id, delivered, "Emergency route deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Alerts
    // -----------------------------------------------------------------------

    /// Validate and store a new alert, then announce it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Validation`] if the payload is not an
    /// object or lacks `incident` or `location`.
    pub async fn create_alert(&self, payload: Value) -> Result<Alert, DispatchError> {
        let fields = validate_alert(payload)?;

        let mut store = self.store.write().await;
        let alert = store.create_alert(fields);
        let delivered = self.broadcaster.emit(RealtimeEvent::Alert(alert.clone()));
        drop(store);

        info!(alert_id = %alert.id, delivered, "Alert recorded");
        Ok(alert)
    }

    /// Snapshot of all alerts in insertion order.
    pub async fn list_alerts(&self) -> Vec<Alert> {
        self.store.read().await.list_alerts()
    }

    /// The most recently created alert.
    pub async fn latest_alert(&self) -> Option<Alert> {
        self.store.read().await.latest_alert()
    }

    /// Traffic readout derived from the latest alert.
    ///
    /// `vehicles` is the latest alert's `vehicles` field when truthy,
    /// otherwise `0`. `latest` is the alert itself or `{}`.
    pub async fn traffic_status(&self) -> TrafficStatus {
        let latest = self.latest_alert().await;
        let vehicles = latest
            .as_ref()
            .and_then(|alert| alert.field("vehicles"))
            .filter(|v| is_truthy(v))
            .cloned()
            .unwrap_or_else(|| Value::from(0));
        let latest = latest
            .and_then(|alert| serde_json::to_value(alert).ok())
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        TrafficStatus { vehicles, latest }
    }

    /// Current `(routes, alerts)` record counts.
    pub async fn counts(&self) -> (usize, usize) {
        let store = self.store.read().await;
        (store.route_count(), store.alert_count())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Broadcaster::default())
    }
}
