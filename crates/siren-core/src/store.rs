//! In-memory record store for emergency routes and alerts.
//!
//! The store owns two ordered collections. Routes support create, list,
//! and delete-by-id; alerts are append-only. Identifiers come from
//! per-collection counters, so an id is never handed out twice even
//! after the record holding it is deleted.
//!
//! The store has no side effects beyond its own state. Broadcasting is
//! the caller's job (see [`crate::dispatch::Dispatcher`]).

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use siren_types::{Alert, AlertId, EmergencyRoute, RouteDraft, RouteId};

/// Process-lifetime storage for dispatch records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    /// Live routes in insertion order.
    routes: Vec<EmergencyRoute>,
    /// All alerts in insertion order.
    alerts: Vec<Alert>,
    /// Highest route id handed out so far.
    last_route_id: RouteId,
    /// Highest alert id handed out so far.
    last_alert_id: AlertId,
}

impl RecordStore {
    /// Create a new empty store.
    pub const fn new() -> Self {
        Self {
            routes: Vec::new(),
            alerts: Vec::new(),
            last_route_id: RouteId::new(0),
            last_alert_id: AlertId::new(0),
        }
    }

    /// Store a route, stamping its id and creation time.
    ///
    /// Returns a copy of the stored record.
    pub fn create_route(&mut self, draft: RouteDraft) -> EmergencyRoute {
        self.create_route_at(draft, Utc::now())
    }

    /// Store a route as if created at `now`.
    pub fn create_route_at(&mut self, draft: RouteDraft, now: DateTime<Utc>) -> EmergencyRoute {
        let id = self.last_route_id.next();
        self.last_route_id = id;
        let route = draft.into_route(id, iso_timestamp(now), now.timestamp_millis());
        self.routes.push(route.clone());
        route
    }

    /// Snapshot of all live routes in insertion order.
    pub fn list_routes(&self) -> Vec<EmergencyRoute> {
        self.routes.clone()
    }

    /// Remove the route with the given id.
    ///
    /// Returns `false` when no such route exists.
    pub fn delete_route(&mut self, id: RouteId) -> bool {
        let Some(index) = self.routes.iter().position(|r| r.id == id) else {
            return false;
        };
        self.routes.remove(index);
        true
    }

    /// Number of live routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Store an alert, stamping its id and creation time.
    ///
    /// Returns a copy of the stored record.
    pub fn create_alert(&mut self, fields: Map<String, Value>) -> Alert {
        let id = self.last_alert_id.next();
        self.last_alert_id = id;
        let alert = Alert::new(id, Utc::now().timestamp_millis(), fields);
        self.alerts.push(alert.clone());
        alert
    }

    /// Snapshot of all alerts in insertion order.
    pub fn list_alerts(&self) -> Vec<Alert> {
        self.alerts.clone()
    }

    /// The most recently created alert.
    pub fn latest_alert(&self) -> Option<Alert> {
        self.alerts.last().cloned()
    }

    /// Number of stored alerts.
    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
