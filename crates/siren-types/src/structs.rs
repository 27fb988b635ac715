//! Core record structs for the dispatch service.
//!
//! All structs serialize with camelCase keys because the dispatch UI
//! reads them straight off the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{AlertId, RouteId};

// ---------------------------------------------------------------------------
// Waypoints
// ---------------------------------------------------------------------------

/// Geocoded coordinates of a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coords {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Human-readable name returned by the geocoder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// An address together with its geocoded position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// The address as typed by the driver.
    #[serde(default)]
    pub address: String,
    /// Coordinates resolved for the address, if geocoding succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coords>,
}

/// One end of an emergency route.
///
/// The dispatch UI sends a full [`Place`]; simpler clients may send a
/// bare address string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Waypoint {
    /// Address plus geocoded coordinates.
    Place(Place),
    /// Address only.
    Address(String),
}

impl Waypoint {
    /// Whether the waypoint carries no information at all.
    ///
    /// Only an empty bare address counts as blank; a place object is
    /// always considered present.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Place(_) => false,
            Self::Address(address) => address.is_empty(),
        }
    }

    /// The address text of this waypoint.
    pub fn address(&self) -> &str {
        match self {
            Self::Place(place) => &place.address,
            Self::Address(address) => address,
        }
    }
}

// ---------------------------------------------------------------------------
// Emergency routes
// ---------------------------------------------------------------------------

/// Route estimates computed by the client from the routing response.
///
/// The server stores these verbatim; the UI sends them as formatted
/// strings but numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    /// Route length (kilometres).
    #[serde(default)]
    pub distance: Value,
    /// Travel time for ordinary traffic (minutes).
    #[serde(default)]
    pub normal_time: Value,
    /// Travel time with emergency clearance (minutes).
    #[serde(default)]
    pub ambulance_time: Value,
}

/// A validated emergency route request with all defaults applied.
///
/// Everything except the store-assigned fields (`id`, `timestamp`,
/// `ts`) is settled by the time a draft exists.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDraft {
    /// Where the vehicle starts.
    pub source: Waypoint,
    /// Where the vehicle is headed.
    pub destination: Waypoint,
    /// Driver identifier.
    pub driver_id: String,
    /// `ambulance`, `fire`, `police`, or any other free text.
    pub vehicle_type: String,
    /// Driver display name.
    pub driver_name: String,
    /// Driver phone or radio contact.
    pub driver_contact: String,
    /// Vehicle plate or fleet number.
    pub vehicle_number: String,
    /// Kind of emergency.
    pub emergency_type: String,
    /// Dispatch priority.
    pub priority: String,
    /// Free-form notes for officers.
    pub notes: String,
    /// Dispatch status.
    pub status: String,
    /// When the emergency happened, if the driver supplied it.
    pub emergency_date_time: Option<String>,
    /// Client-computed route estimates.
    pub route_info: Option<RouteInfo>,
}

impl RouteDraft {
    /// Turn the draft into a stored record.
    ///
    /// `created_at` is the ISO-8601 creation time and `ts` the same
    /// instant in epoch milliseconds. A missing `emergency_date_time`
    /// falls back to `created_at`.
    pub fn into_route(self, id: RouteId, created_at: String, ts: i64) -> EmergencyRoute {
        let emergency_date_time = self
            .emergency_date_time
            .unwrap_or_else(|| created_at.clone());
        EmergencyRoute {
            id,
            source: self.source,
            destination: self.destination,
            driver_id: self.driver_id,
            vehicle_type: self.vehicle_type,
            driver_name: self.driver_name,
            driver_contact: self.driver_contact,
            vehicle_number: self.vehicle_number,
            emergency_type: self.emergency_type,
            priority: self.priority,
            notes: self.notes,
            status: self.status,
            timestamp: created_at,
            emergency_date_time,
            route_info: self.route_info,
            ts,
        }
    }
}

/// A dispatched emergency route as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRoute {
    /// Store-assigned identifier.
    pub id: RouteId,
    /// Where the vehicle starts.
    pub source: Waypoint,
    /// Where the vehicle is headed.
    pub destination: Waypoint,
    /// Driver identifier.
    pub driver_id: String,
    /// `ambulance`, `fire`, `police`, or any other free text.
    pub vehicle_type: String,
    /// Driver display name.
    pub driver_name: String,
    /// Driver phone or radio contact.
    pub driver_contact: String,
    /// Vehicle plate or fleet number.
    pub vehicle_number: String,
    /// Kind of emergency.
    pub emergency_type: String,
    /// Dispatch priority.
    pub priority: String,
    /// Free-form notes for officers.
    pub notes: String,
    /// Dispatch status.
    pub status: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
    /// ISO-8601 time of the emergency.
    pub emergency_date_time: String,
    /// Client-computed route estimates, `null` when not supplied.
    pub route_info: Option<RouteInfo>,
    /// Creation time in epoch milliseconds.
    pub ts: i64,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// A traffic alert.
///
/// Apart from the store-assigned `id` and `ts`, alerts are schemaless:
/// whatever the reporter sent is kept and echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Store-assigned identifier.
    pub id: AlertId,
    /// Creation time in epoch milliseconds.
    pub ts: i64,
    /// Reporter-supplied fields, stored verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Alert {
    /// Build an alert, dropping any `id`/`ts` keys the reporter sent.
    pub fn new(id: AlertId, ts: i64, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        fields.remove("ts");
        Self { id, ts, fields }
    }

    /// Look up a reporter-supplied field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Body of the traffic status readout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficStatus {
    /// Vehicle count from the latest alert, `0` when unknown.
    pub vehicles: Value,
    /// The latest alert, or an empty object before the first one.
    pub latest: Value,
}
