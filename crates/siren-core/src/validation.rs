//! Payload validation for alerts and emergency routes.
//!
//! Validation happens before the store is touched, so a rejected
//! payload never causes a mutation or a broadcast.

use serde::Deserialize;
use serde_json::{Map, Value};
use siren_types::{RouteDraft, RouteInfo, Waypoint};

use crate::error::DispatchError;

/// Message returned when either end of a route is missing.
pub const MISSING_ENDPOINTS: &str = "Source and destination are required";

/// JavaScript-style truthiness of a JSON value.
///
/// `null`, `false`, `0`, and `""` are falsy; everything else, including
/// empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_normal() || f.is_subnormal()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Check an alert payload and return its fields.
///
/// The payload must be a JSON object with truthy `incident` and
/// `location` fields. Everything else is accepted as-is.
///
/// # Errors
///
/// Returns [`DispatchError::Validation`] naming the first problem found.
pub fn validate_alert(payload: Value) -> Result<Map<String, Value>, DispatchError> {
    let Value::Object(fields) = payload else {
        return Err(DispatchError::Validation("missing payload".to_owned()));
    };
    for required in ["incident", "location"] {
        if !fields.get(required).is_some_and(is_truthy) {
            return Err(DispatchError::Validation(format!("missing {required}")));
        }
    }
    Ok(fields)
}

/// Raw emergency route request as sent by the dispatch UI.
///
/// Every field is optional at this stage; [`RouteRequest::into_draft`]
/// enforces the required ones and fills in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    /// Where the vehicle starts.
    pub source: Option<Waypoint>,
    /// Where the vehicle is headed.
    pub destination: Option<Waypoint>,
    /// Driver identifier.
    pub driver_id: Option<String>,
    /// Vehicle category.
    pub vehicle_type: Option<String>,
    /// Driver display name.
    pub driver_name: Option<String>,
    /// Driver contact.
    pub driver_contact: Option<String>,
    /// Vehicle plate or fleet number.
    pub vehicle_number: Option<String>,
    /// Kind of emergency.
    pub emergency_type: Option<String>,
    /// Dispatch priority.
    pub priority: Option<String>,
    /// Notes for officers.
    pub notes: Option<String>,
    /// Dispatch status.
    pub status: Option<String>,
    /// Client-computed route estimates.
    pub route_info: Option<RouteInfo>,
    /// When the emergency happened.
    pub emergency_date_time: Option<String>,
}

impl RouteRequest {
    /// Parse a raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Validation`] if the body is not an object
    /// or a field has the wrong shape.
    pub fn from_value(payload: Value) -> Result<Self, DispatchError> {
        if payload.is_null() {
            return Err(DispatchError::Validation(MISSING_ENDPOINTS.to_owned()));
        }
        serde_json::from_value(payload).map_err(|e| {
            DispatchError::Validation(format!("invalid emergency route payload: {e}"))
        })
    }

    /// Enforce required fields and apply defaults.
    ///
    /// `now_ms` seeds the synthetic driver id when none is given.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Validation`] when `source` or
    /// `destination` is missing or blank.
    pub fn into_draft(self, now_ms: i64) -> Result<RouteDraft, DispatchError> {
        let (Some(source), Some(destination)) = (self.source, self.destination) else {
            return Err(DispatchError::Validation(MISSING_ENDPOINTS.to_owned()));
        };
        if source.is_blank() || destination.is_blank() {
            return Err(DispatchError::Validation(MISSING_ENDPOINTS.to_owned()));
        }

        Ok(RouteDraft {
            source,
            destination,
            driver_id: text_or(self.driver_id, &format!("driver-{now_ms}")),
            vehicle_type: text_or(self.vehicle_type, "ambulance"),
            driver_name: text_or(self.driver_name, ""),
            driver_contact: text_or(self.driver_contact, ""),
            vehicle_number: text_or(self.vehicle_number, ""),
            emergency_type: text_or(self.emergency_type, "medical"),
            priority: text_or(self.priority, "high"),
            notes: text_or(self.notes, ""),
            status: text_or(self.status, "dispatched"),
            emergency_date_time: self.emergency_date_time.filter(|s| !s.is_empty()),
            route_info: self.route_info,
        })
    }
}

/// An absent or empty string falls back to `default`.
fn text_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
