//! Query parameters of the route proxy endpoint.

use serde::Deserialize;

use crate::distance::GeoPoint;
use crate::error::RoutingError;

/// Message for a request missing any coordinate.
pub const MISSING_PARAMETERS: &str =
    "Missing required parameters: sourceLng, sourceLat, destLng, destLat";

/// Message for a request with a non-numeric or out-of-range coordinate.
pub const INVALID_COORDINATES: &str = "Invalid coordinates provided";

/// Raw query string of `GET /api/route`.
///
/// Values stay as strings until [`RouteQuery::endpoints`] so that a
/// missing value and a malformed one produce different messages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    /// Source longitude.
    pub source_lng: Option<String>,
    /// Source latitude.
    pub source_lat: Option<String>,
    /// Destination longitude.
    pub dest_lng: Option<String>,
    /// Destination latitude.
    pub dest_lat: Option<String>,
}

/// Validated start and end of a route request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEndpoints {
    /// Where the route starts.
    pub source: GeoPoint,
    /// Where the route ends.
    pub destination: GeoPoint,
}

impl RouteQuery {
    /// Parse all four coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::BadRequest`] if any value is missing or
    /// empty, if any value is not a finite number, or if a latitude
    /// falls outside `[-90, 90]` or a longitude outside `[-180, 180]`.
    pub fn endpoints(&self) -> Result<RouteEndpoints, RoutingError> {
        let raw = [
            self.source_lat.as_deref(),
            self.source_lng.as_deref(),
            self.dest_lat.as_deref(),
            self.dest_lng.as_deref(),
        ];
        if raw.iter().any(|v| v.is_none_or(|s| s.trim().is_empty())) {
            return Err(RoutingError::BadRequest(MISSING_PARAMETERS.to_owned()));
        }

        let parsed: Vec<f64> = raw
            .iter()
            .flatten()
            .map(|s| s.trim().parse::<f64>().ok().filter(|f| f.is_finite()))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| RoutingError::BadRequest(INVALID_COORDINATES.to_owned()))?;

        let [source_lat, source_lng, dest_lat, dest_lng] = parsed.as_slice() else {
            return Err(RoutingError::BadRequest(MISSING_PARAMETERS.to_owned()));
        };

        if !on_globe(*source_lat, *source_lng) || !on_globe(*dest_lat, *dest_lng) {
            return Err(RoutingError::BadRequest(INVALID_COORDINATES.to_owned()));
        }

        Ok(RouteEndpoints {
            source: GeoPoint::new(*source_lat, *source_lng),
            destination: GeoPoint::new(*dest_lat, *dest_lng),
        })
    }
}

/// Latitude within `[-90, 90]` and longitude within `[-180, 180]`.
fn on_globe(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}
