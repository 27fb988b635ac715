//! Upstream proxies for route calculation and address lookup.
//!
//! [`RoutingClient`] forwards validated coordinates to an OSRM-compatible
//! routing service, applying a great-circle distance guard first and
//! translating upstream failures into [`RoutingError`] kinds.
//! [`GeocodingClient`] forwards free-text searches to a
//! Nominatim-compatible geocoder.

pub mod client;
pub mod distance;
pub mod error;
pub mod geocode;
pub mod query;
pub mod status;

pub use client::RoutingClient;
pub use distance::{GeoPoint, haversine_km};
pub use error::RoutingError;
pub use geocode::GeocodingClient;
pub use query::{RouteEndpoints, RouteQuery};
