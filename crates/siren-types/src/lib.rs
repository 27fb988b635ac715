//! Shared type definitions for the Siren emergency dispatch service.
//!
//! This crate is the single source of truth for the records that flow
//! between the store, the HTTP surface, and realtime subscribers. Every
//! type serializes to the camelCase JSON shape the dispatch UI consumes.
//!
//! # Modules
//!
//! - [`ids`] -- Sequential integer identifiers for routes and alerts
//! - [`structs`] -- Emergency routes, waypoints, alerts, traffic status
//! - [`events`] -- Realtime events pushed to connected subscribers

pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use events::RealtimeEvent;
pub use ids::{AlertId, RouteId};
pub use structs::{
    Alert, Coords, EmergencyRoute, Place, RouteDraft, RouteInfo, TrafficStatus, Waypoint,
};
