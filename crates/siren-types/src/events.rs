//! Realtime events fanned out to every connected subscriber.
//!
//! On the wire each event is a single JSON object
//! `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::ids::RouteId;
use crate::structs::{Alert, EmergencyRoute};

/// An event published after a successful store mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// A new alert was stored.
    Alert(Alert),
    /// A new emergency route was dispatched.
    EmergencyRoute(Box<EmergencyRoute>),
    /// An emergency route was removed.
    EmergencyRouteDeleted {
        /// Identifier of the removed route.
        id: RouteId,
    },
}

impl RealtimeEvent {
    /// The wire name of this event.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Alert(_) => "alert",
            Self::EmergencyRoute(_) => "emergency_route",
            Self::EmergencyRouteDeleted { .. } => "emergency_route_deleted",
        }
    }
}
