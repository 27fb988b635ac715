//! Dispatch API server for the Siren emergency dispatch service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Dispatch endpoints** for creating, listing, and deleting
//!   emergency routes and alerts
//! - **`WebSocket` endpoint** (`/ws`) pushing every stored change to
//!   connected dashboards via [`tokio::sync::broadcast`]
//! - **Upstream proxies** for route calculation and address lookup
//! - **Lane configuration** for the external vehicle counter
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! All handlers share one [`AppState`] built at startup. Mutations go
//! through the [`Dispatcher`](siren_core::Dispatcher), which stores the
//! change and broadcasts it under the same lock, so dashboards see
//! events in store order and a client that gets a response will see its
//! change in the next list call.

pub mod alerts;
pub mod emergency_routes;
pub mod error;
pub mod handlers;
pub mod lanes;
pub mod router;
pub mod routing;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
