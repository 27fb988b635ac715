//! Record store, realtime fan-out, and dispatch orchestration for the
//! Siren emergency dispatch service.
//!
//! # Modules
//!
//! - [`store`] -- In-memory route and alert collections
//! - [`broadcast`] -- Realtime publish point for connected subscribers
//! - [`dispatch`] -- Validate, mutate, broadcast, in that order
//! - [`validation`] -- Payload checks and request defaults
//! - [`lanes`] -- Lane configuration for the vehicle-counting service
//! - [`config`] -- YAML configuration with environment overrides
//! - [`error`] -- Error taxonomy shared by every layer

pub mod broadcast;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lanes;
pub mod store;
pub mod validation;

pub use broadcast::Broadcaster;
pub use config::{ConfigError, SirenConfig};
pub use dispatch::Dispatcher;
pub use error::{DispatchError, ErrorClass};
pub use lanes::{LaneConfigError, LaneConfigWriter};
pub use store::RecordStore;
