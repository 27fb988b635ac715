//! Error types for the upstream proxies.
//!
//! Every failure the routing proxy can produce is one [`RoutingError`]
//! kind carrying enough detail to render a user-facing message. Nothing
//! is retried; each error is terminal for its request.

use siren_core::ErrorClass;

/// Errors produced while proxying a routing or geocoding request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoutingError {
    /// Required query parameters were missing or not numeric.
    #[error("{0}")]
    BadRequest(String),

    /// The endpoints are further apart than the upstream can handle.
    #[error("route too long: {distance_km:.0} km")]
    RouteTooLong {
        /// Great-circle distance between the endpoints.
        distance_km: f64,
    },

    /// The upstream did not answer within the configured timeout.
    #[error("upstream request timed out")]
    Timeout,

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned {status}: {detail}")]
    ServiceUnavailable {
        /// Status code returned by the upstream.
        status: u16,
        /// Human-readable explanation.
        detail: String,
        /// What the user can do about it.
        suggestion: &'static str,
    },

    /// The upstream answered 2xx but reported a failure code in the body.
    #[error("route calculation failed: {code}: {message}")]
    RouteCalculationFailed {
        /// Upstream failure code (e.g. `NoRoute`).
        code: String,
        /// Upstream failure message.
        message: String,
    },

    /// Transport failure or an unreadable success body.
    #[error("{summary}: {detail}")]
    Internal {
        /// Short description of what failed.
        summary: String,
        /// Underlying cause.
        detail: String,
    },
}

impl RoutingError {
    /// The taxonomy class of this error.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::BadRequest(_) | Self::RouteTooLong { .. } => ErrorClass::Validation,
            Self::Timeout | Self::ServiceUnavailable { .. } => ErrorClass::UpstreamUnavailable,
            Self::RouteCalculationFailed { .. } => ErrorClass::UpstreamLogicalFailure,
            Self::Internal { .. } => ErrorClass::Internal,
        }
    }

    /// HTTP status the API should answer with.
    ///
    /// Upstream failures mirror the upstream status when it is an error
    /// status, and fall back to 502 otherwise.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::RouteTooLong { .. } | Self::RouteCalculationFailed { .. } => {
                400
            }
            Self::Timeout => 504,
            Self::ServiceUnavailable { status, .. } => {
                if *status >= 400 && *status <= 599 {
                    *status
                } else {
                    502
                }
            }
            Self::Internal { .. } => 500,
        }
    }

    /// Build an [`RoutingError::Internal`].
    pub fn internal(summary: &str, detail: impl std::fmt::Display) -> Self {
        Self::Internal {
            summary: summary.to_owned(),
            detail: detail.to_string(),
        }
    }
}
