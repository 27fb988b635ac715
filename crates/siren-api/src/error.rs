//! Error types for the dispatch API.
//!
//! [`ApiError`] unifies every failure a handler can produce and renders
//! it as a JSON body via its [`IntoResponse`] implementation. The body
//! always carries `error` and `status`; routing failures add `details`,
//! `suggestion`, `code`, and `message` where the kind supplies them.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value, json};
use siren_core::{DispatchError, ErrorClass, LaneConfigError};
use siren_routing::RoutingError;

/// Detail attached to a routing timeout.
const TIMEOUT_DETAIL: &str = "Routing service took too long to respond. The route might be too complex or the service is overloaded.";

/// Errors that can occur in the dispatch API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body or query string could not be decoded.
    #[error("{0}")]
    Validation(String),

    /// Payload validation or lookup failed in the dispatcher.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A routing or geocoding upstream call failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Saving a lane configuration failed.
    #[error(transparent)]
    Lanes(#[from] LaneConfigError),
}

impl ApiError {
    /// The taxonomy class of this error.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::Dispatch(e) => e.class(),
            Self::Routing(e) => e.class(),
            Self::Lanes(e) => e.class(),
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::Dispatch(DispatchError::Validation(_))
            | Self::Lanes(LaneConfigError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Dispatch(DispatchError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Routing(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Lanes(LaneConfigError::Io { .. } | LaneConfigError::Serialization(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The fields of the JSON body other than `status`.
    fn body_fields(&self) -> Map<String, Value> {
        let value = match self {
            Self::Validation(_) | Self::Dispatch(_) | Self::Lanes(_) => {
                json!({ "error": self.to_string() })
            }
            Self::Routing(e) => routing_body(e),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Body fields for a routing failure.
fn routing_body(error: &RoutingError) -> Value {
    match error {
        RoutingError::BadRequest(msg) => json!({ "error": msg }),
        RoutingError::RouteTooLong { distance_km } => json!({
            "error": "Route too long",
            "details": format!(
                "The distance between points ({distance_km:.0} km) exceeds the maximum supported distance. Please use closer locations."
            ),
        }),
        RoutingError::Timeout => json!({
            "error": "Request timeout",
            "details": TIMEOUT_DETAIL,
        }),
        RoutingError::ServiceUnavailable {
            status,
            detail,
            suggestion,
        } => json!({
            "error": format!("Routing service returned error: {status}"),
            "details": detail,
            "suggestion": suggestion,
        }),
        RoutingError::RouteCalculationFailed { code, message } => json!({
            "error": "Route calculation failed",
            "code": code,
            "message": message,
        }),
        RoutingError::Internal { summary, detail } => json!({
            "error": summary,
            "details": detail,
        }),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.class().is_client_side() {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }

        let mut body = self.body_fields();
        body.insert("status".to_owned(), Value::from(status.as_u16()));

        (status, Json(Value::Object(body))).into_response()
    }
}
