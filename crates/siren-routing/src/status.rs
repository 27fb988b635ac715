//! Translation of upstream failures into [`RoutingError`] kinds.
//!
//! Known upstream status codes map to fixed user-facing details through
//! [`STATUS_DETAILS`]. Anything not in the table falls back to the
//! message in the upstream's error body, then to a generic detail.

use serde_json::Value;

use crate::error::RoutingError;

/// Detail for 502/503 answers.
pub const UNAVAILABLE_DETAIL: &str = "Routing service is temporarily unavailable. Please try again in a few moments or use locations closer together.";

/// Detail for 504 answers.
pub const GATEWAY_TIMEOUT_DETAIL: &str =
    "Routing service timeout. The route may be too complex. Please try with locations closer together.";

/// Detail when a status is not in the table and the body names no cause.
pub const GENERIC_DETAIL: &str = "Routing service is temporarily unavailable";

/// Detail when the upstream error body is not JSON.
pub const UNPARSABLE_DETAIL: &str =
    "Unable to parse error response. The routing service may be temporarily unavailable.";

/// Suggestion attached to a readable upstream failure.
pub const RETRY_OR_CLOSER: &str =
    "Try again in a few moments or use locations that are closer together.";

/// Suggestion attached when the upstream error body is unreadable.
pub const RETRY_LATER: &str = "Please try again in a few moments.";

/// Upstream status codes with a fixed detail message.
pub const STATUS_DETAILS: &[(u16, &str)] = &[
    (502, UNAVAILABLE_DETAIL),
    (503, UNAVAILABLE_DETAIL),
    (504, GATEWAY_TIMEOUT_DETAIL),
];

/// The fixed detail for `status`, if the table has one.
pub fn known_detail(status: u16) -> Option<&'static str> {
    STATUS_DETAILS
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, detail)| *detail)
}

/// Build the error for a non-2xx upstream answer.
///
/// An empty body counts as an empty JSON object. A body that is not JSON
/// yields [`UNPARSABLE_DETAIL`] regardless of the status.
pub fn upstream_failure(status: u16, body: &str) -> RoutingError {
    let parsed: Result<Value, _> = if body.trim().is_empty() {
        Ok(Value::Object(serde_json::Map::new()))
    } else {
        serde_json::from_str(body)
    };

    let Ok(error_body) = parsed else {
        return RoutingError::ServiceUnavailable {
            status,
            detail: UNPARSABLE_DETAIL.to_owned(),
            suggestion: RETRY_LATER,
        };
    };

    let detail = known_detail(status)
        .map(ToOwned::to_owned)
        .or_else(|| body_message(&error_body))
        .unwrap_or_else(|| GENERIC_DETAIL.to_owned());

    RoutingError::ServiceUnavailable {
        status,
        detail,
        suggestion: RETRY_OR_CLOSER,
    }
}

/// `message`, else `error`, from an upstream error body.
fn body_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}
