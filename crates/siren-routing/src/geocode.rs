//! HTTP client for the Nominatim-compatible geocoder.

use std::time::Duration;

use serde_json::value::RawValue;
use siren_core::config::GeocodingConfig;

use crate::error::RoutingError;

/// Message for an empty search string.
pub const MISSING_QUERY: &str = "Missing required parameter: q";

/// Suggestion attached to geocoder failures.
const GEOCODE_SUGGESTION: &str = "Try again in a few moments or enter coordinates directly.";

/// Client for `GET {base}/search?format=json&q=..&limit=1`.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodingClient {
    /// Build a client. The geocoder requires an identifying user agent.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Internal`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &GeocodingConfig, user_agent: &str) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(user_agent.to_owned())
            .build()
            .map_err(|e| RoutingError::internal("Failed to build geocoding client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Look up an address and return the geocoder's answer byte for byte.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::BadRequest`] for an empty query,
    /// [`RoutingError::Timeout`] if the geocoder is too slow,
    /// [`RoutingError::ServiceUnavailable`] on a non-2xx answer, and
    /// [`RoutingError::Internal`] on transport or parse failure.
    pub async fn search(&self, query: &str) -> Result<Box<RawValue>, RoutingError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RoutingError::BadRequest(MISSING_QUERY.to_owned()));
        }

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "geocoding upstream failed");
            return Err(RoutingError::ServiceUnavailable {
                status: status.as_u16(),
                detail: "Geocoding service is temporarily unavailable".to_owned(),
                suggestion: GEOCODE_SUGGESTION,
            });
        }

        let body = response.text().await.map_err(|e| transport_error(&e))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "geocoding upstream returned unreadable body");
            RoutingError::internal("Failed to parse geocoding data", e)
        })
    }
}

/// Classify a reqwest failure, whether sending or reading the body.
fn transport_error(error: &reqwest::Error) -> RoutingError {
    if error.is_timeout() {
        tracing::error!(error = %error, "geocoding upstream timed out");
        RoutingError::Timeout
    } else {
        tracing::error!(error = %error, "geocoding upstream unreachable");
        RoutingError::internal("Failed to reach geocoding service", error)
    }
}
