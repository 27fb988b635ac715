//! HTTP client for the OSRM-compatible routing service.
//!
//! The client refuses requests whose endpoints are too far apart before
//! any network traffic, issues exactly one upstream call otherwise, and
//! returns the upstream JSON verbatim on success.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use serde_json::value::RawValue;
use siren_core::config::RoutingConfig;
use siren_core::validation::is_truthy;

use crate::distance::haversine_km;
use crate::error::RoutingError;
use crate::query::RouteEndpoints;
use crate::status::upstream_failure;

/// Characters of an unparsable success body kept in the log line.
const LOGGED_BODY_CHARS: usize = 200;

/// Client for `GET {base}/route/v1/{profile}/{lng},{lat};{lng},{lat}`.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    client: reqwest::Client,
    base_url: String,
    profile: String,
    max_distance_km: f64,
}

impl RoutingClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Internal`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RoutingError::internal("Failed to build routing client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            profile: config.profile.clone(),
            max_distance_km: config.max_distance_km,
        })
    }

    /// Reject endpoints further apart than the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::RouteTooLong`] with the computed distance.
    pub fn check_distance(&self, endpoints: &RouteEndpoints) -> Result<f64, RoutingError> {
        let distance_km = haversine_km(endpoints.source, endpoints.destination);
        if distance_km > self.max_distance_km {
            return Err(RoutingError::RouteTooLong { distance_km });
        }
        Ok(distance_km)
    }

    /// Upstream URL for the given endpoints. Coordinates go `lng,lat`.
    pub fn route_url(&self, endpoints: &RouteEndpoints) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            self.profile,
            endpoints.source.lng,
            endpoints.source.lat,
            endpoints.destination.lng,
            endpoints.destination.lat,
        )
    }

    /// Fetch a route and return the upstream body unchanged.
    ///
    /// The body comes back as the exact bytes the upstream sent, so key
    /// order and number formatting survive the relay.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::RouteTooLong`] before any network call
    /// - [`RoutingError::Timeout`] if the upstream does not answer in time
    /// - [`RoutingError::ServiceUnavailable`] on a non-2xx answer
    /// - [`RoutingError::RouteCalculationFailed`] if the body carries a
    ///   failure `code`
    /// - [`RoutingError::Internal`] on transport or parse failure
    pub async fn route(&self, endpoints: &RouteEndpoints) -> Result<Box<RawValue>, RoutingError> {
        let distance_km = self.check_distance(endpoints)?;
        let url = self.route_url(endpoints);
        tracing::debug!(url = %url, distance_km, "requesting route");

        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            let error = upstream_failure(status.as_u16(), &body);
            tracing::error!(status = status.as_u16(), error = %error, "routing upstream failed");
            return Err(error);
        }

        let data: Box<RawValue> = serde_json::from_str(&body).map_err(|e| {
            let head: String = body.chars().take(LOGGED_BODY_CHARS).collect();
            tracing::error!(error = %e, body = %head, "routing upstream returned unreadable body");
            RoutingError::internal("Failed to parse route data", e)
        })?;

        if let Some(error) = calculation_failure(&data) {
            tracing::warn!(error = %error, "routing upstream could not calculate route");
            return Err(error);
        }

        Ok(data)
    }
}

/// The status fields of an OSRM answer.
#[derive(Debug, Default, Deserialize)]
struct RouteStatus {
    code: Option<Value>,
    message: Option<Value>,
}

/// A truthy `code` other than `Ok` in a 2xx body.
fn calculation_failure(data: &RawValue) -> Option<RoutingError> {
    let status: RouteStatus = serde_json::from_str(data.get()).unwrap_or_default();
    let code = status.code.filter(is_truthy)?;
    if code.as_str() == Some("Ok") {
        return None;
    }
    Some(RoutingError::RouteCalculationFailed {
        code: code.as_str().map_or_else(|| code.to_string(), ToOwned::to_owned),
        message: status
            .message
            .as_ref()
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("Unable to calculate route")
            .to_owned(),
    })
}

/// Classify a reqwest failure.
fn transport_error(error: &reqwest::Error) -> RoutingError {
    if error.is_timeout() {
        tracing::error!(error = %error, "routing upstream timed out");
        RoutingError::Timeout
    } else {
        tracing::error!(error = %error, "routing upstream unreachable");
        RoutingError::internal("Failed to fetch route from routing service", error)
    }
}
