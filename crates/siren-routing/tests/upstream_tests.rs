//! Integration tests for the routing and geocoding clients.
//!
//! Each test starts a throwaway Axum server on `127.0.0.1:0` that plays
//! the upstream, then points a client at it. The mock counts hits so
//! tests can assert that guarded requests never reach the network.

#![allow(clippy::unwrap_used)]

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use siren_core::config::{GeocodingConfig, RoutingConfig};
use siren_routing::status::{GATEWAY_TIMEOUT_DETAIL, UNAVAILABLE_DETAIL, UNPARSABLE_DETAIL};
use siren_routing::{
    GeoPoint, GeocodingClient, RouteEndpoints, RouteQuery, RoutingClient, RoutingError,
};

struct Upstream {
    status: StatusCode,
    body: String,
    delay: Duration,
    hits: AtomicUsize,
    last_uri: std::sync::Mutex<String>,
}

async fn answer(State(upstream): State<Arc<Upstream>>, request: Request) -> Response {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    *upstream.last_uri.lock().unwrap() = request.uri().to_string();
    tokio::time::sleep(upstream.delay).await;
    (upstream.status, upstream.body.clone()).into_response()
}

async fn spawn_upstream(status: u16, body: &str, delay_ms: u64) -> (String, Arc<Upstream>) {
    let upstream = Arc::new(Upstream {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_owned(),
        delay: Duration::from_millis(delay_ms),
        hits: AtomicUsize::new(0),
        last_uri: std::sync::Mutex::new(String::new()),
    });
    let app = Router::new().fallback(answer).with_state(Arc::clone(&upstream));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), upstream)
}

fn routing_client(base_url: &str, timeout_ms: u64) -> RoutingClient {
    RoutingClient::new(&RoutingConfig {
        base_url: base_url.to_owned(),
        timeout_ms,
        ..RoutingConfig::default()
    })
    .unwrap()
}

fn geocoding_client(base_url: &str, timeout_ms: u64) -> GeocodingClient {
    GeocodingClient::new(
        &GeocodingConfig {
            base_url: base_url.to_owned(),
            timeout_ms,
            ..GeocodingConfig::default()
        },
        "test-agent",
    )
    .unwrap()
}

fn berlin_trip() -> RouteEndpoints {
    RouteEndpoints {
        source: GeoPoint::new(52.52, 13.405),
        destination: GeoPoint::new(52.50, 13.45),
    }
}

#[tokio::test]
async fn success_body_passes_through_verbatim() {
    let body = r#"{"waypoints":[],"routes":[{"geometry":{"type":"LineString"},"duration":612.3,"distance":4210.5}],"code":"Ok"}"#;
    let (base, upstream) = spawn_upstream(200, body, 0).await;

    let result = routing_client(&base, 5_000).route(&berlin_trip()).await.unwrap();

    assert_eq!(result.get(), body);
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
    let uri = upstream.last_uri.lock().unwrap().clone();
    assert!(uri.starts_with("/route/v1/driving/13.405,52.52;13.45,52.5?"));
    assert!(uri.contains("overview=full"));
    assert!(uri.contains("geometries=geojson"));
}

#[tokio::test]
async fn body_without_code_is_success() {
    let (base, _upstream) = spawn_upstream(200, r#"{"routes": []}"#, 0).await;
    let result = routing_client(&base, 5_000).route(&berlin_trip()).await.unwrap();
    let parsed: Value = serde_json::from_str(result.get()).unwrap();
    assert_eq!(parsed, json!({"routes": []}));
}

#[tokio::test]
async fn failure_code_is_logical_failure() {
    let (base, _upstream) =
        spawn_upstream(200, r#"{"code": "NoRoute", "message": "Impossible route"}"#, 0).await;

    let error = routing_client(&base, 5_000).route(&berlin_trip()).await.unwrap_err();

    assert_eq!(
        error,
        RoutingError::RouteCalculationFailed {
            code: "NoRoute".to_owned(),
            message: "Impossible route".to_owned(),
        }
    );
    assert_eq!(error.http_status(), 400);
}

#[tokio::test]
async fn failure_code_without_message_gets_default() {
    let (base, _upstream) = spawn_upstream(200, r#"{"code": "NoSegment"}"#, 0).await;
    let error = routing_client(&base, 5_000).route(&berlin_trip()).await.unwrap_err();
    assert_eq!(
        error,
        RoutingError::RouteCalculationFailed {
            code: "NoSegment".to_owned(),
            message: "Unable to calculate route".to_owned(),
        }
    );
}

#[tokio::test]
async fn gateway_statuses_are_mirrored_with_fixed_detail() {
    for (status, detail) in [
        (502, UNAVAILABLE_DETAIL),
        (503, UNAVAILABLE_DETAIL),
        (504, GATEWAY_TIMEOUT_DETAIL),
    ] {
        let (base, _upstream) = spawn_upstream(status, "{}", 0).await;
        let error = routing_client(&base, 5_000).route(&berlin_trip()).await.unwrap_err();
        assert_eq!(error.http_status(), status);
        assert!(matches!(
            &error,
            RoutingError::ServiceUnavailable { detail: d, .. } if d == detail
        ));
    }
}

#[tokio::test]
async fn unparsable_error_body_is_reported() {
    let (base, _upstream) = spawn_upstream(503, "<html>Service Unavailable</html>", 0).await;
    let error = routing_client(&base, 5_000).route(&berlin_trip()).await.unwrap_err();
    assert_eq!(error.http_status(), 503);
    assert!(matches!(
        &error,
        RoutingError::ServiceUnavailable { detail, .. } if detail == UNPARSABLE_DETAIL
    ));
}

#[tokio::test]
async fn unparsable_success_body_is_internal() {
    let (base, _upstream) = spawn_upstream(200, "not json at all", 0).await;
    let error = routing_client(&base, 5_000).route(&berlin_trip()).await.unwrap_err();
    assert_eq!(error.http_status(), 500);
    assert!(matches!(
        &error,
        RoutingError::Internal { summary, .. } if summary == "Failed to parse route data"
    ));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let (base, _upstream) = spawn_upstream(200, r#"{"code": "Ok"}"#, 1_000).await;
    let error = routing_client(&base, 50).route(&berlin_trip()).await.unwrap_err();
    assert_eq!(error, RoutingError::Timeout);
    assert_eq!(error.http_status(), 504);
}

#[tokio::test]
async fn too_long_route_never_reaches_upstream() {
    let (base, upstream) = spawn_upstream(200, r#"{"code": "Ok"}"#, 0).await;
    let client = RoutingClient::new(&RoutingConfig {
        base_url: base,
        max_distance_km: 500.0,
        ..RoutingConfig::default()
    })
    .unwrap();

    let query = RouteQuery {
        source_lng: Some("13.405".to_owned()),
        source_lat: Some("52.52".to_owned()),
        dest_lng: Some("2.3522".to_owned()),
        dest_lat: Some("48.8566".to_owned()),
    };
    let error = client.route(&query.endpoints().unwrap()).await.unwrap_err();

    assert!(matches!(error, RoutingError::RouteTooLong { .. }));
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn geocoder_result_passes_through() {
    let body = r#"[{"lon":"13.3888599","lat":"52.5170365","display_name":"Berlin"}]"#;
    let (base, upstream) = spawn_upstream(200, body, 0).await;

    let result = geocoding_client(&base, 5_000).search("Berlin").await.unwrap();

    assert_eq!(result.get(), body);
    let uri = upstream.last_uri.lock().unwrap().clone();
    assert!(uri.starts_with("/search?"));
    assert!(uri.contains("q=Berlin"));
    assert!(uri.contains("limit=1"));
}

#[tokio::test]
async fn geocoder_rejects_blank_query_without_network() {
    let (base, upstream) = spawn_upstream(200, "[]", 0).await;

    let error = geocoding_client(&base, 5_000).search("   ").await.unwrap_err();

    assert!(matches!(error, RoutingError::BadRequest(_)));
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn geocoder_slow_body_times_out() {
    let app = Router::new().fallback(|| async {
        let body = futures::stream::once(async {
            tokio::time::sleep(Duration::from_millis(1_000)).await;
            Ok::<_, Infallible>("[]")
        });
        (StatusCode::OK, Body::from_stream(body))
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let error = geocoding_client(&format!("http://{addr}"), 200)
        .search("Berlin")
        .await
        .unwrap_err();

    assert_eq!(error, RoutingError::Timeout);
    assert_eq!(error.http_status(), 504);
}

#[tokio::test]
async fn geocoder_error_status_is_unavailable() {
    let (base, _upstream) = spawn_upstream(503, "busy", 0).await;
    let error = geocoding_client(&base, 5_000).search("Berlin").await.unwrap_err();
    assert_eq!(error.http_status(), 503);
    assert!(matches!(error, RoutingError::ServiceUnavailable { .. }));
}
