//! Integration tests for the dispatch API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The routing upstream points at an unroutable
//! address, so any test that reached it would fail.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use siren_api::router::build_router;
use siren_api::state::AppState;
use siren_core::SirenConfig;
use siren_types::{RealtimeEvent, RouteId};
use tower::ServiceExt;

fn make_state(config: &SirenConfig) -> Arc<AppState> {
    Arc::new(AppState::new(config).unwrap())
}

fn test_config() -> SirenConfig {
    let mut config = SirenConfig::default();
    config.routing.base_url = "http://127.0.0.1:9".to_owned();
    config.geocoding.base_url = "http://127.0.0.1:9".to_owned();
    config
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// =========================================================================
// Emergency routes
// =========================================================================

#[tokio::test]
async fn create_route_returns_201_and_broadcasts() {
    let state = make_state(&test_config());
    let mut rx = state.dispatcher.subscribe();
    let app = build_router(Arc::clone(&state));

    let (status, body) = send(
        &app,
        post_json("/emergency-routes", &json!({"source": "A", "destination": "B"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["status"], "dispatched");
    assert_eq!(body["vehicleType"], "ambulance");
    assert_eq!(body["emergencyType"], "medical");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["source"], "A");
    assert_eq!(body["routeInfo"], Value::Null);
    assert_eq!(body["emergencyDateTime"], body["timestamp"]);
    assert!(body["driverId"].as_str().unwrap().starts_with("driver-"));

    assert!(matches!(
        rx.try_recv().unwrap(),
        RealtimeEvent::EmergencyRoute(route) if route.id == RouteId::new(1)
    ));
}

#[tokio::test]
async fn create_route_keeps_place_objects_and_caller_fields() {
    let state = make_state(&test_config());
    let app = build_router(state);

    let payload = json!({
        "source": {"address": "Main St 1", "coords": {"lat": 52.5, "lng": 13.4, "displayName": "Main St"}},
        "destination": {"address": "City Hospital"},
        "driverName": "Sam",
        "vehicleType": "fire",
        "priority": "",
        "routeInfo": {"distance": "4.2 km", "normalTime": "12 min", "ambulanceTime": "8 min"},
        "id": 999
    });
    let (status, body) = send(&app, post_json("/emergency-routes", &payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["source"]["coords"]["displayName"], "Main St");
    assert_eq!(body["destination"]["address"], "City Hospital");
    assert_eq!(body["driverName"], "Sam");
    assert_eq!(body["vehicleType"], "fire");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["routeInfo"]["ambulanceTime"], "8 min");
}

#[tokio::test]
async fn create_route_without_destination_is_rejected() {
    let state = make_state(&test_config());
    let mut rx = state.dispatcher.subscribe();
    let app = build_router(Arc::clone(&state));

    let (status, body) = send(&app, post_json("/emergency-routes", &json!({"source": "A"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Source and destination are required");
    assert_eq!(body["status"], 400);
    assert!(rx.try_recv().is_err());

    let (_, list) = send(&app, get("/emergency-routes")).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = build_router(make_state(&test_config()));
    let request = Request::builder()
        .method("POST")
        .uri("/emergency-routes")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_routes_in_creation_order() {
    let app = build_router(make_state(&test_config()));
    for (source, destination) in [("A", "B"), ("C", "D"), ("E", "F")] {
        let (status, _) = send(
            &app,
            post_json(
                "/emergency-routes",
                &json!({"source": source, "destination": destination}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get("/emergency-routes")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["id"].as_u64())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn delete_route_removes_and_broadcasts() {
    let state = make_state(&test_config());
    let app = build_router(Arc::clone(&state));
    send(&app, post_json("/emergency-routes", &json!({"source": "A", "destination": "B"}))).await;
    send(&app, post_json("/emergency-routes", &json!({"source": "C", "destination": "D"}))).await;
    let mut rx = state.dispatcher.subscribe();

    let (status, body) = send(&app, delete("/emergency-routes/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Route deleted successfully");
    assert_eq!(
        rx.try_recv().unwrap(),
        RealtimeEvent::EmergencyRouteDeleted { id: RouteId::new(1) }
    );

    let (_, list) = send(&app, get("/emergency-routes")).await;
    let ids: Vec<u64> = list
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["id"].as_u64())
        .collect();
    assert_eq!(ids, vec![2]);

    // Ids are never reused after a delete.
    let (_, created) = send(
        &app,
        post_json("/emergency-routes", &json!({"source": "E", "destination": "F"})),
    )
    .await;
    assert_eq!(created["id"], 3);
}

#[tokio::test]
async fn delete_unknown_route_is_404_without_broadcast() {
    let state = make_state(&test_config());
    let mut rx = state.dispatcher.subscribe();
    let app = build_router(Arc::clone(&state));

    for uri in ["/emergency-routes/42", "/emergency-routes/abc"] {
        let (status, body) = send(&app, delete(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Route not found");
        assert_eq!(body["status"], 404);
    }
    assert!(rx.try_recv().is_err());
}

// =========================================================================
// Alerts and traffic status
// =========================================================================

#[tokio::test]
async fn create_alert_requires_incident_and_location() {
    let state = make_state(&test_config());
    let mut rx = state.dispatcher.subscribe();
    let app = build_router(Arc::clone(&state));

    let (status, body) = send(&app, post_json("/alerts", &json!({"incident": "jam"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing location");

    let (status, body) = send(&app, post_json("/alerts", &json!({"location": "A1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing incident");

    assert!(rx.try_recv().is_err());
    let (_, list) = send(&app, get("/alerts")).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_alert_stores_extra_fields_and_broadcasts() {
    let state = make_state(&test_config());
    let mut rx = state.dispatcher.subscribe();
    let app = build_router(Arc::clone(&state));

    let (status, body) = send(
        &app,
        post_json(
            "/alerts",
            &json!({"incident": "congestion", "location": "lane 2", "vehicles": 14, "id": "spoofed"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["vehicles"], 14);
    assert!(body["ts"].as_i64().unwrap() > 0);
    assert!(matches!(rx.try_recv().unwrap(), RealtimeEvent::Alert(_)));

    let (_, list) = send(&app, get("/alerts")).await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn traffic_status_follows_latest_alert() {
    let app = build_router(make_state(&test_config()));

    let (status, body) = send(&app, get("/traffic/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"vehicles": 0, "latest": {}}));

    send(
        &app,
        post_json("/alerts", &json!({"incident": "count", "location": "lane 1", "vehicles": 9})),
    )
    .await;
    send(
        &app,
        post_json("/alerts", &json!({"incident": "count", "location": "lane 2", "vehicles": 21})),
    )
    .await;

    for uri in ["/traffic/status", "/api/status"] {
        let (_, body) = send(&app, get(uri)).await;
        assert_eq!(body["vehicles"], 21);
        assert_eq!(body["latest"]["location"], "lane 2");
        assert_eq!(body["latest"]["id"], 2);
    }
}

// =========================================================================
// Upstream proxies (no network reached)
// =========================================================================

#[tokio::test]
async fn route_with_missing_parameters_is_400() {
    let app = build_router(make_state(&test_config()));
    let (status, body) = send(&app, get("/api/route?sourceLng=13.4&sourceLat=52.5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required parameters: sourceLng, sourceLat, destLng, destLat"
    );
}

#[tokio::test]
async fn route_with_bad_coordinates_is_400() {
    let app = build_router(make_state(&test_config()));
    let (status, body) = send(
        &app,
        get("/route?sourceLng=east&sourceLat=52.5&destLng=13.5&destLat=52.6"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid coordinates provided");
}

#[tokio::test]
async fn route_too_long_is_rejected_before_upstream() {
    let app = build_router(make_state(&test_config()));
    // Berlin to Sydney, roughly 16,000 km.
    let (status, body) = send(
        &app,
        get("/api/route?sourceLng=13.405&sourceLat=52.52&destLng=151.2093&destLat=-33.8688"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Route too long");
    assert!(body["details"].as_str().unwrap().contains("km"));
}

#[tokio::test]
async fn geocode_without_query_is_400() {
    let app = build_router(make_state(&test_config()));
    let (status, body) = send(&app, get("/api/geocode")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

// =========================================================================
// Lane configuration
// =========================================================================

fn lane(lane_id: u64) -> Value {
    json!({
        "lane_id": lane_id,
        "polygon": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}, {"x": 0, "y": 10}],
        "line": {"a": {"x": 0, "y": 5}, "b": {"x": 10, "y": 5}}
    })
}

#[tokio::test]
async fn configure_writes_lane_file() {
    let dir = std::env::temp_dir().join(format!("siren-api-{}", uuid::Uuid::new_v4()));
    let config_path = dir.join("configs").join("video_configs.json");
    let mut config = test_config();
    config.lanes.config_path = config_path.display().to_string();
    config.lanes.image_dir = "images".to_owned();
    let app = build_router(make_state(&config));

    let (status, body) = send(
        &app,
        post_json("/api/configure", &json!({"lanes": [lane(3), lane(4)]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "saved": 2}));

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(written[0]["path"], "images/lane3.jpeg");
    assert_eq!(written[1]["lane_id"], 4);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn configure_rejects_bad_lanes() {
    let app = build_router(make_state(&test_config()));

    let (status, body) = send(&app, post_json("/api/configure", &json!({"lane": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Expected { lanes: [...] }");

    let mut short = lane(7);
    short["polygon"] = json!([{"x": 0, "y": 0}]);
    let (status, body) = send(&app, post_json("/api/configure", &json!({"lanes": [short]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "lane 7: polygon must contain 4 points");
}

// =========================================================================
// Status page
// =========================================================================

#[tokio::test]
async fn index_serves_html() {
    let app = build_router(make_state(&test_config()));
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Siren Dispatch"));
    assert!(html.contains("/emergency-routes"));
}
