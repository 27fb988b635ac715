//! Status endpoints for the dispatch server.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/traffic/status` | Vehicle count and latest alert |
//! | `GET` | `/api/status` | Alias of `/traffic/status` |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use siren_types::TrafficStatus;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing record counts and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (route_count, alert_count) = state.dispatcher.counts().await;
    let listeners = state.dispatcher.broadcaster().connection_count();
    let started = state.started_at.format("%Y-%m-%d %H:%M:%S UTC");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Siren Dispatch</title>
    <style>
        body {{
            background: #101418;
            color: #d0d7de;
            font-family: 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #ff6b6b; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #ff6b6b; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .method {{ color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Siren Dispatch</h1>
    <p class="subtitle">Emergency vehicle dispatch server, up since {started}</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Emergency routes</div>
            <div class="value">{route_count}</div>
        </div>
        <div class="metric">
            <div class="label">Alerts</div>
            <div class="value">{alert_count}</div>
        </div>
        <div class="metric">
            <div class="label">Live listeners</div>
            <div class="value">{listeners}</div>
        </div>
    </div>

    <h2>Endpoints</h2>
    <ul>
        <li><span class="method">GET</span> <a href="/emergency-routes">/emergency-routes</a></li>
        <li><span class="method">POST</span> /emergency-routes</li>
        <li><span class="method">DELETE</span> /emergency-routes/{{id}}</li>
        <li><span class="method">GET</span> <a href="/alerts">/alerts</a></li>
        <li><span class="method">POST</span> /alerts</li>
        <li><span class="method">GET</span> <a href="/traffic/status">/traffic/status</a></li>
        <li><span class="method">GET</span> /api/route?sourceLng=&amp;sourceLat=&amp;destLng=&amp;destLat=</li>
        <li><span class="method">GET</span> /api/geocode?q=</li>
        <li><span class="method">POST</span> /api/configure</li>
        <li><span class="method">WS</span> /ws</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /traffic/status
// ---------------------------------------------------------------------------

/// Vehicle count taken from the latest alert, plus the alert itself.
pub async fn traffic_status(State(state): State<Arc<AppState>>) -> Json<TrafficStatus> {
    Json(state.dispatcher.traffic_status().await)
}
