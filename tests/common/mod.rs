//! Shared utilities for integration testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use media_gateway::config::{GatewayConfig, OriginMode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const ACCESS_KEY: &str = "test-access-key";
pub const UPSTREAM_KEY: &str = "test-tmdb-key";
pub const ALLOWED_ORIGIN: &str = "https://app.example.com";

/// A fake metadata provider that records every path it is asked for.
pub struct MockUpstream {
    pub base_url: String,
    hits: Arc<Mutex<Vec<(String, String)>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    /// Paths (relative to the `/3` base, without query) requested so far.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().iter().map(|(path, _)| path.clone()).collect()
    }

    /// Raw query strings of the requests received so far.
    pub fn queries(&self) -> Vec<String> {
        self.hits.lock().unwrap().iter().map(|(_, query)| query.clone()).collect()
    }

    pub fn clear(&self) {
        self.hits.lock().unwrap().clear();
    }
}

/// Start a mock provider on an ephemeral port.
pub async fn start_mock_upstream() -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(Mutex::new(Vec::new()));

    let recorded = hits.clone();
    let app = Router::new().fallback(move |uri: Uri| {
        let recorded = recorded.clone();
        async move {
            let path = uri.path().trim_start_matches("/3").to_string();
            let query = uri.query().unwrap_or_default().to_string();
            recorded.lock().unwrap().push((path.clone(), query.clone()));
            respond(&path, &query).await
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{}/3", addr),
        hits,
    }
}

/// Details for this id arrive only after [`SLOW_DELAY`].
pub const SLOW_ID: u64 = 999;
pub const SLOW_DELAY: Duration = Duration::from_secs(3);

async fn respond(path: &str, query: &str) -> Response {
    if !query.contains(&format!("api_key={}", UPSTREAM_KEY)) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status_code": 7, "status_message": "Invalid API key"})),
        )
            .into_response();
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["search", "multi"] | ["trending", "all", "day"] => Json(listing(None)).into_response(),
        ["trending", kind, "week"] => Json(listing(Some(*kind))).into_response(),
        [kind @ ("movie" | "tv"), "404"] => (
            StatusCode::NOT_FOUND,
            Json(json!({"status_code": 34, "status_message": format!("{} not found", kind)})),
        )
            .into_response(),
        [kind @ ("movie" | "tv"), id] if *id == SLOW_ID.to_string() => {
            tokio::time::sleep(SLOW_DELAY).await;
            Json(details(kind, SLOW_ID)).into_response()
        }
        ["movie" | "tv", "500"] => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        }
        [kind @ ("movie" | "tv"), id] if id.parse::<u64>().is_ok() => {
            Json(details(kind, id.parse().unwrap())).into_response()
        }
        [kind @ ("movie" | "tv"), _category] => Json(listing(Some(*kind))).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"status_code": 34}))).into_response(),
    }
}

fn listing(kind: Option<&str>) -> Value {
    let results = match kind {
        Some("movie") => json!([{"id": 603, "title": "The Matrix", "release_date": "1999-03-30"}]),
        Some(_) => json!([{"id": 1399, "name": "Game of Thrones", "first_air_date": "2011-04-17"}]),
        None => json!([
            {"id": 603, "media_type": "movie", "title": "The Matrix", "release_date": "1999-03-30"},
            {"id": 1399, "media_type": "tv", "name": "Game of Thrones", "first_air_date": "2011-04-17"},
            {"id": 6384, "media_type": "person", "name": "Keanu Reeves"}
        ]),
    };
    json!({"page": 1, "total_pages": 1, "total_results": 3, "results": results})
}

fn details(kind: &str, id: u64) -> Value {
    if kind == "movie" {
        json!({"id": id, "title": format!("Movie {}", id), "runtime": 136, "genres": [{"id": 28, "name": "Action"}]})
    } else {
        json!({"id": id, "name": format!("Show {}", id), "episode_run_time": [60], "number_of_seasons": 8})
    }
}

/// A valid configuration pointing at `upstream`, strict origin policy, non-production.
pub fn test_config(upstream: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.access.access_key = ACCESS_KEY.into();
    config.upstream.base_url = upstream.into();
    config.upstream.api_key = UPSTREAM_KEY.into();
    config.cors.mode = Some(OriginMode::Strict);
    config.cors.allowed_origins = vec![ALLOWED_ORIGIN.into()];
    config
}

/// Response status, headers and body parsed as JSON (`Value::Null` when empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Drive one request through the router in-process.
pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };

    TestResponse { status, headers, body }
}

/// GET `uri` with the given headers; `Host` defaults to `api.example.com`.
#[allow(dead_code)]
pub fn get(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("host")) {
        builder = builder.header("Host", "api.example.com");
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}
