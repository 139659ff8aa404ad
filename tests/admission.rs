//! Admission chain tests: origin policy, shared secret and HTTPS enforcement
//! driven through the fully layered router.

use axum::http::StatusCode;
use media_gateway::config::OriginMode;
use media_gateway::http::HttpServer;
use serde_json::json;

mod common;
use common::{get, send, start_mock_upstream, test_config, ACCESS_KEY, ALLOWED_ORIGIN};

#[tokio::test]
async fn test_missing_or_wrong_key_is_forbidden_everywhere() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    for path in ["/", "/search?query=dune", "/movie/603", "/tv-shows", "/unknown-prefix"] {
        let res = send(router.clone(), get(path, &[])).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "no key on {}", path);
        assert_eq!(res.body, json!({"error": "Forbidden: Invalid Access Key"}));

        let res = send(router.clone(), get(path, &[("x-access-key", "wrong")])).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "wrong key on {}", path);
        assert_eq!(res.body, json!({"error": "Forbidden: Invalid Access Key"}));
    }

    assert!(upstream.hits().is_empty());
}

#[tokio::test]
async fn test_correct_key_without_origin_is_admitted() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    let res = send(router, get("/", &[("x-access-key", ACCESS_KEY)])).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "media-gateway");
}

#[tokio::test]
async fn test_query_parameter_key() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    let uri = format!("/search?query=dune&ACCESS_KEY={}", ACCESS_KEY);
    let res = send(router.clone(), get(&uri, &[])).await;
    assert_eq!(res.status, StatusCode::OK);

    // A wrong header is not rescued by a correct query parameter.
    let res = send(router.clone(), get(&uri, &[("x-access-key", "wrong")])).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    // An empty header counts as absent.
    let res = send(router, get(&uri, &[("x-access-key", "")])).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unlisted_origin_rejected_before_auth() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    let res = send(
        router.clone(),
        get("/", &[("Origin", "https://evil.example"), ("x-access-key", ACCESS_KEY)]),
    )
    .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, json!({"error": "Forbidden: Origin not allowed by CORS policy"}));
    assert!(res.headers.get("access-control-allow-origin").is_none());

    // Origin runs first, so a keyless request from a bad origin gets the origin error.
    let res = send(router, get("/", &[("Origin", "https://evil.example")])).await;
    assert_eq!(res.body, json!({"error": "Forbidden: Origin not allowed by CORS policy"}));
}

#[tokio::test]
async fn test_listed_origin_gets_cors_headers() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    let res = send(
        router,
        get("/", &[("Origin", ALLOWED_ORIGIN), ("x-access-key", ACCESS_KEY)]),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["access-control-allow-origin"], ALLOWED_ORIGIN);
    assert_eq!(res.headers["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn test_preflight_answered_without_key() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/search")
        .header("Host", "api.example.com")
        .header("Origin", ALLOWED_ORIGIN)
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "x-access-key")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = send(router, request).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["access-control-allow-origin"], ALLOWED_ORIGIN);
    assert!(upstream.hits().is_empty());
}

#[tokio::test]
async fn test_plain_options_still_needs_key() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    let options = |headers: &[(&str, &str)]| {
        let mut builder = axum::http::Request::builder()
            .method("OPTIONS")
            .uri("/search")
            .header("Host", "api.example.com");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    };

    // Not a preflight: no Origin, no Access-Control-Request-Method.
    let res = send(router.clone(), options(&[])).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, json!({"error": "Forbidden: Invalid Access Key"}));

    // An Origin alone does not make it a preflight either.
    let res = send(router.clone(), options(&[("Origin", ALLOWED_ORIGIN)])).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = send(router, options(&[("x-access-key", ACCESS_KEY)])).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(upstream.hits().is_empty());
}

#[tokio::test]
async fn test_allow_all_with_origin_recheck() {
    let upstream = start_mock_upstream().await;
    let mut config = test_config(&upstream.base_url);
    config.cors.mode = Some(OriginMode::AllowAll);
    config.access.verify_origin = true;
    let router = HttpServer::new(config).unwrap().router();

    // The origin stage is gone, so only the access-key re-check can deny it.
    let res = send(
        router.clone(),
        get("/", &[("Origin", "https://evil.example"), ("x-access-key", ACCESS_KEY)]),
    )
    .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, json!({"error": "Forbidden: Origin not allowed"}));

    // Key is checked before the origin re-check.
    let res = send(
        router.clone(),
        get("/", &[("Origin", "https://evil.example"), ("x-access-key", "wrong")]),
    )
    .await;
    assert_eq!(res.body, json!({"error": "Forbidden: Invalid Access Key"}));

    let res = send(
        router,
        get("/", &[("Origin", ALLOWED_ORIGIN), ("x-access-key", ACCESS_KEY)]),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_production_redirects_plaintext_to_https() {
    let upstream = start_mock_upstream().await;
    let mut config = test_config(&upstream.base_url);
    config.transport.production = true;
    let router = HttpServer::new(config).unwrap().router();

    let res = send(
        router.clone(),
        get(
            "/search?query=dune&page=2",
            &[("x-access-key", ACCESS_KEY), ("x-forwarded-proto", "http")],
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(
        res.headers["location"],
        "https://api.example.com/search?query=dune&page=2"
    );

    // No forwarding header at all is treated as plaintext.
    let res = send(router.clone(), get("/movie/603", &[("x-access-key", ACCESS_KEY)])).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.headers["location"], "https://api.example.com/movie/603");
    assert!(upstream.hits().is_empty());

    let res = send(
        router,
        get(
            "/search?query=dune&page=2",
            &[("x-access-key", ACCESS_KEY), ("x-forwarded-proto", "https")],
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(upstream.hits(), vec!["/search/multi".to_string()]);
}

#[tokio::test]
async fn test_auth_failure_wins_over_redirect() {
    let upstream = start_mock_upstream().await;
    let mut config = test_config(&upstream.base_url);
    config.transport.production = true;
    let router = HttpServer::new(config).unwrap().router();

    let res = send(router, get("/", &[("x-forwarded-proto", "http")])).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert!(res.headers.get("location").is_none());
}

#[tokio::test]
async fn test_non_production_ignores_forwarded_proto() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    let res = send(
        router,
        get("/", &[("x-access-key", ACCESS_KEY), ("x-forwarded-proto", "http")]),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_on_every_response() {
    let upstream = start_mock_upstream().await;
    let router = HttpServer::new(test_config(&upstream.base_url)).unwrap().router();

    let denied = send(router.clone(), get("/", &[])).await;
    assert!(denied.headers.contains_key("x-request-id"));

    let res = send(
        router,
        get("/", &[("x-access-key", ACCESS_KEY), ("x-request-id", "trace-me")]),
    )
    .await;
    assert_eq!(res.headers["x-request-id"], "trace-me");
}
