//! CORS response headers.
//!
//! Admission decides *whether* a browser origin may call the gateway; this
//! layer only decorates responses (and answers preflights) so browsers accept
//! them. In strict mode the matched origin is echoed back, never `*`, because
//! credentialed requests reject a wildcard.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, Method, Request};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{CorsConfig, OriginMode};
use crate::http::request::X_REQUEST_ID;
use crate::security::access_key::ACCESS_KEY_HEADER;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// A CORS preflight: `OPTIONS` carrying both `Origin` and `Access-Control-Request-Method`.
pub fn is_preflight(req: &Request<Body>) -> bool {
    req.method() == Method::OPTIONS
        && req.headers().contains_key(header::ORIGIN)
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Build the CORS layer for the configured origin policy.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let methods = [Method::GET, Method::HEAD, Method::OPTIONS];

    match config.effective_mode() {
        OriginMode::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
            .expose_headers(Any)
            .max_age(PREFLIGHT_MAX_AGE),
        OriginMode::Strict => {
            let origins: Vec<HeaderValue> = config
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(methods)
                .allow_headers([
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                    HeaderName::from_static(ACCESS_KEY_HEADER),
                ])
                .expose_headers([HeaderName::from_static(X_REQUEST_ID)])
                .allow_credentials(config.credentials_allowed())
                .max_age(PREFLIGHT_MAX_AGE)
        }
    }
}
