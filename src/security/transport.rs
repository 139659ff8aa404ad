//! HTTPS enforcement behind a TLS-terminating proxy.
//!
//! The gateway never terminates TLS itself. In production the load balancer
//! reports the client's scheme in `x-forwarded-proto`; anything other than
//! exactly `https` is redirected to the `https://` form of the same URL.

use axum::{
    body::Body,
    http::{header::HOST, Request},
};

use crate::security::admission::{AdmissionStage, Verdict};
use crate::security::error::AdmissionError;

/// Header set by the trusted reverse proxy.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Third admission stage. Only installed when HTTPS is required.
#[derive(Debug, Default)]
pub struct TransportEnforcement;

/// `https://{host}{path}?{query}` for the request, preferring the `Host` header.
pub fn https_location(req: &Request<Body>) -> Option<String> {
    let host = req
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .map(str::to_owned)
        .or_else(|| req.uri().authority().map(|a| a.to_string()))?;

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Some(format!("https://{}{}", host, path_and_query))
}

impl AdmissionStage for TransportEnforcement {
    fn name(&self) -> &'static str {
        "transport"
    }

    fn evaluate(&self, req: &Request<Body>) -> Verdict {
        let proto = req
            .headers()
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok());

        if proto == Some("https") {
            return Verdict::Continue;
        }

        match https_location(req) {
            Some(location) => Verdict::Reject(AdmissionError::InsecureTransport { location }),
            None => Verdict::Reject(AdmissionError::MissingHost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, host: Option<&str>, proto: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(host) = host {
            builder = builder.header("Host", host);
        }
        if let Some(proto) = proto {
            builder = builder.header(X_FORWARDED_PROTO, proto);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_https_passes() {
        let req = request("/movies", Some("api.example.com"), Some("https"));
        assert_eq!(TransportEnforcement.evaluate(&req), Verdict::Continue);
    }

    #[test]
    fn test_http_redirects_preserving_path_and_query() {
        let req = request(
            "/search?query=the%20matrix&page=2",
            Some("api.example.com"),
            Some("http"),
        );
        assert_eq!(
            TransportEnforcement.evaluate(&req),
            Verdict::Reject(AdmissionError::InsecureTransport {
                location: "https://api.example.com/search?query=the%20matrix&page=2".into()
            })
        );
    }

    #[test]
    fn test_missing_or_inexact_proto_redirects() {
        for proto in [None, Some("HTTPS"), Some("https,http"), Some("")] {
            let req = request("/tv/1399", Some("api.example.com:8443"), proto);
            assert_eq!(
                TransportEnforcement.evaluate(&req),
                Verdict::Reject(AdmissionError::InsecureTransport {
                    location: "https://api.example.com:8443/tv/1399".into()
                }),
                "proto {:?}",
                proto
            );
        }
    }

    #[test]
    fn test_absolute_uri_authority_fallback() {
        let req = request("http://api.example.com/movie/603", None, Some("http"));
        assert_eq!(
            https_location(&req).as_deref(),
            Some("https://api.example.com/movie/603")
        );
    }

    #[test]
    fn test_no_host_at_all() {
        let req = request("/movie/603", None, Some("http"));
        assert_eq!(
            TransportEnforcement.evaluate(&req),
            Verdict::Reject(AdmissionError::MissingHost)
        );
    }
}
