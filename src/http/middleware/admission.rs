//! Admission Middleware.
//! Runs the admission chain in front of every route.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::http::request::request_id;
use crate::observability::metrics;
use crate::security::cors::is_preflight;
use crate::security::{AdmissionChain, AdmissionError, Verdict};

pub async fn admission_middleware(
    State(chain): State<Arc<AdmissionChain>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match chain.evaluate(&req) {
        Verdict::Continue => next.run(req).await,
        Verdict::Reject(err) => reject(&req, err),
    }
}

/// Sits outside the CORS layer, which answers every `OPTIONS` request on its own.
/// Only genuine preflights may pass without admission.
pub async fn options_gate(
    State(chain): State<Arc<AdmissionChain>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() == Method::OPTIONS && !is_preflight(&req) {
        if let Verdict::Reject(err) = chain.evaluate(&req) {
            return reject(&req, err);
        }
    }
    next.run(req).await
}

fn reject(req: &Request<Body>, err: AdmissionError) -> Response {
    let request_id = request_id(req.headers());
    match &err {
        AdmissionError::InsecureTransport { location } => {
            info!(
                request_id = %request_id,
                location = %location,
                "Redirecting plaintext request to HTTPS"
            );
        }
        _ => {
            warn!(
                request_id = %request_id,
                method = %req.method(),
                path = %req.uri().path(),
                reason = err.reason(),
                "Request denied"
            );
        }
    }

    metrics::record_admission_denied(err.reason());
    err.into_response()
}
