//! Handler-layer errors.
//!
//! These never escape as panics: each maps to a JSON error response and the
//! gateway keeps serving.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::response::json_error;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Caller input the handler cannot use (missing query, bad id, ...).
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("upstream request timed out")]
    UpstreamTimeout,

    #[error("upstream request failed: {0}")]
    UpstreamTransport(#[source] reqwest::Error),

    #[error("upstream returned status {0}")]
    UpstreamStatus(StatusCode),

    #[error("upstream payload could not be decoded: {0}")]
    UpstreamDecode(#[source] reqwest::Error),

    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid upstream base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl HandlerError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::BadRequest(_) => "bad_request",
            HandlerError::NotFound(_) => "not_found",
            HandlerError::MethodNotAllowed => "method_not_allowed",
            HandlerError::UpstreamTimeout => "upstream_timeout",
            HandlerError::UpstreamTransport(_) => "upstream_transport",
            HandlerError::UpstreamStatus(_) => "upstream_status",
            HandlerError::UpstreamDecode(_) => "upstream_decode",
            HandlerError::Client(_) => "client",
            HandlerError::InvalidBaseUrl(_) => "invalid_base_url",
        }
    }

    fn is_upstream(&self) -> bool {
        matches!(
            self,
            HandlerError::UpstreamTimeout
                | HandlerError::UpstreamTransport(_)
                | HandlerError::UpstreamStatus(_)
                | HandlerError::UpstreamDecode(_)
        )
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        if self.is_upstream() {
            tracing::error!(kind = self.kind(), error = %self, "Upstream call failed");
            metrics::record_upstream_error(self.kind());
        }

        match &self {
            HandlerError::BadRequest(_) => json_error(StatusCode::BAD_REQUEST, self.to_string()),
            HandlerError::NotFound(_) => json_error(StatusCode::NOT_FOUND, self.to_string()),
            HandlerError::MethodNotAllowed => {
                json_error(StatusCode::METHOD_NOT_ALLOWED, self.to_string())
            }
            HandlerError::UpstreamTimeout => json_error(
                StatusCode::GATEWAY_TIMEOUT,
                "Gateway Timeout: upstream did not respond in time",
            ),
            HandlerError::UpstreamStatus(status) if *status == StatusCode::NOT_FOUND => {
                json_error(StatusCode::NOT_FOUND, "Not Found")
            }
            HandlerError::UpstreamStatus(status) if *status == StatusCode::TOO_MANY_REQUESTS => json_error(
                StatusCode::TOO_MANY_REQUESTS,
                "Too Many Requests: upstream rate limit reached",
            ),
            HandlerError::UpstreamStatus(_)
            | HandlerError::UpstreamTransport(_)
            | HandlerError::UpstreamDecode(_) => {
                json_error(StatusCode::BAD_GATEWAY, "Bad Gateway: upstream request failed")
            }
            HandlerError::Client(_) | HandlerError::InvalidBaseUrl(_) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            ),
        }
    }
}
