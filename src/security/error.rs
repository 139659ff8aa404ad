//! Admission failures and their HTTP rendering.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::response::json_error;

/// Why a request was stopped before reaching a route handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Browser origin outside the allow-list (origin policy stage).
    #[error("Forbidden: Origin not allowed by CORS policy")]
    CrossOriginDenied,

    /// Browser origin outside the allow-list (re-checked during authentication).
    #[error("Forbidden: Origin not allowed")]
    OriginNotAllowed,

    /// Shared secret missing or wrong.
    #[error("Forbidden: Invalid Access Key")]
    InvalidAccessKey,

    /// Plaintext request in a deployment that requires HTTPS.
    #[error("Redirecting to {location}")]
    InsecureTransport { location: String },

    /// A redirect was required but the request carried no host to redirect to.
    #[error("Bad Request: missing Host header")]
    MissingHost,
}

impl AdmissionError {
    /// Stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            AdmissionError::CrossOriginDenied => "cross_origin_denied",
            AdmissionError::OriginNotAllowed => "origin_not_allowed",
            AdmissionError::InvalidAccessKey => "invalid_access_key",
            AdmissionError::InsecureTransport { .. } => "insecure_transport",
            AdmissionError::MissingHost => "missing_host",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AdmissionError::CrossOriginDenied
            | AdmissionError::OriginNotAllowed
            | AdmissionError::InvalidAccessKey => StatusCode::FORBIDDEN,
            AdmissionError::InsecureTransport { .. } => StatusCode::FOUND,
            AdmissionError::MissingHost => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AdmissionError {
    fn into_response(self) -> Response {
        match self {
            AdmissionError::InsecureTransport { location } => {
                match HeaderValue::try_from(location) {
                    Ok(location) => {
                        (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
                    }
                    Err(_) => AdmissionError::MissingHost.into_response(),
                }
            }
            other => json_error(other.status(), other.to_string()),
        }
    }
}
