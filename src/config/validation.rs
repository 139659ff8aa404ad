//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require an explicit shared secret
//! - Validate origin strings, upstream URL and value ranges
//! - Reject CORS combinations browsers will refuse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{GatewayConfig, OriginMode};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("access.access_key must be set (ACCESS_KEY)")]
    MissingAccessKey,

    #[error("cors.allowed_origins entry '{0}' is not a bare scheme://host[:port] origin")]
    InvalidOrigin(String),

    #[error("cors.allow_credentials cannot be combined with the allow-all origin policy")]
    CredentialsWithWildcard,

    #[error("upstream.base_url '{0}' is not a valid http(s) URL")]
    InvalidUpstreamUrl(String),

    #[error("upstream.api_key must be set (TMDB_API_KEY)")]
    MissingUpstreamKey,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.access.access_key.is_empty() {
        errors.push(ValidationError::MissingAccessKey);
    }

    for origin in &config.cors.allowed_origins {
        if !is_bare_origin(origin) {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if config.cors.effective_mode() == OriginMode::AllowAll
        && config.cors.allow_credentials == Some(true)
    {
        errors.push(ValidationError::CredentialsWithWildcard);
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidUpstreamUrl(config.upstream.base_url.clone())),
    }

    if config.upstream.api_key.is_empty() {
        errors.push(ValidationError::MissingUpstreamKey);
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// An origin is exactly what a browser sends: scheme, host and optional port.
/// Anything with a path, query, credentials or trailing slash would never match.
fn is_bare_origin(origin: &str) -> bool {
    match Url::parse(origin) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.origin().ascii_serialization() == origin
        }
        Err(_) => false,
    }
}
