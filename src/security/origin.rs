//! Origin policy.
//!
//! # Responsibilities
//! - Hold the configured allow-list of browser origins
//! - Admit requests without an `Origin` header (server-to-server, curl, SDKs)
//! - Deny browser requests whose origin is not listed
//!
//! # Design Decisions
//! - Exact, case-sensitive string comparison; no wildcards or suffix matching
//! - List order is preserved for logging but irrelevant to the decision

use axum::{body::Body, http::header::ORIGIN, http::Request};

use crate::security::admission::{AdmissionStage, Verdict};
use crate::security::error::AdmissionError;

/// Ordered set of exact `scheme://host[:port]` origins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().map(String::as_str)
    }
}

/// Outcome of checking a request's `Origin` header against an allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginCheck {
    /// No `Origin` header.
    Absent,
    Allowed,
    Denied,
}

/// Classify the request's origin. A header that is not valid UTF-8 can never be listed.
pub fn check_origin(req: &Request<Body>, allowed: &AllowedOrigins) -> OriginCheck {
    match req.headers().get(ORIGIN) {
        None => OriginCheck::Absent,
        Some(value) => match value.to_str() {
            Ok(origin) if allowed.contains(origin) => OriginCheck::Allowed,
            _ => OriginCheck::Denied,
        },
    }
}

/// First admission stage: strict cross-origin policy.
#[derive(Debug)]
pub struct OriginPolicy {
    allowed: AllowedOrigins,
}

impl OriginPolicy {
    pub fn new(allowed: AllowedOrigins) -> Self {
        Self { allowed }
    }
}

impl AdmissionStage for OriginPolicy {
    fn name(&self) -> &'static str {
        "origin_policy"
    }

    fn evaluate(&self, req: &Request<Body>) -> Verdict {
        match check_origin(req, &self.allowed) {
            OriginCheck::Absent | OriginCheck::Allowed => Verdict::Continue,
            OriginCheck::Denied => Verdict::Reject(AdmissionError::CrossOriginDenied),
        }
    }
}
