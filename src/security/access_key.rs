//! Shared-secret authentication.
//!
//! # Responsibilities
//! - Extract the caller's secret from `x-access-key`, falling back to `?ACCESS_KEY=`
//! - Compare it against the configured secret in constant time
//! - Optionally re-validate the `Origin` header against the allow-list

use std::borrow::Cow;

use axum::{body::Body, http::Request};
use subtle::ConstantTimeEq;
use url::form_urlencoded;

use crate::security::admission::{AdmissionStage, Verdict};
use crate::security::error::AdmissionError;
use crate::security::origin::{check_origin, AllowedOrigins, OriginCheck};

/// Request header carrying the shared secret.
pub const ACCESS_KEY_HEADER: &str = "x-access-key";

/// Query parameter consulted when the header is absent.
pub const ACCESS_KEY_PARAM: &str = "ACCESS_KEY";

/// The secret supplied by the caller. A non-empty header wins over the query string,
/// so a wrong header is never rescued by a correct query parameter.
pub fn presented_key(req: &Request<Body>) -> Option<Cow<'_, [u8]>> {
    if let Some(value) = req.headers().get(ACCESS_KEY_HEADER) {
        if !value.is_empty() {
            return Some(Cow::Borrowed(value.as_bytes()));
        }
    }

    let query = req.uri().query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == ACCESS_KEY_PARAM)
        .map(|(_, value)| Cow::Owned(value.into_owned().into_bytes()))
}

/// Second admission stage.
pub struct AccessKeyCheck {
    expected: Vec<u8>,
    origin_recheck: Option<AllowedOrigins>,
}

impl std::fmt::Debug for AccessKeyCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeyCheck")
            .field("expected", &"[REDACTED]")
            .field("origin_recheck", &self.origin_recheck)
            .finish()
    }
}

impl AccessKeyCheck {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into().into_bytes(),
            origin_recheck: None,
        }
    }

    /// Also deny listed-origin violations with [`AdmissionError::OriginNotAllowed`].
    /// An empty list disables the re-check.
    pub fn with_origin_recheck(mut self, allowed: AllowedOrigins) -> Self {
        self.origin_recheck = (!allowed.is_empty()).then_some(allowed);
        self
    }

    fn key_matches(&self, presented: &[u8]) -> bool {
        // Empty on either side never authenticates.
        if presented.is_empty() || self.expected.is_empty() {
            return false;
        }
        bool::from(presented.ct_eq(&self.expected))
    }
}

impl AdmissionStage for AccessKeyCheck {
    fn name(&self) -> &'static str {
        "access_key"
    }

    fn evaluate(&self, req: &Request<Body>) -> Verdict {
        let authenticated = presented_key(req)
            .map(|key| self.key_matches(&key))
            .unwrap_or(false);

        if !authenticated {
            return Verdict::Reject(AdmissionError::InvalidAccessKey);
        }

        if let Some(allowed) = &self.origin_recheck {
            if check_origin(req, allowed) == OriginCheck::Denied {
                return Verdict::Reject(AdmissionError::OriginNotAllowed);
            }
        }

        Verdict::Continue
    }
}
