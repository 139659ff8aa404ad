//! Admission chain.
//!
//! Every inbound request passes an ordered list of stages before it reaches
//! the route dispatcher:
//!
//! ```text
//! OriginPolicy (strict mode only)
//!     → AccessKeyCheck (+ optional origin re-check)
//!     → TransportEnforcement (when HTTPS is required)
//!     → dispatch
//! ```
//!
//! A stage either lets the request continue or rejects it; the first
//! rejection is final. Stages are pure functions of (request, configuration)
//! and the chain is frozen at startup, so it is shared across requests
//! without locks.

use axum::{body::Body, http::Request};

use crate::config::{GatewayConfig, OriginMode};
use crate::security::access_key::AccessKeyCheck;
use crate::security::error::AdmissionError;
use crate::security::origin::{AllowedOrigins, OriginPolicy};
use crate::security::transport::TransportEnforcement;

/// Result of a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Reject(AdmissionError),
}

/// A single gate in the admission chain.
pub trait AdmissionStage: Send + Sync + std::fmt::Debug {
    /// Stage identifier for logging.
    fn name(&self) -> &'static str;

    fn evaluate(&self, req: &Request<Body>) -> Verdict;
}

/// Ordered, immutable list of admission stages.
#[derive(Debug, Default)]
pub struct AdmissionChain {
    stages: Vec<Box<dyn AdmissionStage>>,
}

impl AdmissionChain {
    pub fn new(stages: Vec<Box<dyn AdmissionStage>>) -> Self {
        Self { stages }
    }

    /// Build the chain for a validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let allowed = AllowedOrigins::new(config.cors.allowed_origins.iter().cloned());
        let mut stages: Vec<Box<dyn AdmissionStage>> = Vec::with_capacity(3);

        if config.cors.effective_mode() == OriginMode::Strict {
            stages.push(Box::new(OriginPolicy::new(allowed.clone())));
        }

        let mut access = AccessKeyCheck::new(config.access.access_key.clone());
        if config.access.verify_origin {
            access = access.with_origin_recheck(allowed);
        }
        stages.push(Box::new(access));

        if config.transport.https_required() {
            stages.push(Box::new(TransportEnforcement));
        }

        Self::new(stages)
    }

    /// Stage names in evaluation order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the stages in order, stopping at the first rejection.
    pub fn evaluate(&self, req: &Request<Body>) -> Verdict {
        for stage in &self.stages {
            if let Verdict::Reject(err) = stage.evaluate(req) {
                tracing::debug!(stage = stage.name(), reason = err.reason(), "Admission stage rejected request");
                return Verdict::Reject(err);
            }
        }
        Verdict::Continue
    }
}
