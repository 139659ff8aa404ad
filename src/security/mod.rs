//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (answer preflights, decorate responses)
//!     → admission.rs (run the ordered stages)
//!         → origin.rs (strict origin allow-list)
//!         → access_key.rs (shared secret, optional origin re-check)
//!         → transport.rs (HTTPS redirect in production)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any stage failure
//! - No trust in client input; `x-forwarded-proto` is trusted only because
//!   the gateway is deployed behind a proxy that overwrites it
//! - No mutable state: the chain is built once from config

pub mod access_key;
pub mod admission;
pub mod cors;
pub mod error;
pub mod origin;
pub mod transport;

pub use admission::{AdmissionChain, AdmissionStage, Verdict};
pub use error::AdmissionError;
