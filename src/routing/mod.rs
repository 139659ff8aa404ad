//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Admitted request path
//!     → router.rs (table lookup, first match wins)
//!     → matcher.rs (segment-aware prefix match)
//!     → Return: Route + path remainder (Home when nothing matches)
//! ```
//!
//! # Design Decisions
//! - Table fixed at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use router::{Dispatcher, Resolved, Route};
