//! Media metadata handlers.
//!
//! # Data Flow
//! ```text
//! Admitted request + resolved Route
//!     → handlers.rs (method filter, input validation)
//!     → client.rs (one GET against the provider)
//!     → types.rs (shape upstream JSON)
//!     → JSON response, or error.rs (JSON error body)
//! ```

pub mod client;
pub mod error;
pub mod handlers;
pub mod types;

pub use client::UpstreamClient;
pub use error::HandlerError;
pub use handlers::{handle, QueryParams};
