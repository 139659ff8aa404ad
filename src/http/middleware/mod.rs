//! Axum middleware.

pub mod admission;

pub use admission::{admission_middleware, options_gate};
