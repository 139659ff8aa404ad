//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (GATEWAY_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (overlay process environment: PORT, ACCESS_KEY, NODE_ENV, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed by value to the admission chain and server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; request handling never reads the environment
//! - All fields have defaults except the secrets, which must be supplied
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{
    AccessConfig, CorsConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, OriginMode,
    TimeoutConfig, TransportConfig, UpstreamConfig,
};
pub use validation::ValidationError;
