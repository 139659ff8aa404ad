//! Media Metadata Gateway Library
//!
//! An HTTP gateway in front of a movie/TV metadata provider. Every request
//! passes an admission chain (origin policy, shared secret, HTTPS
//! enforcement) before a path-prefix dispatcher hands it to a thin
//! upstream-calling handler.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod media;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
