//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (assign / propagate request ID)
//!     → middleware/admission.rs (origin, access key, HTTPS)
//!     → server.rs dispatch_handler (routing → media handler)
//!     → response.rs (JSON error bodies)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{json_error, ErrorBody};
pub use server::{AppState, HttpServer, ServerError};
