//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (request ID, tracing, CORS, admission, timeout)
//! - Bind server to listener
//! - Dispatch admitted requests to route handlers
//!
//! # Layer order (outermost first)
//! ```text
//! SetRequestId → PropagateRequestId → Trace → OPTIONS gate → CORS → Admission → Timeout → dispatch
//! ```
//!
//! The CORS layer answers every `OPTIONS` request itself, so the gate in front of it
//! runs the admission chain for `OPTIONS` requests that are not real preflights.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    error_handling::HandleErrorLayer,
    extract::State,
    http::{Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    BoxError, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::middleware::{admission_middleware, options_gate};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::json_error;
use crate::lifecycle::ShutdownListener;
use crate::media::{self, HandlerError, QueryParams, UpstreamClient};
use crate::observability::metrics;
use crate::routing::Dispatcher;
use crate::security::cors::cors_layer;
use crate::security::AdmissionChain;

/// Error type for server startup.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to initialise upstream client: {0}")]
    Upstream(#[from] HandlerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub upstream: UpstreamClient,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let chain = Arc::new(AdmissionChain::from_config(&config));
        tracing::info!(stages = ?chain.stage_names(), "Admission chain ready");

        let state = AppState {
            dispatcher: Arc::new(Dispatcher::new()),
            upstream: UpstreamClient::new(&config.upstream)?,
        };

        let router = Self::build_router(&config, state, chain);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState, chain: Arc<AdmissionChain>) -> Router {
        let timeout = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(Duration::from_secs(config.timeouts.request_secs));

        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(timeout)
            .layer(middleware::from_fn_with_state(chain.clone(), admission_middleware))
            .layer(cors_layer(&config.cors))
            .layer(middleware::from_fn_with_state(chain, options_gate))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// A clone of the fully layered router, for in-process serving and tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Turn a request that outlived `timeouts.request_secs` into a JSON error.
async fn handle_timeout(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        json_error(
            StatusCode::REQUEST_TIMEOUT,
            "Request Timeout: the gateway did not finish in time",
        )
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

/// Route dispatcher.
/// Resolves the path prefix and runs the matching handler.
async fn dispatch_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let start_time = Instant::now();
    let resolved = state.dispatcher.resolve(uri.path());
    let route = resolved.route;
    let params = QueryParams::from_uri(&uri);
    let routes = state.dispatcher.prefixes();

    tracing::debug!(
        method = %method,
        path = %uri.path(),
        route = %route,
        "Dispatching request"
    );

    let response = match media::handle(&state.upstream, &method, resolved, &params, &routes).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };

    metrics::record_request(route.as_str(), response.status().as_u16(), start_time);
    response
}
