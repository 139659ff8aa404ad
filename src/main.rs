//! Media Metadata Gateway
//!
//! A lightweight gateway fronting a movie/TV metadata API, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────────┐
//!                       │                       GATEWAY                        │
//!                       │                                                      │
//!   Client Request      │  ┌────────┐   ┌──────────────────────────────────┐   │
//!   ────────────────────┼─▶│  http  │──▶│          admission chain         │   │
//!                       │  │ server │   │ origin → access key → transport  │   │
//!                       │  └────────┘   └────────────────┬─────────────────┘   │
//!                       │                                │ admitted            │
//!                       │                                ▼                     │
//!                       │                        ┌──────────────┐              │
//!                       │                        │   routing    │              │
//!                       │                        │  dispatcher  │              │
//!                       │                        └──────┬───────┘              │
//!                       │                               ▼                      │
//!   Client Response     │  ┌────────┐            ┌──────────────┐              │
//!   ◀───────────────────┼──│ shaped │◀───────────│    media     │◀─────────────┼──── Provider
//!                       │  │  JSON  │            │   handlers   │              │     API
//!                       │  └────────┘            └──────────────┘              │
//!                       │                                                      │
//!                       │  config · observability · lifecycle                  │
//!                       └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use tokio::net::TcpListener;

use media_gateway::config::{self, OriginMode};
use media_gateway::lifecycle::signals::spawn_signal_listener;
use media_gateway::observability::{logging, metrics};
use media_gateway::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Outside production, pick up a local .env file.
    if std::env::var("NODE_ENV").as_deref() != Ok("production") {
        dotenvy::dotenv().ok();
    }

    let config_path = std::env::var_os("GATEWAY_CONFIG").map(PathBuf::from);
    let config = match config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("media-gateway: invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability, config.transport.production);

    tracing::info!("media-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        production = config.transport.production,
        https_required = config.transport.https_required(),
        origin_policy = ?config.cors.effective_mode(),
        allowed_origins = ?config.cors.allowed_origins,
        upstream = %config.upstream.base_url,
        "Configuration loaded"
    );

    if config.cors.mode.is_none() {
        tracing::warn!(
            "No origin policy configured; defaulting to strict. \
             Set ORIGIN_POLICY=strict or ORIGIN_POLICY=allow-all to choose explicitly"
        );
    }
    if config.cors.effective_mode() == OriginMode::Strict && config.cors.allowed_origins.is_empty() {
        tracing::warn!("Strict origin policy with no ALLOWED_ORIGINS: all browser requests will be denied");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    spawn_signal_listener(&shutdown);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
