//! HTTP server for tour-route
//!
//! Exposes route builder sessions, search, reverse geocoding, and stateless
//! route derivation as a REST API.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::directions::mapbox::MapboxDirections;
use crate::error::{Error, Result};
use crate::geo::mapbox::MapboxGeocoder;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the HTTP server on the configured address
pub async fn run(config: Config) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config).await
}

/// Start the HTTP server on a specific address, backed by Mapbox
pub async fn run_on(addr: &str, config: Config) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let geocoder = MapboxGeocoder::from_config(&config)?;
    let directions = MapboxDirections::from_config(&config)?;
    let state = Arc::new(AppState::new(config, geocoder, directions));
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
