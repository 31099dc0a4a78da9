//! # Read-only sales data API
//!
//! The minimal HTTP surface over an already-loaded bundle: the full bundle,
//! per-quarter deal slices, and a liveness probe. The bundle is immutable for
//! the lifetime of the process; there is no write path and nothing to
//! invalidate.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use core_types::SalesDataBundle;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    /// The immutable bundle loaded once at startup.
    pub bundle: SalesDataBundle,
    /// Which adapter produced the bundle; surfaced by the health probe.
    pub source_name: &'static str,
    /// Quarter ids outside this year are rejected with 400.
    pub modeled_year: u16,
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    tracing::info!("Sales data API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the application router; separate from [`run_server`] so tests can
/// exercise it without binding a socket.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/sales-data", get(handlers::get_sales_data))
        .route(
            "/api/quarter-deals/:quarter",
            get(handlers::get_quarter_deals),
        )
        .route("/api/health", get(handlers::health))
        .with_state(Arc::new(state))
        .layer(cors)
        // This middleware logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
}
