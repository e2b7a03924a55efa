//! HTTP transport for the district matcher
//!
//! # Endpoints
//!
//! - `GET /v1/match.json?lat=..&lon=..` - identifiers of every containing district
//! - `GET /v1/stats.json` - collection cache counters

use crate::handler::{self, AppState};
use axum::Router;
use axum::routing::get;
use district_matcher::CascadingMatcher;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// Build the API router around a matcher.
pub fn router(matcher: Arc<CascadingMatcher>) -> Router {
    Router::new()
        .route("/v1/match.json", get(handler::match_point))
        .route("/v1/stats.json", get(handler::stats))
        .with_state(AppState::new(matcher))
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn run_server(
    listener: tokio::net::TcpListener,
    matcher: Arc<CascadingMatcher>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("District matcher listening on {}", listener.local_addr()?);

    axum::serve(listener, router(matcher))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}
