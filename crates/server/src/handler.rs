//! Handlers for the district matcher HTTP API

use crate::protocol::{MatchParams, MatchResponse, ParamsError, Perf};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use district_matcher::{CacheStats, CascadingMatcher, MatcherError, Point};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    matcher: Arc<CascadingMatcher>,
}

impl AppState {
    pub fn new(matcher: Arc<CascadingMatcher>) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &Arc<CascadingMatcher> {
        &self.matcher
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),

    #[error("match task failed: {0}")]
    Task(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Coordinates are the only client input; matcher errors are ours.
            Self::Params(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            other => {
                error!("Match failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

/// `GET /v1/match.json?lat=..&lon=..`
pub async fn match_point(
    State(state): State<AppState>,
    Query(params): Query<MatchParams>,
) -> Result<Json<MatchResponse>, ApiError> {
    let started = Instant::now();
    let (lon, lat) = params.coordinates()?;

    // Cold collections are read from disk; keep that off the async workers.
    let matcher = Arc::clone(&state.matcher);
    let ocdids = tokio::task::spawn_blocking(move || {
        matcher.match_identifiers(&Point::new(lon, lat))
    })
    .await
    .map_err(|e| ApiError::Task(e.to_string()))??;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(MatchResponse {
        ocdids,
        perf: Perf {
            match_time_ms: (elapsed_ms * 1000.0).round() / 1000.0,
        },
    }))
}

/// `GET /v1/stats.json`
pub async fn stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.matcher.cache().stats())
}
