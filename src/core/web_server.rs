//! Small HTTP surface served next to the webhook.
//!
//! `/health` answers liveness probes from the hosting platform. In webhook
//! mode this router is merged into the one teloxide builds for updates, so
//! both share WEB_PORT.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use std::time::Instant;

use crate::navigation::SessionStore;

/// Shared state for the web server.
#[derive(Clone)]
struct WebState {
    sessions: SessionStore,
    started_at: Instant,
}

/// Builds the router with the health endpoint.
pub fn health_router(sessions: SessionStore) -> Router {
    let state = WebState {
        sessions,
        started_at: Instant::now(),
    };

    Router::new().route("/health", get(health_handler)).with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    uptime_secs: u64,
    /// Navigation sessions held in memory
    sessions: usize,
}

/// GET /health: liveness plus a couple of cheap counters.
async fn health_handler(State(state): State<WebState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
        sessions: state.sessions.len(),
    })
}
