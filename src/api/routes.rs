//! API route configuration.

use crate::api::handlers::{analytics_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes.
///
/// # Endpoints
///
/// - `POST /shorten`        - Create a short URL (deduplicated)
/// - `GET  /{code}/stats`   - Click count and lifetime of a link
/// - `GET  /analytics`      - Most clicked links
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/analytics", get(analytics_handler))
        .route("/{code}/stats", get(stats_handler))
}
