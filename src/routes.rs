//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`        - Short link redirect
//! - `GET  /{code}/stats`  - Link statistics
//! - `POST /shorten`       - Create a short link
//! - `GET  /analytics`     - Most clicked links
//! - `GET  /health`        - Health check: storage, click queue
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configured allowed origins
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware, without path normalization.
///
/// Static segments (`/shorten`, `/health`, `/analytics`) take precedence over
/// `/{code}`; the code generator never hands out those words.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::link_routes())
        .with_state(state)
        .layer(cors::layer(allowed_origins))
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before routing.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `allowed_origins` - origins allowed by CORS; `*` allows any
pub fn app_router(state: AppState, allowed_origins: &[String]) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, allowed_origins))
}
