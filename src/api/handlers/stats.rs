//! Handler for per-link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click count and lifetime data for a short link.
///
/// # Endpoint
///
/// `GET /{code}/stats`
///
/// Expired links are still reported, with `"status": "expired"`.
///
/// # Errors
///
/// Returns 404 Not Found if the short code is malformed or unknown.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let link = state.link_service.stats(&code).await?;

    Ok(Json(StatsResponse::from(link)))
}
