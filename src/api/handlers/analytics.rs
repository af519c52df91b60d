//! Handler for the most-clicked links listing.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::analytics::{AnalyticsItem, AnalyticsQuery, AnalyticsResponse, DEFAULT_LIMIT};
use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists links ordered by click count.
///
/// # Endpoint
///
/// `GET /analytics?limit=50`
///
/// # Query Parameters
///
/// - `limit` (optional): number of links, 1-100 (default: 50)
///
/// # Errors
///
/// Returns 400 Bad Request if `limit` is out of range or not a number.
pub async fn analytics_handler(
    State(state): State<AppState>,
    params: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        AppError::bad_request(
            "Invalid query parameters",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    params.validate()?;

    let links = state
        .link_service
        .top_links(params.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;

    let items = links
        .into_iter()
        .map(|link| AnalyticsItem {
            short_url: state.link_service.short_url(&link.code),
            stats: StatsResponse::from(link),
        })
        .collect();

    Ok(Json(AnalyticsResponse { items }))
}
