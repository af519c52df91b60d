//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com/page", "expiresAt": "2030-01-01T00:00:00Z" }
/// ```
///
/// # Response
///
/// `201 Created`, also when an active link for the same normalized URL
/// already exists (its code is returned):
///
/// ```json
/// { "shortUrl": "https://s.example.com/1", "shortCode": "1" }
/// ```
///
/// # Errors
///
/// Returns 400 with `invalid_url`, `invalid_expiry`, or `validation_error`
/// for a malformed body.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let link = state
        .link_service
        .shorten(&payload.long_url, payload.expires_at)
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_url,
            short_code: link.code,
        }),
    ))
}
