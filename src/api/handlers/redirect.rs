//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Decode the code and load the link
/// 2. Reject unknown or expired links with 404
/// 3. Queue a click event without waiting
/// 4. Return 302 Found with `Location`
///
/// # Click Tracking
///
/// Click events are sent to a bounded channel for async processing.
/// If the queue is full or closed, the click is dropped (fire-and-forget).
///
/// # Errors
///
/// Returns 404 Not Found (`link_unavailable`) if the short code is malformed,
/// unknown, or expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&code).await?;

    match state
        .click_sender
        .try_send(ClickEvent::new(link.id, link.code))
    {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            debug!(code = %event.code, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(event)) => {
            debug!(code = %event.code, "Click queue closed, dropping click");
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, link.long_url)]))
}
