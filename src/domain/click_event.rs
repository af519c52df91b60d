//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

/// An in-memory representation of a click for async processing.
///
/// Passed from the redirect handler to the background worker via a bounded
/// channel, so the redirect response never waits on the counter update.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler once the link is known to be active
/// 2. Sent to the channel with `try_send` (never awaited)
/// 3. Applied by [`crate::domain::click_worker::run_click_worker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub code: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    pub fn new(link_id: i64, code: String) -> Self {
        Self {
            link_id,
            code,
            clicked_at: Utc::now(),
        }
    }
}
