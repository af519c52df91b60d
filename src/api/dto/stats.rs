//! DTOs for per-link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// Click statistics for a single short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub short_code: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    /// `active` or `expired`.
    pub status: &'static str,
}

impl From<Link> for StatsResponse {
    fn from(link: Link) -> Self {
        let status = link.status().as_str();
        Self {
            short_code: link.code,
            long_url: link.long_url,
            clicks: link.clicks,
            created_at: link.created_at,
            expires_at: link.expires_at,
            status,
        }
    }
}
