//! DTOs for the most-clicked links listing.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::stats::StatsResponse;

/// Default number of links returned.
pub const DEFAULT_LIMIT: i64 = 50;

/// Query parameters for `GET /analytics`.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyticsQuery {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

/// Links ordered by click count, highest first.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub items: Vec<AnalyticsItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsItem {
    pub short_url: String,
    #[serde(flatten)]
    pub stats: StatsResponse,
}
