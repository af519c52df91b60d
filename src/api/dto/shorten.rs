//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to shorten a URL.
///
/// URL syntax and length are checked by the link service so that every bad
/// URL is reported as `invalid_url`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL to shorten (absolute HTTP/HTTPS).
    pub long_url: String,

    /// Optional expiry timestamp (RFC 3339). Must be in the future.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Created (or deduplicated) short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
}
