//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// Lookup-time state of a stored link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Active,
    Expired,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

/// A shortened URL with its click counter.
///
/// `code` is derived from `id` and never changes. Expiry is a read-time
/// filter: expired rows stay in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        clicks: i64,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            clicks,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the link has passed its expiry time at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> LinkStatus {
        if self.is_expired_at(now) {
            LinkStatus::Expired
        } else {
            LinkStatus::Active
        }
    }

    pub fn status(&self) -> LinkStatus {
        self.status_at(Utc::now())
    }
}

/// Input data for inserting a link.
///
/// The identifier is drawn from the store beforehand so that the code can be
/// derived before the row is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(expires_at: Option<DateTime<Utc>>) -> Link {
        Link::new(
            1,
            "1".to_string(),
            "https://example.com".to_string(),
            0,
            Utc::now(),
            expires_at,
        )
    }

    #[test]
    fn test_link_without_expiry_is_active() {
        let link = link(None);
        assert!(!link.is_expired());
        assert_eq!(link.status(), LinkStatus::Active);
    }

    #[test]
    fn test_link_with_future_expiry_is_active() {
        let link = link(Some(Utc::now() + Duration::hours(1)));
        assert_eq!(link.status(), LinkStatus::Active);
    }

    #[test]
    fn test_link_is_expired() {
        let link = link(Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());
        assert_eq!(link.status(), LinkStatus::Expired);
    }

    #[test]
    fn test_expiry_boundary_counts_as_expired() {
        let at = Utc::now();
        let link = link(Some(at));
        assert!(link.is_expired_at(at));
        assert!(!link.is_expired_at(at - Duration::milliseconds(1)));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(LinkStatus::Active.as_str(), "active");
        assert_eq!(LinkStatus::Expired.as_str(), "expired");
    }
}
