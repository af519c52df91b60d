//! Link creation, resolution and statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, LinkStatus, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{ShortCodeCodec, is_reserved};
use crate::utils::url_normalizer::normalize_url;

/// Upper bound on identifiers drawn for a single link.
///
/// Only identifiers that encode to a reserved code are skipped, and those are
/// far apart, so one extra draw is the realistic maximum.
const MAX_ID_DRAWS: usize = 4;

/// Service for creating and resolving shortened links.
///
/// Handles URL normalization, expiry validation, deduplication and code
/// derivation. Codes come from the row identifier, so there is no
/// collision-retry loop; the only retry is the single re-read after losing a
/// dedup race on insert.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    codec: ShortCodeCodec,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the prefix of every returned short URL.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        codec: ShortCodeCodec,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            codec,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Repository shared with the click worker.
    pub fn repository(&self) -> Arc<dyn LinkRepository> {
        self.link_repository.clone()
    }

    pub fn codec(&self) -> ShortCodeCodec {
        self.codec
    }

    /// Creates a short link, or returns the active link for the same URL.
    ///
    /// # Deduplication
    ///
    /// The URL is normalized first. If an active link already exists for the
    /// normalized URL it is returned unchanged (a requested expiry does not
    /// modify it). An expired match is released so a fresh link can take its
    /// place; the expired row itself is kept.
    ///
    /// # Concurrency
    ///
    /// When a concurrent request inserts the same URL first, the insert fails
    /// with a conflict and the winner's row is read back exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL is not absolute http(s).
    /// Returns [`AppError::InvalidExpiry`] if `expires_at` is not in the future.
    /// Returns [`AppError::Internal`] if reconciliation fails or on storage errors.
    pub async fn shorten(
        &self,
        long_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        let normalized_url = normalize_url(long_url)?;
        let created_at = Utc::now();

        if let Some(expires_at) = expires_at
            && expires_at <= created_at
        {
            return Err(AppError::invalid_expiry(
                "Expiry must be later than the creation time",
                json!({ "expires_at": expires_at, "created_at": created_at }),
            ));
        }

        if let Some(existing) = self
            .link_repository
            .find_by_long_url(&normalized_url)
            .await?
        {
            if existing.status_at(created_at) == LinkStatus::Active {
                debug!(code = %existing.code, "Returning existing link for {}", normalized_url);
                return Ok(existing);
            }

            debug!(code = %existing.code, "Releasing expired link for {}", normalized_url);
            self.link_repository.release_long_url(existing.id).await?;
        }

        let (id, code) = self.draw_code().await?;

        let new_link = NewLink {
            id,
            code,
            long_url: normalized_url.clone(),
            created_at,
            expires_at,
        };

        match self.link_repository.create(new_link).await {
            Ok(link) => {
                info!(code = %link.code, id = link.id, "Created short link");
                Ok(link)
            }
            Err(AppError::Conflict { details, .. }) => {
                debug!(?details, "Insert conflict, reading winning row");
                self.reconcile(&normalized_url).await
            }
            Err(e) => Err(e),
        }
    }

    /// Resolves a short code to an active link for redirection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkUnavailable`] if the code is malformed, unknown,
    /// or the link has expired.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let link = self.find_by_code(code).await?;

        if link.is_expired() {
            return Err(AppError::link_unavailable(
                "Short link has expired",
                json!({ "code": code }),
            ));
        }

        Ok(link)
    }

    /// Returns a link regardless of expiry, for statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkUnavailable`] if the code is malformed or unknown.
    pub async fn stats(&self, code: &str) -> Result<Link, AppError> {
        self.find_by_code(code).await
    }

    /// Lists the most clicked links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn top_links(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.top_by_clicks(limit).await
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    pub async fn health_check(&self) -> bool {
        self.link_repository.health_check().await
    }

    /// Looks up a link by code.
    ///
    /// The code is decoded into the identifier, and the stored code must match
    /// exactly, so `"01"` does not alias `"1"`.
    async fn find_by_code(&self, code: &str) -> Result<Link, AppError> {
        let not_found =
            || AppError::link_unavailable("Short link not found", json!({ "code": code }));

        let id = match self.codec.decode(code) {
            Ok(id) => i64::try_from(id).map_err(|_| not_found())?,
            Err(e) => {
                debug!("Rejected short code {:?}: {}", code, e);
                return Err(not_found());
            }
        };

        match self.link_repository.find_by_id(id).await? {
            Some(link) if link.code == code => Ok(link),
            _ => Err(not_found()),
        }
    }

    /// Draws identifiers until one encodes to a non-reserved code.
    async fn draw_code(&self) -> Result<(i64, String), AppError> {
        for _ in 0..MAX_ID_DRAWS {
            let id = self.link_repository.next_id().await?;
            let unsigned = u64::try_from(id).map_err(|_| {
                AppError::internal("Store returned a negative identifier", json!({ "id": id }))
            })?;

            let code = self.codec.encode(unsigned);
            if !is_reserved(&code) {
                return Ok((id, code));
            }

            debug!(id, code = %code, "Skipping identifier with reserved code");
        }

        Err(AppError::internal(
            "Failed to derive short code",
            json!({ "reason": "Too many reserved codes" }),
        ))
    }

    /// Reads the row that won a concurrent insert for the same URL.
    async fn reconcile(&self, normalized_url: &str) -> Result<Link, AppError> {
        match self.link_repository.find_by_long_url(normalized_url).await? {
            Some(winner) if !winner.is_expired() => Ok(winner),
            _ => {
                warn!("Could not reconcile insert conflict for {}", normalized_url);
                Err(AppError::internal(
                    "Failed to create short link",
                    json!({ "reason": "Concurrent insert could not be reconciled" }),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;

    const BASE_URL: &str = "https://s.example.com";

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), 0, Utc::now(), None)
    }

    fn create_expired_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(
            id,
            code.to_string(),
            url.to_string(),
            3,
            Utc::now() - Duration::hours(2),
            Some(Utc::now() - Duration::hours(1)),
        )
    }

    fn service(mock_repo: MockLinkRepository) -> LinkService {
        LinkService::new(Arc::new(mock_repo), ShortCodeCodec::default(), BASE_URL)
    }

    fn echo_create(mock_repo: &mut MockLinkRepository) {
        mock_repo.expect_create().times(1).returning(|new_link| {
            Ok(Link::new(
                new_link.id,
                new_link.code,
                new_link.long_url,
                0,
                new_link.created_at,
                new_link.expires_at,
            ))
        });
    }

    #[tokio::test]
    async fn test_shorten_derives_code_from_id() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_next_id().times(1).returning(|| Ok(125));
        echo_create(&mut mock_repo);

        let link = service(mock_repo)
            .shorten("https://example.com/a", None)
            .await
            .unwrap();

        assert_eq!(link.id, 125);
        assert_eq!(link.code, "21");
        assert_eq!(link.long_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_shorten_normalizes_url() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_long_url()
            .withf(|url| url == "http://example.com/path")
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_next_id().times(1).returning(|| Ok(1));
        mock_repo
            .expect_create()
            .withf(|new_link| new_link.long_url == "http://example.com/path")
            .times(1)
            .returning(|n| Ok(Link::new(n.id, n.code, n.long_url, 0, n.created_at, None)));

        let result = service(mock_repo)
            .shorten("HTTP://Example.COM:80/path/", None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_deduplication() {
        let mut mock_repo = MockLinkRepository::new();
        let existing_link = create_test_link(5, "5", "https://example.com/a");
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(move |_| Ok(Some(existing_link.clone())));
        mock_repo.expect_next_id().times(0);
        mock_repo.expect_create().times(0);

        let link = service(mock_repo)
            .shorten("https://example.com/a", None)
            .await
            .unwrap();

        assert_eq!(link.id, 5);
        assert_eq!(link.code, "5");
    }

    #[tokio::test]
    async fn test_shorten_replaces_expired_match() {
        let mut mock_repo = MockLinkRepository::new();
        let expired = create_expired_link(5, "5", "https://example.com/a");
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(move |_| Ok(Some(expired.clone())));
        mock_repo
            .expect_release_long_url()
            .withf(|id| *id == 5)
            .times(1)
            .returning(|_| Ok(true));
        mock_repo.expect_next_id().times(1).returning(|| Ok(6));
        echo_create(&mut mock_repo);

        let link = service(mock_repo)
            .shorten("https://example.com/a", None)
            .await
            .unwrap();

        assert_eq!(link.id, 6);
        assert_eq!(link.code, "6");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mock_repo = MockLinkRepository::new();

        let result = service(mock_repo).shorten("not-a-url", None).await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_shorten_unsupported_scheme() {
        let mock_repo = MockLinkRepository::new();

        let result = service(mock_repo)
            .shorten("ftp://example.com/file", None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_shorten_rejects_past_expiry() {
        let mock_repo = MockLinkRepository::new();

        let result = service(mock_repo)
            .shorten(
                "https://example.com",
                Some(Utc::now() - Duration::minutes(1)),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidExpiry { .. }));
    }

    #[tokio::test]
    async fn test_shorten_accepts_future_expiry() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_next_id().times(1).returning(|| Ok(1));
        echo_create(&mut mock_repo);

        let expires_at = Utc::now() + Duration::days(1);
        let link = service(mock_repo)
            .shorten("https://example.com", Some(expires_at))
            .await
            .unwrap();

        assert_eq!(link.expires_at, Some(expires_at));
        assert!(link.expires_at.unwrap() > link.created_at);
    }

    #[tokio::test]
    async fn test_shorten_skips_reserved_codes() {
        let reserved_id = crate::utils::base62::decode("health").unwrap() as i64;

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));
        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_next_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(reserved_id));
        mock_repo
            .expect_next_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(reserved_id + 1));
        echo_create(&mut mock_repo);

        let link = service(mock_repo)
            .shorten("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.id, reserved_id + 1);
        assert_ne!(link.code, "health");
    }

    #[tokio::test]
    async fn test_shorten_conflict_reads_winner_once() {
        let mut mock_repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock_repo.expect_next_id().times(1).returning(|| Ok(8));
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));
        let winner = create_test_link(7, "7", "https://example.com/a");
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));

        let link = service(mock_repo)
            .shorten("https://example.com/a", None)
            .await
            .unwrap();

        assert_eq!(link.id, 7);
        assert_eq!(link.code, "7");
    }

    #[tokio::test]
    async fn test_shorten_conflict_without_winner_fails() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_long_url()
            .times(2)
            .returning(|_| Ok(None));
        mock_repo.expect_next_id().times(1).returning(|| Ok(8));
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        let result = service(mock_repo)
            .shorten("https://example.com/a", None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_resolve_active_link() {
        let mut mock_repo = MockLinkRepository::new();
        let link = create_test_link(62, "10", "https://example.com/target");
        mock_repo
            .expect_find_by_id()
            .withf(|id| *id == 62)
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let link = service(mock_repo).resolve("10").await.unwrap();

        assert_eq!(link.long_url, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_expired_link() {
        let mut mock_repo = MockLinkRepository::new();
        let link = create_expired_link(1, "1", "https://example.com");
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let result = service(mock_repo).resolve("1").await;

        assert!(matches!(result.unwrap_err(), AppError::LinkUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_repo).resolve("zz").await;

        assert!(matches!(result.unwrap_err(), AppError::LinkUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_storage() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_id().times(0);

        let result = service(mock_repo).resolve("bad-code!").await;

        assert!(matches!(result.unwrap_err(), AppError::LinkUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_resolve_non_canonical_code() {
        let mut mock_repo = MockLinkRepository::new();
        let link = create_test_link(1, "1", "https://example.com");
        mock_repo
            .expect_find_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let result = service(mock_repo).resolve("01").await;

        assert!(matches!(result.unwrap_err(), AppError::LinkUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_stats_returns_expired_link() {
        let mut mock_repo = MockLinkRepository::new();
        let link = create_expired_link(1, "1", "https://example.com");
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let link = service(mock_repo).stats("1").await.unwrap();

        assert_eq!(link.clicks, 3);
        assert_eq!(link.status(), LinkStatus::Expired);
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            ShortCodeCodec::default(),
            "https://s.example.com/",
        );

        assert_eq!(service.short_url("abc"), "https://s.example.com/abc");
    }
}
