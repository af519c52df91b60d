//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - In-process store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Draws the next link identifier.
    ///
    /// Identifiers increase monotonically and are never handed out twice,
    /// even when the subsequent insert fails.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn next_id(&self) -> Result<i64, AppError>;

    /// Inserts a new link and makes it the dedup target for its long URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if:
    /// - The code or identifier already exists
    /// - Another row is already the dedup target for the same long URL
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Finds the dedup target for a normalized long URL.
    ///
    /// The returned link may be expired; callers decide what to do with it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError>;

    /// Stops a link from being the dedup target for its long URL.
    ///
    /// The row itself is kept. Returns `Ok(true)` if the link was released.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn release_long_url(&self, id: i64) -> Result<bool, AppError>;

    /// Atomically increments the click counter of a link.
    ///
    /// Returns `Ok(false)` if the link does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError>;

    /// Lists links ordered by click count, highest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Checks that the backing store is reachable.
    async fn health_check(&self) -> bool;
}
