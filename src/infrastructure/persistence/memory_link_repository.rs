//! In-process link repository.
//!
//! Mirrors the PostgreSQL schema's constraints (unique id, code and dedup
//! URL) behind a single mutex, so every operation is atomic with respect to
//! the others. Data does not survive a restart.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Tables {
    links: BTreeMap<i64, Link>,
    codes: HashMap<String, i64>,
    dedup: HashMap<String, i64>,
}

/// Link repository backed by process memory.
#[derive(Debug)]
pub struct InMemoryLinkRepository {
    sequence: AtomicI64,
    tables: Mutex<Tables>,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository whose first identifier is `1`.
    pub fn new() -> Self {
        Self {
            sequence: AtomicI64::new(0),
            tables: Mutex::new(Tables::default()),
        }
    }

    /// Number of stored links, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().map(|t| t.links.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::internal("In-memory store is poisoned", json!({})))
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn next_id(&self) -> Result<i64, AppError> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tables = self.lock()?;

        if tables.links.contains_key(&new_link.id) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_pkey" }),
            ));
        }
        if tables.codes.contains_key(&new_link.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_code_key" }),
            ));
        }
        if tables.dedup.contains_key(&new_link.long_url) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_dedup_url_key" }),
            ));
        }

        let link = Link::new(
            new_link.id,
            new_link.code,
            new_link.long_url,
            0,
            new_link.created_at,
            new_link.expires_at,
        );

        tables.codes.insert(link.code.clone(), link.id);
        tables.dedup.insert(link.long_url.clone(), link.id);
        tables.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.lock()?.links.get(&id).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .dedup
            .get(long_url)
            .and_then(|id| tables.links.get(id))
            .cloned())
    }

    async fn release_long_url(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        let Some(long_url) = tables.links.get(&id).map(|l| l.long_url.clone()) else {
            return Ok(false);
        };

        if tables.dedup.get(&long_url) == Some(&id) {
            tables.dedup.remove(&long_url);
            return Ok(true);
        }

        Ok(false)
    }

    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        match tables.links.get_mut(&id) {
            Some(link) => {
                link.clicks += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let tables = self.lock()?;
        let mut links: Vec<Link> = tables.links.values().cloned().collect();
        // Stable sort keeps ascending id order among equal counts.
        links.sort_by(|a, b| b.clicks.cmp(&a.clicks));
        links.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(links)
    }

    async fn health_check(&self) -> bool {
        self.tables.lock().is_ok()
    }
}
