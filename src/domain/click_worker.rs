//! Background worker applying click increments.
//!
//! Consumes [`ClickEvent`]s from the redirect handler and increments the
//! stored counter. Failures are logged and dropped: a click is analytics, and
//! losing one must never affect a redirect that has already been answered.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Tuning knobs for [`run_click_worker`].
#[derive(Debug, Clone, Copy)]
pub struct ClickWorkerSettings {
    /// Maximum number of increments in flight at once.
    pub concurrency: usize,
    /// Extra attempts after a failed increment (0 = single attempt).
    pub retry_attempts: usize,
}

impl Default for ClickWorkerSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            retry_attempts: 2,
        }
    }
}

/// Runs until the sending side of the channel is closed and every in-flight
/// increment has finished.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn LinkRepository>,
    settings: ClickWorkerSettings,
) {
    let concurrency = settings.concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        tokio::spawn(async move {
            record_click(repository.as_ref(), &event, settings.retry_attempts).await;
            drop(repository);
            drop(permit);
        });
    }

    // Wait for in-flight increments before reporting shutdown.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

/// Applies a single click with bounded retries. Never returns an error.
pub async fn record_click(repository: &dyn LinkRepository, event: &ClickEvent, retry_attempts: usize) {
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(10)
        .max_delay(Duration::from_millis(200))
        .map(jitter)
        .take(retry_attempts);

    let result = Retry::spawn(strategy, || repository.increment_clicks(event.link_id)).await;

    match result {
        Ok(true) => debug!(link_id = event.link_id, code = %event.code, "Click recorded"),
        Ok(false) => debug!(
            link_id = event.link_id,
            code = %event.code,
            "Click dropped: link no longer exists"
        ),
        Err(e) => warn!(
            link_id = event.link_id,
            code = %event.code,
            "Failed to record click: {}",
            e
        ),
    }
}
