#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use shortlink::application::services::LinkService;
use shortlink::domain::click_event::ClickEvent;
use shortlink::domain::entities::{Link, NewLink};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::InMemoryLinkRepository;
use shortlink::routes;
use shortlink::state::AppState;
use shortlink::utils::code_generator::ShortCodeCodec;

pub const BASE_URL: &str = "https://sho.rt";

pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryLinkRepository>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_state_with(
    repo: Arc<dyn LinkRepository>,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let link_service = Arc::new(LinkService::new(repo, ShortCodeCodec::default(), BASE_URL));

    (AppState::new(link_service, tx), rx)
}

pub fn create_test_state(
    repo: Arc<InMemoryLinkRepository>,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_test_state_with(repo, 100)
}

pub fn make_server(state: AppState) -> TestServer {
    let app = routes::router(state, &["*".to_string()]);
    TestServer::new(app).unwrap()
}

pub fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, clicks) = create_test_state(repo.clone());

    TestApp {
        server: make_server(state),
        repo,
        clicks,
    }
}

/// Inserts a link the same way the service does, with explicit timestamps.
pub async fn insert_link(
    repo: &InMemoryLinkRepository,
    long_url: &str,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
) -> Link {
    let id = repo.next_id().await.unwrap();
    repo.create(NewLink {
        id,
        code: ShortCodeCodec::default().encode(id as u64),
        long_url: long_url.to_string(),
        created_at,
        expires_at,
    })
    .await
    .unwrap()
}

pub async fn insert_expired_link(repo: &InMemoryLinkRepository, long_url: &str) -> Link {
    let now = Utc::now();
    insert_link(
        repo,
        long_url,
        now - Duration::hours(2),
        Some(now - Duration::hours(1)),
    )
    .await
}
