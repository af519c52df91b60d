mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use std::sync::Arc;
use tower::ServiceExt;
use shortlink::infrastructure::persistence::InMemoryLinkRepository;
use shortlink::routes::app_router;

fn shorten_request(uri: &str, long_url: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!(r#"{{"longUrl":"{long_url}"}}"#)))
        .unwrap()
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, _rx) = common::create_test_state(repo);
    let app = app_router(state, &["*".to_string()]);

    let response = app
        .clone()
        .oneshot(shorten_request("/shorten/", "https://example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let code = json["shortCode"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{code}/"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com"
    );
}

#[tokio::test]
async fn test_static_routes_take_precedence_over_codes() {
    let app = common::spawn_app();

    app.server.get("/health").await.assert_status_ok();
    app.server.get("/analytics").await.assert_status_ok();
    app.server
        .get("/shorten")
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, _rx) = common::create_test_state(repo);
    let app = app_router(state, &["*".to_string()]);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/shorten")
                .header(header::ORIGIN, "https://app.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_cors_restricted_origins() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, _rx) = common::create_test_state(repo);
    let app = app_router(state, &["https://app.example.com".to_string()]);

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://app.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://app.example.com"
    );

    let denied = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
