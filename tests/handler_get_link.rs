mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use linkshort::domain::repositories::LinkRepository;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_get_link_success() {
    let (server, repo) = common::create_test_server();
    common::insert_link(&repo, "abc123", "https://example.com", None).await;

    let response = server.get("/api/v1/links/abc123").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "code": "abc123",
            "short_url": "http://short.test/abc123",
            "original_url": "https://example.com"
        })
    );
}

#[tokio::test]
async fn test_get_link_not_found() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/v1/links/doesnotexist").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "link not found for code" })
    );
}

#[tokio::test]
async fn test_get_link_foreign_symbols_not_found() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/v1/links/abc-12").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "link not found for code");
}

#[tokio::test]
async fn test_get_link_blank_code() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/v1/links/%20%20").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "code must be provided");
}

#[tokio::test]
async fn test_get_link_empty_code_segment() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/v1/links/").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "code must be provided" })
    );
}

#[tokio::test]
async fn test_get_link_undecodable_code() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/v1/links/%FF%FE").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert!(json["error"].as_str().unwrap().contains("UTF-8"));
}

#[tokio::test]
async fn test_get_link_code_is_matched_exactly() {
    let (server, repo) = common::create_test_server();
    common::insert_link(&repo, "abc123", "https://example.com", None).await;

    let response = server.get("/api/v1/links/%20abc123%20").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "link not found for code");

    server
        .get("/api/v1/links/ABC123")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_link_expired() {
    let (server, repo) = common::create_test_server();
    let past = Utc::now() - Duration::hours(1);
    common::insert_link(&repo, "old123", "https://example.com", Some(past)).await;

    let response = server.get("/api/v1/links/old123").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "link has expired" }));

    // Expired links are reported, never removed.
    assert!(repo.exists("old123").await.unwrap());
}

#[tokio::test]
async fn test_get_link_with_future_expiry() {
    let (server, repo) = common::create_test_server();
    let future = Utc::now() + Duration::hours(1);
    common::insert_link(&repo, "new123", "https://example.com", Some(future)).await;

    let response = server.get("/api/v1/links/new123").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["expires_at"],
        future.timestamp_millis()
    );
}

#[tokio::test]
async fn test_get_link_is_idempotent() {
    let (server, repo) = common::create_test_server();
    common::insert_link(&repo, "same12", "https://example.com", None).await;

    let first = server.get("/api/v1/links/same12").await.json::<Value>();
    let second = server.get("/api/v1/links/same12").await.json::<Value>();

    assert_eq!(first, second);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_concurrent_creates_get_unique_codes() {
    let repo = Arc::new(linkshort::infrastructure::persistence::InMemoryLinkRepository::new());
    let state = common::create_test_state(repo.clone());

    let handles: Vec<_> = (0..200)
        .map(|i| {
            let service = state.link_service.clone();
            tokio::spawn(async move {
                service
                    .create_link(format!("https://example.com/{i}"), None)
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut codes = HashSet::new();
    for handle in handles {
        let link = handle.await.unwrap();
        assert!(codes.insert(link.code.clone()), "duplicate code {}", link.code);

        let resolved = state.link_service.resolve(&link.code).await.unwrap();
        assert_eq!(resolved.original_url, link.original_url);
    }

    assert_eq!(codes.len(), 200);
    assert_eq!(repo.len(), 200);
}
