#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use linkshort::api::middleware::{AdmissionPipeline, CorsPolicy, RateLimiter};
use linkshort::application::services::{LinkAllocator, LinkService};
use linkshort::config::Environment;
use linkshort::domain::entities::NewLink;
use linkshort::domain::repositories::LinkRepository;
use linkshort::infrastructure::persistence::InMemoryLinkRepository;
use linkshort::routes::app_router;
use linkshort::state::AppState;
use std::sync::Arc;

pub const BASE_URL: &str = "http://short.test";

/// Generous enough that no test trips the rate limit by accident.
pub const UNLIMITED_BURST: u32 = 10_000;

pub fn create_test_state(repo: Arc<InMemoryLinkRepository>) -> AppState {
    let repo: Arc<dyn LinkRepository> = repo;
    let allocator = LinkAllocator::with_defaults(repo.clone());
    let link_service = LinkService::new(repo, allocator, BASE_URL);

    AppState::new(Arc::new(link_service))
}

pub fn create_test_app(
    repo: Arc<InMemoryLinkRepository>,
    environment: Environment,
    rate: f64,
    burst: u32,
) -> Router {
    let limiter = Arc::new(RateLimiter::new(rate, burst).unwrap());
    let pipeline =
        AdmissionPipeline::for_environment(environment, limiter, CorsPolicy::permissive());

    app_router(create_test_state(repo), &pipeline)
}

/// Full application over an empty in-memory store, without a practical rate limit.
pub fn create_test_server() -> (TestServer, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let app = create_test_app(
        repo.clone(),
        Environment::Development,
        0.0,
        UNLIMITED_BURST,
    );

    (TestServer::new(app).unwrap(), repo)
}

pub async fn insert_link(
    repo: &InMemoryLinkRepository,
    code: &str,
    url: &str,
    expires_at: Option<DateTime<Utc>>,
) {
    repo.create(NewLink {
        code: code.to_string(),
        short_url: format!("{BASE_URL}/{code}"),
        original_url: url.to_string(),
        expires_at,
    })
    .await
    .unwrap();
}
