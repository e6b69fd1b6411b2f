//! Top-level router configuration.
//!
//! # Layering (outermost first)
//!
//! - **Tracing** - One span per request, status and latency on completion
//! - **Admission pipeline** - Panic containment, CORS outside production,
//!   then the process-wide rate limit
//! - **API routes** - `/api/v1/links`

use crate::api;
use crate::api::middleware::AdmissionPipeline;
use crate::state::AppState;
use axum::Router;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Constructs the application router with all routes and middleware.
///
/// Tracing sits outside the admission pipeline, so rate-limited and
/// panicking requests are logged with their final status.
pub fn app_router(state: AppState, pipeline: &AdmissionPipeline) -> Router {
    let router = api::routes::link_routes().with_state(state);

    pipeline.apply(router).layer(trace_layer())
}

fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
