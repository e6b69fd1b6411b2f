//! API route configuration.

use crate::api::extract::MAX_BODY_BYTES;
use crate::api::handlers::{create_link_handler, get_link_handler, missing_code_handler};
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Link API routes.
///
/// # Endpoints
///
/// - `POST /api/v1/links`        - Create a short link
/// - `GET  /api/v1/links/{code}` - Resolve a short code
/// - `GET  /api/v1/links/`       - Always `400 code must be provided`
///
/// Request bodies above [`MAX_BODY_BYTES`] are refused while being read.
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/links", post(create_link_handler))
        .route("/api/v1/links/", get(missing_code_handler))
        .route("/api/v1/links/{code}", get(get_link_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
