//! Handler for link creation.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::{CreateLinkRequest, LinkResponse};
use crate::api::extract::StrictJson;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/v1/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "expires_at": 1767225600000
/// }
/// ```
///
/// `expires_at` is optional epoch milliseconds; zero or negative values mean
/// the link never expires.
///
/// # Response
///
/// ```json
/// {
///   "code": "aZ3k9Q",
///   "short_url": "http://localhost:8000/aZ3k9Q",
///   "original_url": "https://example.com/some/long/path",
///   "expires_at": 1767225600000
/// }
/// ```
///
/// # Errors
///
/// - 400 with `{"error": ...}` for unreadable bodies (see [`StrictJson`])
/// - 400 with `{"errors": [...]}` when `url` is missing or not an absolute URL
/// - 500 if no unique code could be allocated or the store fails
pub async fn create_link_handler(
    State(state): State<AppState>,
    StrictJson(payload): StrictJson<CreateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let expires_at = payload.expiry()?;
    let url = payload
        .url
        .ok_or_else(|| AppError::bad_request("url must be provided"))?;

    let link = state.link_service.create_link(url, expires_at).await?;

    Ok(Json(link.into()))
}
