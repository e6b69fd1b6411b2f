//! Handler for link resolution.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::api::dto::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

const MISSING_CODE: &str = "code must be provided";

/// Returns the link stored under `code`.
///
/// # Endpoint
///
/// `GET /api/v1/links/{code}`
///
/// The code is matched exactly; surrounding whitespace is not stripped.
/// Expired links are reported as such but stay stored.
///
/// # Errors
///
/// - 400 `code must be provided` for a blank code
/// - 400 when the path segment cannot be decoded
/// - 400 `link not found for code` for unknown codes
/// - 400 `link has expired` once `expires_at` has passed
/// - 500 on store failures
pub async fn get_link_handler(
    path: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let Path(code) = path.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    if code.trim().is_empty() {
        return Err(AppError::bad_request(MISSING_CODE));
    }

    let link = state.link_service.resolve(&code).await?;

    Ok(Json(link.into()))
}

/// `GET /api/v1/links/` with an empty code segment.
pub async fn missing_code_handler() -> AppError {
    AppError::bad_request(MISSING_CODE)
}
