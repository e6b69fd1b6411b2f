//! DTOs for the link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;
use crate::error::AppError;

/// Request to create a short link.
///
/// Unknown keys are rejected while the body is parsed.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateLinkRequest {
    /// Destination; must be a syntactically valid absolute URL.
    #[validate(
        required(message = "url must be provided"),
        url(message = "url must be a valid absolute URL")
    )]
    pub url: Option<String>,

    /// Optional expiry as Unix epoch milliseconds. Zero or negative means
    /// the link never expires.
    pub expires_at: Option<i64>,
}

impl CreateLinkRequest {
    /// Converts `expires_at` into an instant, ignoring non-positive values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if the value is outside the range of
    /// representable timestamps.
    pub fn expiry(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        match self.expires_at {
            Some(millis) if millis > 0 => DateTime::from_timestamp_millis(millis)
                .map(Some)
                .ok_or_else(|| {
                    AppError::bad_request("expires_at must be a valid epoch timestamp in milliseconds")
                }),
            _ => Ok(None),
        }
    }
}

/// A link as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkResponse {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    /// Expiry as Unix epoch milliseconds; omitted when the link never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            short_url: link.short_url,
            original_url: link.original_url,
            expires_at: link.expires_at.map(|e| e.timestamp_millis()),
        }
    }
}
