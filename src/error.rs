//! Application error type and its HTTP representation.
//!
//! Every failure leaves a handler through [`AppError`], which renders one of
//! two JSON envelopes:
//!
//! ```json
//! { "error": "link not found for code" }
//! { "errors": [ { "url": "url must be provided" } ] }
//! ```
//!
//! 5xx responses always carry [`INTERNAL_ERROR_MESSAGE`]; the cause is logged
//! and never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use validator::ValidationErrors;

use crate::domain::repositories::StoreError;

/// Message sent to clients for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

/// A validation failure on a single request field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed, oversized or otherwise unusable input.
    #[error("{0}")]
    BadRequest(String),

    /// One or more fields failed validation.
    #[error("input validation failed")]
    InvalidFields(Vec<FieldError>),

    #[error("link not found for code")]
    NotFound { code: String },

    #[error("link has expired")]
    Expired { code: String },

    #[error("too many requests")]
    RateLimited,

    /// Every candidate code collided. Rare; points to a saturated code space.
    #[error("could not allocate a unique short code after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    #[error("random source failure: {0}")]
    Entropy(#[from] getrandom::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn expired(code: impl Into<String>) -> Self {
        Self::Expired { code: code.into() }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::InvalidFields(_)
            | AppError::NotFound { .. }
            | AppError::Expired { .. } => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::AllocationExhausted { .. } | AppError::Entropy(_) | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body for this error.
    pub fn body(&self) -> Value {
        match self {
            AppError::InvalidFields(fields) => {
                let errors: Vec<Value> = fields
                    .iter()
                    .map(|f| {
                        let mut entry = Map::new();
                        entry.insert(f.field.clone(), Value::String(f.message.clone()));
                        Value::Object(entry)
                    })
                    .collect();
                json!({ "errors": errors })
            }
            e if e.status().is_server_error() => json!({ "error": INTERNAL_ERROR_MESSAGE }),
            e => json!({ "error": e.to_string() }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::AllocationExhausted { attempts } => {
                tracing::error!(
                    attempts = *attempts,
                    "Short code allocation exhausted; code space may be saturated"
                );
            }
            e if status.is_server_error() => tracing::error!(error = %e, "Request failed"),
            e => tracing::debug!(error = %e, status = status.as_u16(), "Request rejected"),
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid input for {field}"));
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();

        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::InvalidFields(fields)
    }
}
