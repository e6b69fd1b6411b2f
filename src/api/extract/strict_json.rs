//! JSON body extractor with strict shape checks.

use axum::{
    body::Bytes,
    extract::{
        FromRequest, Request,
        rejection::{BytesRejection, FailedToBufferBody},
    },
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::AppError;

/// Largest accepted request body. Enforced by
/// [`axum::extract::DefaultBodyLimit`] on the API router.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Like [`axum::Json`], but stricter and with client-readable errors.
///
/// - the body must hold exactly one JSON value
/// - the `Content-Type` header is not required
/// - every failure becomes an [`AppError::BadRequest`] whose message names the
///   problem (empty, malformed, wrong type for a field, unknown key, too large,
///   trailing data)
///
/// Rejecting unknown keys is up to the target type
/// (`#[serde(deny_unknown_fields)]`).
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJson<T>(pub T);

impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
                    AppError::bad_request(format!(
                        "body must not be larger than {MAX_BODY_BYTES} bytes"
                    ))
                }
                other => AppError::bad_request(format!(
                    "failed to read request body: {}",
                    other.body_text()
                )),
            })?;

        parse_strict(&bytes).map(StrictJson)
    }
}

/// Deserializes exactly one JSON value of type `T` from `bytes`.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] describing why the body was rejected.
pub fn parse_strict<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::bad_request("body must not be empty"));
    }

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value: T = serde_path_to_error::deserialize(&mut de).map_err(describe)?;

    de.end()
        .map_err(|_| AppError::bad_request("body must only contain a single JSON value"))?;

    Ok(value)
}

fn describe(err: serde_path_to_error::Error<serde_json::Error>) -> AppError {
    let path = err.path().to_string();
    let inner = err.into_inner();

    let message = match inner.classify() {
        Category::Eof => "body contains badly-formed JSON".to_string(),
        Category::Syntax | Category::Io => format!(
            "body contains badly-formed JSON (at line {}, column {})",
            inner.line(),
            inner.column()
        ),
        Category::Data => {
            let text = inner.to_string();

            if let Some(key) = unknown_field(&text) {
                format!("body contains unknown key \"{key}\"")
            } else if let Some(key) = duplicate_field(&text) {
                format!("body contains duplicate key \"{key}\"")
            } else if path != "." {
                format!("body contains incorrect JSON type for field \"{path}\"")
            } else {
                format!(
                    "body contains incorrect JSON type (at line {}, column {})",
                    inner.line(),
                    inner.column()
                )
            }
        }
    };

    AppError::BadRequest(message)
}

/// Extracts `name` from serde's "unknown field `name`, expected ..." message.
fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split('`').next()
}

/// Extracts `name` from serde's "duplicate field `name`" message.
fn duplicate_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("duplicate field `")?;
    rest.split('`').next()
}
