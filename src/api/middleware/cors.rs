//! Cross-origin headers for non-production deployments.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, PATCH";
const ALLOW_HEADERS: &str = "Accept, Authorization, Content-Type, X-CSRF-Token";

/// Which origin may call the API from a browser.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
}

impl CorsPolicy {
    /// Allows `origin`, e.g. `http://localhost:3001` or `*`.
    ///
    /// # Errors
    ///
    /// Returns an error if `origin` is not a valid header value.
    pub fn new(origin: &str) -> Result<Self, header::InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(origin)?,
        })
    }

    /// Allows every origin.
    pub fn permissive() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
        }
    }

    pub fn allow_origin(&self) -> &HeaderValue {
        &self.allow_origin
    }

    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("false"),
        );
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Adds CORS headers to every response.
///
/// `OPTIONS` requests are answered with `204 No Content` right here and never
/// reach inner stages.
pub async fn layer(State(policy): State<CorsPolicy>, req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    policy.apply(response.headers_mut());
    response
}
