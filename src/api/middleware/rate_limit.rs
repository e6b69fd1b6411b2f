//! Rate limiting middleware using token bucket algorithm.
//!
//! A single [`RateLimiter`] is shared by every request the process serves;
//! there is no per-client partitioning.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultDirectRateLimiter, Quota};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::error::AppError;

/// Invalid limiter settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateLimitConfigError {
    #[error("rate must be a finite, non-negative number of requests per second, got {0}")]
    InvalidRate(f64),

    #[error("rate {0} is too high to express as a refill period")]
    RateTooHigh(f64),

    #[error("burst must be at least 1")]
    ZeroBurst,
}

enum Bucket {
    /// Continuous refill at the configured rate (GCRA).
    Refilling(DefaultDirectRateLimiter),
    /// Rate 0: the initial burst is all there will ever be.
    Fixed(AtomicU32),
}

/// Process-wide token bucket.
///
/// Holds at most `burst` tokens and regains them continuously at `rate`
/// tokens per second; there is no fixed window and no explicit reset.
/// [`RateLimiter::try_acquire`] is safe to call concurrently without any
/// locking by the caller.
///
/// # Example
///
/// ```rust,ignore
/// let limiter = Arc::new(RateLimiter::new(2.0, 4)?);
/// let app = Router::new()
///     .route("/api/v1/links", post(create_link_handler))
///     .layer(middleware::from_fn_with_state(limiter, rate_limit::layer));
/// ```
pub struct RateLimiter {
    bucket: Bucket,
    rate: f64,
    burst: u32,
}

impl RateLimiter {
    /// Creates a bucket that starts full.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitConfigError`] for a negative, NaN or infinite rate,
    /// a rate too high to represent, or a zero burst.
    pub fn new(rate: f64, burst: u32) -> Result<Self, RateLimitConfigError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(RateLimitConfigError::InvalidRate(rate));
        }
        let capacity = NonZeroU32::new(burst).ok_or(RateLimitConfigError::ZeroBurst)?;

        let bucket = if rate == 0.0 {
            Bucket::Fixed(AtomicU32::new(burst))
        } else {
            let period = Duration::try_from_secs_f64(1.0 / rate)
                .map_err(|_| RateLimitConfigError::InvalidRate(rate))?;
            let quota = Quota::with_period(period)
                .ok_or(RateLimitConfigError::RateTooHigh(rate))?
                .allow_burst(capacity);

            Bucket::Refilling(governor::RateLimiter::direct(quota))
        };

        Ok(Self {
            bucket,
            rate,
            burst,
        })
    }

    /// Takes one token. Returns false if the bucket is empty.
    pub fn try_acquire(&self) -> bool {
        match &self.bucket {
            Bucket::Refilling(limiter) => limiter.check().is_ok(),
            Bucket::Fixed(tokens) => tokens
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1))
                .is_ok(),
        }
    }

    /// Tokens regained per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Bucket capacity.
    pub fn burst(&self) -> u32 {
        self.burst
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("rate", &self.rate)
            .field("burst", &self.burst)
            .finish_non_exhaustive()
    }
}

/// Admits a request if a token is available.
///
/// Requests arriving while the bucket is empty receive
/// `429 Too Many Requests` with `{"error": "too many requests"}` and never
/// reach the handler.
pub async fn layer(State(limiter): State<Arc<RateLimiter>>, req: Request, next: Next) -> Response {
    if !limiter.try_acquire() {
        metrics::counter!("rate_limited_requests_total").increment(1);
        tracing::debug!(method = %req.method(), uri = %req.uri(), "Rate limit exceeded");
        return AppError::RateLimited.into_response();
    }

    next.run(req).await
}
