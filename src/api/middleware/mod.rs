//! Admission pipeline: middleware applied to every request before the
//! handlers run.
//!
//! - [`catch_panic`] - Converts handler panics into a `500`
//! - [`cors`] - Cross-origin headers (non-production only)
//! - [`rate_limit`] - Process-wide token bucket
//! - [`pipeline`] - Declarative composition of the stages above

pub mod catch_panic;
pub mod cors;
pub mod pipeline;
pub mod rate_limit;

pub use cors::CorsPolicy;
pub use pipeline::{AdmissionPipeline, Stage};
pub use rate_limit::RateLimiter;
