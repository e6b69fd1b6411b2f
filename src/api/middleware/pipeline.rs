//! Declarative composition of the admission stages.

use axum::{Router, middleware};
use std::sync::Arc;

use crate::api::middleware::{CorsPolicy, RateLimiter, catch_panic, cors, rate_limit};
use crate::config::Environment;

/// One request-wrapping stage.
#[derive(Debug, Clone)]
pub enum Stage {
    CatchPanic,
    Cors(CorsPolicy),
    RateLimit(Arc<RateLimiter>),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::CatchPanic => "catch_panic",
            Stage::Cors(_) => "cors",
            Stage::RateLimit(_) => "rate_limit",
        }
    }
}

/// Ordered list of stages, outermost first.
///
/// The list is chosen once at startup and then applied to the router; route
/// registration never branches on the environment.
#[derive(Debug, Clone)]
pub struct AdmissionPipeline {
    stages: Vec<Stage>,
}

impl AdmissionPipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Standard pipeline: panic containment, then CORS outside production,
    /// then rate limiting.
    pub fn for_environment(
        environment: Environment,
        limiter: Arc<RateLimiter>,
        cors_policy: CorsPolicy,
    ) -> Self {
        let mut stages = vec![Stage::CatchPanic];
        if !environment.is_production() {
            stages.push(Stage::Cors(cors_policy));
        }
        stages.push(Stage::RateLimit(limiter));

        Self::new(stages)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Wraps `router` so the first stage sees requests first.
    pub fn apply(&self, router: Router) -> Router {
        // The last layer added is the outermost one.
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| match stage {
                Stage::CatchPanic => router.layer(catch_panic::layer()),
                Stage::Cors(policy) => {
                    router.layer(middleware::from_fn_with_state(policy.clone(), cors::layer))
                }
                Stage::RateLimit(limiter) => router.layer(middleware::from_fn_with_state(
                    limiter.clone(),
                    rate_limit::layer,
                )),
            })
    }
}
