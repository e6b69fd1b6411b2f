//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, service wiring, the admission
//! pipeline and the Axum server lifecycle.

use crate::api::middleware::{AdmissionPipeline, CorsPolicy, RateLimiter};
use crate::application::services::{LinkAllocator, LinkService};
use crate::config::Config;
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Link store, allocator and service
/// - Admission pipeline for the configured environment
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Rate limit or CORS settings are unusable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;
    tracing::info!("Migrations applied");

    let link_repository = Arc::new(PgLinkRepository::with_timeout(
        Arc::new(pool),
        config.query_timeout(),
    ));
    let allocator = LinkAllocator::new(
        link_repository.clone(),
        config.short_code_length,
        config.code_allocation_attempts,
    );
    let link_service = LinkService::new(link_repository, allocator, config.base_url.clone());
    let state = AppState::new(Arc::new(link_service));

    let limiter = RateLimiter::new(config.rate_limit_rps, config.rate_limit_burst)
        .context("Invalid rate limit settings")?;
    let cors = CorsPolicy::new(&config.cors_allow_origin)
        .with_context(|| format!("Invalid CORS_ALLOW_ORIGIN '{}'", config.cors_allow_origin))?;
    let pipeline = AdmissionPipeline::for_environment(config.environment, Arc::new(limiter), cors);
    tracing::info!(stages = ?pipeline.stage_names(), "Admission pipeline ready");

    let app = app_router(state, &pipeline);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
