//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::utils::db_error::is_unique_violation_on_code;

/// Default bound on a single store call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    short_url: String,
    original_url: String,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            code: row.code,
            short_url: row.short_url,
            original_url: row.original_url,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Every call is bounded by `query_timeout` so a stalled backend cannot hold
/// a request indefinitely.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgLinkRepository {
    /// Creates a new repository with the default 3 second query timeout.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(|e| {
                tracing::error!(operation, error = %e, "Link store query failed");
                StoreError::Backend(e.to_string())
            }),
            Err(_) => {
                tracing::error!(
                    operation,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "Link store query timed out"
                );
                Err(StoreError::Timeout { operation })
            }
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        self.bounded(
            "exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let insert = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, short_url, original_url, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, short_url, original_url, expires_at, created_at, updated_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.short_url)
        .bind(&new_link.original_url)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref());

        let outcome = match tokio::time::timeout(self.query_timeout, insert).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(code = %new_link.code, "Link insert timed out");
                return Err(StoreError::Timeout {
                    operation: "create",
                });
            }
        };

        match outcome {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation_on_code(&e) => Err(StoreError::Conflict {
                code: new_link.code,
            }),
            Err(e) => {
                tracing::error!(error = %e, "Link insert failed");
                Err(StoreError::Backend(e.to_string()))
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let row = self
            .bounded(
                "find_by_code",
                sqlx::query_as::<_, LinkRow>(
                    r#"
                    SELECT id, code, short_url, original_url, expires_at, created_at, updated_at
                    FROM links
                    WHERE code = $1
                    "#,
                )
                .bind(code)
                .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Link::from))
    }
}
