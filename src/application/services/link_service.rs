//! Link creation and resolution service.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::services::LinkAllocator;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::is_alphabet_code;

/// How many times an insert rejected by the store's uniqueness constraint is
/// retried with a freshly allocated code.
pub const MAX_INSERT_CONFLICT_RETRIES: usize = 1;

/// Service for creating and resolving short links.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    allocator: LinkAllocator,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` prefixes every generated `short_url`; a trailing slash is ignored.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        allocator: LinkAllocator,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            repository,
            allocator,
            base_url,
        }
    }

    /// Creates and stores a short link for `original_url`.
    ///
    /// The URL must already be validated. `expires_at` is stored as given,
    /// including instants in the past.
    ///
    /// # Collisions
    ///
    /// The allocator only checks that a code is free. If a concurrent request
    /// inserts the same code first, the store reports a conflict and the whole
    /// allocate-then-insert sequence is repeated up to
    /// [`MAX_INSERT_CONFLICT_RETRIES`] times.
    ///
    /// # Errors
    ///
    /// - [`AppError::AllocationExhausted`] if no free code could be found or
    ///   inserts kept conflicting
    /// - [`AppError::Entropy`] if the random source fails
    /// - [`AppError::Store`] on timeouts or backend failures; never retried here
    pub async fn create_link(
        &self,
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        let mut conflicts = 0;

        loop {
            let code = self.allocator.allocate().await?;
            let new_link = NewLink {
                short_url: self.short_url(&code),
                code,
                original_url: original_url.clone(),
                expires_at,
            };

            match self.repository.create(new_link).await {
                Ok(link) => {
                    metrics::counter!("links_created_total").increment(1);
                    tracing::info!(code = %link.code, "Short link created");
                    return Ok(link);
                }
                Err(StoreError::Conflict { code }) if conflicts < MAX_INSERT_CONFLICT_RETRIES => {
                    conflicts += 1;
                    metrics::counter!("code_collisions_total").increment(1);
                    tracing::warn!(%code, "Short code taken by a concurrent insert, retrying");
                }
                Err(StoreError::Conflict { .. }) => {
                    return Err(AppError::AllocationExhausted {
                        attempts: self.allocator.max_attempts() * (conflicts + 1),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Looks up a link by code for resolution.
    ///
    /// Reads never modify the record; expired links stay stored.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link uses `code`
    /// - [`AppError::Expired`] if the link's expiry has passed
    /// - [`AppError::Store`] on store failures
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        if !is_alphabet_code(code) {
            return Err(AppError::not_found(code));
        }

        if !self.repository.exists(code).await? {
            return Err(AppError::not_found(code));
        }

        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))?;

        if link.is_expired() {
            return Err(AppError::expired(code));
        }

        Ok(link)
    }

    /// Constructs the full short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
