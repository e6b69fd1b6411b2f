//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use async_trait::async_trait;

/// Failures reported by a link store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The code is already taken. Raised by the store's uniqueness constraint.
    #[error("short code already exists: {code}")]
    Conflict { code: String },

    /// The operation did not finish within the store's time bound.
    #[error("storage operation timed out: {operation}")]
    Timeout { operation: &'static str },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Store of link records.
///
/// Only creation and lookup are exposed; records are never updated or
/// deleted through this interface.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Concurrent in-memory map
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns true if a link with `code` exists, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] or [`StoreError::Backend`] on store failures.
    async fn exists(&self, code: &str) -> Result<bool, StoreError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the code is already taken. This is
    /// the authoritative collision signal: two allocators may both see a code
    /// as free before either inserts it.
    ///
    /// Returns [`StoreError::Timeout`] or [`StoreError::Backend`] on store failures.
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its exact code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] or [`StoreError::Backend`] on store failures.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError>;
}
