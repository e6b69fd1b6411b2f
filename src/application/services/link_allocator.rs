//! Short code allocation.

use std::sync::Arc;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code};

/// Candidates tried per allocation when not configured: the first pick plus one retry.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

/// Picks codes that are not yet present in the link store.
///
/// With 62 symbols and 6 positions there are about 5.6e10 codes, so a
/// collision is unlikely until the store is heavily populated and a small
/// bounded retry is enough. The existence check is not atomic with the later
/// insert; the store's uniqueness constraint remains the authoritative check
/// (see [`crate::application::services::LinkService::create_link`]).
pub struct LinkAllocator {
    repository: Arc<dyn LinkRepository>,
    code_length: usize,
    max_attempts: usize,
}

impl LinkAllocator {
    /// Creates an allocator. `max_attempts` is clamped to at least 1.
    pub fn new(repository: Arc<dyn LinkRepository>, code_length: usize, max_attempts: usize) -> Self {
        Self {
            repository,
            code_length,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Allocator with 6-character codes and [`DEFAULT_MAX_ATTEMPTS`].
    pub fn with_defaults(repository: Arc<dyn LinkRepository>) -> Self {
        Self::new(repository, DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns a code that the store did not contain at the time of the check.
    ///
    /// # Errors
    ///
    /// - [`AppError::AllocationExhausted`] when every candidate was taken
    /// - [`AppError::Entropy`] when the random source fails
    /// - [`AppError::Store`] when the existence check fails; not retried
    pub async fn allocate(&self) -> Result<String, AppError> {
        for attempt in 1..=self.max_attempts {
            let code = generate_code(self.code_length)?;

            if !self.repository.exists(&code).await? {
                return Ok(code);
            }

            metrics::counter!("code_collisions_total").increment(1);
            tracing::warn!(attempt, max_attempts = self.max_attempts, "Short code collision");
        }

        Err(AppError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockLinkRepository, StoreError};
    use crate::utils::code_generator::is_alphabet_code;

    #[tokio::test]
    async fn test_allocate_returns_free_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists()
            .withf(|code| code.len() == 6 && is_alphabet_code(code))
            .times(1)
            .returning(|_| Ok(false));

        let allocator = LinkAllocator::with_defaults(Arc::new(repo));
        let code = allocator.allocate().await.unwrap();

        assert_eq!(code.len(), 6);
        assert!(is_alphabet_code(&code));
    }

    #[tokio::test]
    async fn test_allocate_retries_once_on_collision() {
        let mut repo = MockLinkRepository::new();
        let mut calls = 0;
        repo.expect_exists().times(2).returning(move |_| {
            calls += 1;
            Ok(calls == 1)
        });

        let allocator = LinkAllocator::with_defaults(Arc::new(repo));

        assert!(allocator.allocate().await.is_ok());
    }

    #[tokio::test]
    async fn test_allocate_gives_up_after_max_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists().times(2).returning(|_| Ok(true));

        let allocator = LinkAllocator::with_defaults(Arc::new(repo));
        let err = allocator.allocate().await.unwrap_err();

        assert!(matches!(err, AppError::AllocationExhausted { attempts: 2 }));
    }

    #[tokio::test]
    async fn test_allocate_honours_configured_length_and_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists()
            .withf(|code| code.len() == 10)
            .times(5)
            .returning(|_| Ok(true));

        let allocator = LinkAllocator::new(Arc::new(repo), 10, 5);
        let err = allocator.allocate().await.unwrap_err();

        assert!(matches!(err, AppError::AllocationExhausted { attempts: 5 }));
    }

    #[tokio::test]
    async fn test_allocate_does_not_retry_store_errors() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists()
            .times(1)
            .returning(|_| Err(StoreError::Timeout { operation: "exists" }));

        let allocator = LinkAllocator::with_defaults(Arc::new(repo));
        let err = allocator.allocate().await.unwrap_err();

        assert!(matches!(err, AppError::Store(StoreError::Timeout { .. })));
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        let allocator = LinkAllocator::new(Arc::new(MockLinkRepository::new()), 6, 0);
        assert_eq!(allocator.max_attempts(), 1);
        assert_eq!(allocator.code_length(), 6);
    }
}
