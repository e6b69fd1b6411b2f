//! Link store implementations.
//!
//! - [`PgLinkRepository`] - PostgreSQL storage with per-call timeouts
//! - [`InMemoryLinkRepository`] - Concurrent in-memory storage for tests and embedding

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
