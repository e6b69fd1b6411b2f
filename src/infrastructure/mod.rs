//! Infrastructure layer: concrete implementations of domain contracts.
//!
//! - [`persistence`] - Link stores (PostgreSQL and in-memory)

pub mod persistence;
