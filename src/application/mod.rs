//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a small API for HTTP
//! handlers:
//!
//! - [`services::LinkAllocator`] - Unique short code allocation
//! - [`services::LinkService`] - Short link creation and resolution

pub mod services;
