//! HTTP request handlers for API endpoints.

pub mod create_link;
pub mod get_link;

pub use create_link::create_link_handler;
pub use get_link::{get_link_handler, missing_code_handler};
