//! Core domain entities.
//!
//! - [`Link`] - A stored short link
//! - [`NewLink`] - Input for inserting a link

pub mod link;

pub use link::{Link, NewLink};
