//! Custom request extractors.

pub mod strict_json;

pub use strict_json::{MAX_BODY_BYTES, StrictJson};
