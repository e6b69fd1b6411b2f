//! Helpers shared across layers.
//!
//! - [`code_generator`] - Random short code generation
//! - [`db_error`] - Classification of database driver errors

pub mod code_generator;
pub mod db_error;
