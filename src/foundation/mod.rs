//! Shared primitives: error taxonomy, fragment ids, duration arithmetic.

pub mod core;
pub mod error;
