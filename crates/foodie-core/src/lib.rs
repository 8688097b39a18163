//! foodie-core: shared types, IDs, and errors.
//!
//! This crate is the foundational dependency for the other foodie crates,
//! providing type-safe identifiers, a unified error type, and the closed
//! enums of the ordering domain.

pub mod error;
pub mod ids;
pub mod kinds;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use kinds::*;
