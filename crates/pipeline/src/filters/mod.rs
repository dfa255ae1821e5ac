//! Filter implementations for the candidate pipeline.
//!
//! This module contains the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod arthouse;

// Re-export for convenience
pub use arthouse::{ArthouseFilter, MIN_NUMBER_OF_CINEMA_SHOWS};
