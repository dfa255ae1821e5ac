//! Error types for the listings crate.

use thiserror::Error;

/// Errors that can occur while reading film listings.
///
/// The variants are limited to the listing collaborator itself. Lookup and
/// ranking failures live in their own crates.
#[derive(Error, Debug)]
pub enum ListingError {
    /// Snapshot file could not be read
    #[error("Failed to read listings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot content is not the expected title -> entry mapping
    #[error("Invalid listings document: {0}")]
    Json(#[from] serde_json::Error),

    /// An entry violated the listing contract (e.g. empty title)
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ListingError>;
