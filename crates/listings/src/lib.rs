//! # Listings Crate
//!
//! Data model and the listings collaborator for the top-films pipeline.
//!
//! ## Main Components
//!
//! - **types**: `Candidate`, `ListingEntry`, `FilmId`, `RatingInfo`, `EnrichmentResult`
//! - **source**: the `ListingSource` trait plus static and JSON snapshot sources
//! - **error**: Error types for reading listings
//!
//! ## Example Usage
//!
//! ```ignore
//! use listings::{candidates_from_listings, ListingSource, SnapshotListingSource};
//!
//! let source = SnapshotListingSource::new("data/listings.json");
//! let candidates = candidates_from_listings(source.fetch_listings().await?);
//! println!("{} films on screen", candidates.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod source;

// Re-export commonly used types for convenience
pub use error::{ListingError, Result};
pub use source::{parse_listings, ListingSource, SnapshotListingSource, StaticListingSource};
pub use types::{
    candidates_from_listings,
    Candidate,
    EnrichmentResult,
    FilmId,
    ListingEntry,
    Listings,
    RatingInfo,
};
