//! Rating lookup client.
//!
//! Resolves a film title to the rating source's identifier, then fetches
//! the rating and vote count for that identifier. The two calls are
//! dependent: stage 2 needs stage 1's output.
//!
//! - `RatingLookup`: the collaborator trait the enrichment pool depends on
//! - `HttpRatingLookup`: reqwest implementation with per-request timeouts
//! - `parse`: identifier and rating-document parsing
//! - `PosterTemplates`: deterministic poster URL derivation

use async_trait::async_trait;

pub mod error;
pub mod http;
pub mod parse;
pub mod poster;

pub use error::{FailureKind, LookupError};
pub use http::{DEFAULT_TIMEOUT, HttpRatingLookup, RatingEndpoints, USER_AGENT};
pub use listings::{FilmId, RatingInfo};
pub use parse::{extract_film_id, parse_rating_document};
pub use poster::PosterTemplates;

/// Two-stage lookup against the rating source.
///
/// `Send + Sync` so a single instance can be shared by every pool worker.
#[async_trait]
pub trait RatingLookup: Send + Sync {
    /// Stage 1: resolve a title to an identifier.
    ///
    /// Returns `LookupError::Unresolved` when the search yields no identifier.
    async fn search(&self, title: &str) -> Result<FilmId, LookupError>;

    /// Stage 2: fetch rating and votes for a resolved identifier.
    ///
    /// A document without a rating is `Ok` with `rating: None`.
    async fn fetch_rating(&self, id: &FilmId) -> Result<RatingInfo, LookupError>;
}
