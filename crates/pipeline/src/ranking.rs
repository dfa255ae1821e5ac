//! Ranking of enriched films.
//!
//! Sorts by rating descending and keeps the top N. The sort is stable, so
//! films with equal ratings keep the order they were collected in.

use std::cmp::Ordering;

use listings::EnrichmentResult;
use serde::Serialize;
use thiserror::Error;

/// Default number of films returned.
pub const FILMS_COUNT: usize = 10;

/// Raised when a result cannot be ordered by rating.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// The lookup collaborator handed us a NaN or infinite rating
    #[error("Rating for {title:?} is not a finite number: {value}")]
    NonNumericRating { title: String, value: f32 },
}

/// Films ordered by rating, best first. At most `top_n` long.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedList(Vec<EnrichmentResult>);

impl RankedList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichmentResult> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[EnrichmentResult] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<EnrichmentResult> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a EnrichmentResult;
    type IntoIter = std::slice::Iter<'a, EnrichmentResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Rank results by rating (descending) and truncate to `top_n`.
///
/// A film without a rating sorts after every rated film. A non-finite
/// rating fails the whole ranking, since it means a collaborator broke its
/// contract.
pub fn rank(results: Vec<EnrichmentResult>, top_n: usize) -> Result<RankedList, DataError> {
    if let Some(bad) = results
        .iter()
        .find(|r| r.rating.is_some_and(|value| !value.is_finite()))
    {
        return Err(DataError::NonNumericRating {
            title: bad.title.clone(),
            value: bad.rating.unwrap_or(f32::NAN),
        });
    }

    let mut ranked = results;
    ranked.sort_by(|a, b| compare_ratings(b.rating, a.rating));
    ranked.truncate(top_n);

    Ok(RankedList(ranked))
}

/// Ascending order with `None` below every present rating.
fn compare_ratings(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
