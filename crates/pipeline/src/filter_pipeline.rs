//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use anyhow::Result;
use listings::Candidate;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(ArthouseFilter::new(30));
///
/// let filtered = pipeline.apply(candidates)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Number of filters in the pipeline.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates after all filters
    /// * `Err` - If any filter fails
    pub fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::ArthouseFilter;

    struct RejectTitle(&'static str);

    impl Filter for RejectTitle {
        fn name(&self) -> &str {
            "RejectTitle"
        }

        fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
            Ok(candidates.into_iter().filter(|c| c.title != self.0).collect())
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();

        let candidates = vec![Candidate::new("Alien", 1), Candidate::new("Heat", 90)];

        let filtered = pipeline.apply(candidates).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(ArthouseFilter::new(30));

        let candidates = vec![Candidate::new("Alien", 1), Candidate::new("Heat", 90)];

        let filtered = pipeline.apply(candidates).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Heat");
    }

    #[test]
    fn test_filters_run_in_sequence() {
        let pipeline = FilterPipeline::new()
            .add_filter(ArthouseFilter::new(30))
            .add_filter(RejectTitle("Heat"));

        let candidates = vec![
            Candidate::new("Alien", 1),
            Candidate::new("Heat", 90),
            Candidate::new("Ronin", 45),
        ];

        let filtered = pipeline.apply(candidates).unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Ronin");
    }
}
