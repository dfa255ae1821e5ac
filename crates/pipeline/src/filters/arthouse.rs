//! Filter to drop low-distribution ("arthouse") films.
//!
//! A film screened in only a handful of cinemas is unlikely to be what a
//! casual viewer is looking for, so anything at or below the show-count
//! threshold is removed before we spend network calls on it.

use crate::traits::Filter;
use anyhow::Result;
use listings::Candidate;

/// Default threshold: a film needs more than this many shows to pass.
pub const MIN_NUMBER_OF_CINEMA_SHOWS: u32 = 30;

/// Removes candidates with `show_count <= min_shows`.
#[derive(Debug, Clone, Copy)]
pub struct ArthouseFilter {
    min_shows: u32,
}

impl ArthouseFilter {
    pub fn new(min_shows: u32) -> Self {
        Self { min_shows }
    }

    pub fn min_shows(&self) -> u32 {
        self.min_shows
    }

    /// True iff the candidate is screened strictly more than `min_shows` times.
    pub fn passes(&self, candidate: &Candidate) -> bool {
        candidate.show_count > self.min_shows
    }
}

impl Default for ArthouseFilter {
    fn default() -> Self {
        Self::new(MIN_NUMBER_OF_CINEMA_SHOWS)
    }
}

impl Filter for ArthouseFilter {
    fn name(&self) -> &str {
        "ArthouseFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| self.passes(candidate))
            .collect();

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        let filter = ArthouseFilter::default();

        assert!(!filter.passes(&Candidate::new("At threshold", 30)));
        assert!(filter.passes(&Candidate::new("Above threshold", 31)));
        assert!(!filter.passes(&Candidate::new("No shows", 0)));
    }

    #[test]
    fn test_passes_matches_show_count_rule() {
        for min_shows in [0, 1, 30, 100] {
            let filter = ArthouseFilter::new(min_shows);
            for show_count in 0..150 {
                let candidate = Candidate::new("Film", show_count);
                assert_eq!(filter.passes(&candidate), show_count > min_shows);
            }
        }
    }

    #[test]
    fn test_apply_keeps_order() {
        let filter = ArthouseFilter::new(30);
        let candidates = vec![
            Candidate::new("Blockbuster", 200),
            Candidate::new("Festival Short", 3),
            Candidate::new("Sequel", 31),
        ];

        let filtered = filter.apply(candidates).unwrap();
        let titles: Vec<_> = filtered.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Blockbuster", "Sequel"]);
    }
}
