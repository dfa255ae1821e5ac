//! Configuration for a top-films run.

use std::time::Duration;

use rating_client::{PosterTemplates, RatingEndpoints};

use crate::pool::MissingRatingPolicy;

pub use crate::pool::NUMBER_OF_ASYNC_WORKERS;
pub use pipeline::FILMS_COUNT;
pub use pipeline::filters::MIN_NUMBER_OF_CINEMA_SHOWS;
pub use rating_client::DEFAULT_TIMEOUT as REQUEST_TIMEOUT;

/// Everything the orchestrator needs besides its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct TopFilmsConfig {
    /// Films need strictly more shows than this to be considered
    pub min_shows: u32,
    /// How many films to return
    pub top_n: usize,
    /// Concurrent lookup workers
    pub worker_count: usize,
    pub missing_rating: MissingRatingPolicy,
    /// Timeout applied to each lookup request
    pub request_timeout: Duration,
    pub endpoints: RatingEndpoints,
    pub posters: PosterTemplates,
}

impl Default for TopFilmsConfig {
    fn default() -> Self {
        Self {
            min_shows: MIN_NUMBER_OF_CINEMA_SHOWS,
            top_n: FILMS_COUNT,
            worker_count: NUMBER_OF_ASYNC_WORKERS,
            missing_rating: MissingRatingPolicy::default(),
            request_timeout: REQUEST_TIMEOUT,
            endpoints: RatingEndpoints::default(),
            posters: PosterTemplates::default(),
        }
    }
}

impl TopFilmsConfig {
    pub fn with_min_shows(mut self, min_shows: u32) -> Self {
        self.min_shows = min_shows;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_missing_rating(mut self, policy: MissingRatingPolicy) -> Self {
        self.missing_rating = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_endpoints(mut self, endpoints: RatingEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}
