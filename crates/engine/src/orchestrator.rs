//! # Top Films Orchestrator
//!
//! This module coordinates the whole run:
//! 1. Fetch listings from the listing source
//! 2. Turn them into candidates
//! 3. Drop arthouse films
//! 4. Enrich the survivors through the pool
//! 5. Rank by rating and keep the top N

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use listings::{candidates_from_listings, Candidate, ListingSource};
use pipeline::filters::ArthouseFilter;
use pipeline::{rank, FilterPipeline, RankedList};
use rating_client::{HttpRatingLookup, RatingLookup};

use crate::config::TopFilmsConfig;
use crate::pool::{EnrichStats, EnrichmentPool};

/// Ranked films together with the enrichment counters of the run.
#[derive(Debug, Clone)]
pub struct TopFilmsReport {
    pub films: RankedList,
    pub stats: EnrichStats,
}

/// Runs ListingSource -> Filter -> EnrichmentPool -> Ranker.
#[derive(Clone)]
pub struct TopFilmsOrchestrator {
    listing_source: Arc<dyn ListingSource>,
    filter_pipeline: Arc<FilterPipeline>,
    pool: EnrichmentPool,
    config: TopFilmsConfig,
}

impl TopFilmsOrchestrator {
    /// Create an orchestrator with explicit collaborators.
    pub fn new(
        listing_source: Arc<dyn ListingSource>,
        lookup: Arc<dyn RatingLookup>,
        config: TopFilmsConfig,
    ) -> Self {
        let filter_pipeline =
            Arc::new(FilterPipeline::new().add_filter(ArthouseFilter::new(config.min_shows)));
        let pool = EnrichmentPool::new(lookup)
            .with_missing_rating_policy(config.missing_rating)
            .with_poster_templates(config.posters.clone())
            .with_stage_timeout(Some(config.request_timeout));
        Self {
            listing_source,
            filter_pipeline,
            pool,
            config,
        }
    }

    /// Create an orchestrator that looks ratings up over HTTP using the
    /// endpoints and timeout from `config`.
    pub fn with_http_lookup(
        listing_source: Arc<dyn ListingSource>,
        config: TopFilmsConfig,
    ) -> Result<Self> {
        let lookup = HttpRatingLookup::new(config.endpoints.clone(), config.request_timeout)
            .context("Failed to build rating lookup client")?;
        Ok(Self::new(listing_source, Arc::new(lookup), config))
    }

    pub fn config(&self) -> &TopFilmsConfig {
        &self.config
    }

    /// Token that stops an in-progress run; cancelled runs rank whatever
    /// finished before the cancel.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.pool.cancellation_token()
    }

    /// Main entry point: the best rated films currently screened.
    pub async fn get_top_films(&self) -> Result<RankedList> {
        Ok(self.run().await?.films)
    }

    /// Like `get_top_films`, also returning how many lookups failed and why.
    pub async fn run(&self) -> Result<TopFilmsReport> {
        let start_time = Instant::now();

        let candidates = self.load_candidates().await?;
        info!(
            "Loaded {} candidates from {} listings",
            candidates.len(),
            self.listing_source.name()
        );

        let filtered = self.apply_filters(candidates)?;
        info!(
            "Applied filters, candidates remaining: {}",
            filtered.len()
        );

        let outcome = self
            .pool
            .enrich(filtered, self.config.worker_count)
            .await
            .context("Enrichment pool failed")?;

        let films = rank(outcome.results, self.config.top_n).context("Failed to rank films")?;
        info!(
            "Selected top {} films (requested {})",
            films.len(),
            self.config.top_n
        );

        info!("Total time to rank films: {:.2?}", start_time.elapsed());
        Ok(TopFilmsReport {
            films,
            stats: outcome.stats,
        })
    }

    /// Fetch listings and convert them into candidates
    pub async fn load_candidates(&self) -> Result<Vec<Candidate>> {
        let listings = self
            .listing_source
            .fetch_listings()
            .await
            .context("Failed to fetch listings")?;
        Ok(candidates_from_listings(listings))
    }

    /// Apply the filter pipeline to candidates
    pub fn apply_filters(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        self.filter_pipeline
            .apply(candidates)
            .context("Failed to apply filters")
    }
}

impl std::fmt::Debug for TopFilmsOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopFilmsOrchestrator")
            .field("listing_source", &self.listing_source.name())
            .field("pool", &self.pool)
            .field("config", &self.config)
            .finish()
    }
}
