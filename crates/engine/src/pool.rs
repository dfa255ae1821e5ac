//! # Enrichment Pool
//!
//! Turns filtered candidates into enriched results using a fixed number of
//! tokio workers:
//! 1. Pre-load every candidate into a shared `WorkQueue`
//! 2. Spawn `worker_count` workers into a `JoinSet`
//! 3. Each worker pops a candidate, runs the two-stage lookup, and sends a
//!    successful result through its own sender clone to the `ResultCollector`
//! 4. Join every worker, then drain the collector
//!
//! A failed lookup (timeout, connection error, unresolved title, bad rating
//! document) only drops that candidate. Nothing is retried and nothing
//! short of a bad `worker_count` fails the batch. A lookup that panics is
//! contained to its candidate and the worker moves on to the next one.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use listings::{Candidate, EnrichmentResult, RatingInfo};
use rating_client::{DEFAULT_TIMEOUT, LookupError, PosterTemplates, RatingLookup};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::collector::ResultCollector;
use crate::work_queue::WorkQueue;

/// Default number of concurrent lookup workers.
pub const NUMBER_OF_ASYNC_WORKERS: usize = 10;

/// Errors that abort a whole batch. Per-candidate failures never show up here.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("Result collector failed: {0}")]
    CollectorFailed(String),
}

/// What to do when the rating document has no rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRatingPolicy {
    /// Keep the film with a rating of 0 and no vote count
    #[default]
    ZeroFill,
    /// Drop the film from the results
    Drop,
}

/// Per-batch counters.
///
/// Every dequeued candidate lands in exactly one of `succeeded`,
/// `timed_out`, `connection_failed`, `unresolved`, `missing_rating_dropped`,
/// `other_failed` or `cancelled`. A panicking lookup counts as `other_failed`
/// and is also tallied in `worker_panics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Candidates a worker dequeued and started on
    pub attempted: usize,
    pub succeeded: usize,
    pub timed_out: usize,
    pub connection_failed: usize,
    pub unresolved: usize,
    pub missing_rating_dropped: usize,
    pub other_failed: usize,
    /// Candidates abandoned in flight or never dequeued because of cancellation
    pub cancelled: usize,
    pub worker_panics: usize,
}

impl EnrichStats {
    /// Candidates that were attempted but produced no result.
    pub fn failed(&self) -> usize {
        self.timed_out
            + self.connection_failed
            + self.unresolved
            + self.missing_rating_dropped
            + self.other_failed
    }

    fn merge(&mut self, other: EnrichStats) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.timed_out += other.timed_out;
        self.connection_failed += other.connection_failed;
        self.unresolved += other.unresolved;
        self.missing_rating_dropped += other.missing_rating_dropped;
        self.other_failed += other.other_failed;
        self.cancelled += other.cancelled;
        self.worker_panics += other.worker_panics;
    }

    fn record_failure(&mut self, err: &LookupError) {
        match err {
            LookupError::Timeout => self.timed_out += 1,
            LookupError::Connection(_) => self.connection_failed += 1,
            LookupError::Unresolved => self.unresolved += 1,
            _ => self.other_failed += 1,
        }
    }
}

/// Results of one `enrich` call. `results` has no particular order.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentOutcome {
    pub results: Vec<EnrichmentResult>,
    pub stats: EnrichStats,
}

/// How a single candidate ended.
#[derive(Debug)]
enum Attempt {
    Enriched(EnrichmentResult),
    Failed(LookupError),
    MissingRating,
    Cancelled,
    Panicked,
}

/// Bounded pool of lookup workers.
///
/// Cheap to clone; clones share the lookup and the cancellation token.
#[derive(Clone)]
pub struct EnrichmentPool {
    lookup: Arc<dyn RatingLookup>,
    posters: Arc<PosterTemplates>,
    missing_rating: MissingRatingPolicy,
    stage_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl EnrichmentPool {
    pub fn new(lookup: Arc<dyn RatingLookup>) -> Self {
        Self {
            lookup,
            posters: Arc::new(PosterTemplates::default()),
            missing_rating: MissingRatingPolicy::default(),
            stage_timeout: Some(DEFAULT_TIMEOUT),
            cancel: CancellationToken::new(),
        }
    }

    /// Configure what happens to films without a rating (default: zero-fill)
    pub fn with_missing_rating_policy(mut self, policy: MissingRatingPolicy) -> Self {
        self.missing_rating = policy;
        self
    }

    pub fn with_poster_templates(mut self, posters: PosterTemplates) -> Self {
        self.posters = Arc::new(posters);
        self
    }

    /// Upper bound on each lookup stage, on top of whatever the lookup
    /// enforces itself. `None` trusts the lookup entirely.
    pub fn with_stage_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Use an externally owned token to stop the pool early.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Enrich every candidate using `worker_count` concurrent workers.
    ///
    /// Returns once every candidate has been attempted exactly once (or the
    /// pool was cancelled). Only candidates whose lookup succeeded appear in
    /// the outcome.
    pub async fn enrich(
        &self,
        candidates: Vec<Candidate>,
        worker_count: usize,
    ) -> Result<EnrichmentOutcome, PoolError> {
        if worker_count == 0 {
            return Err(PoolError::InvalidWorkerCount(worker_count));
        }
        if candidates.is_empty() {
            return Ok(EnrichmentOutcome::default());
        }

        let total = candidates.len();
        let spawned = worker_count.min(total);
        info!("Enriching {} candidates with {} workers", total, spawned);

        let queue = WorkQueue::new(candidates);
        let (collector, sender) = ResultCollector::spawn();

        let mut workers = JoinSet::new();
        for worker_id in 0..spawned {
            let pool = self.clone();
            let queue = queue.clone();
            let sender = sender.clone();
            workers.spawn(async move { pool.run_worker(worker_id, queue, sender).await });
        }
        // Only worker-held senders remain, so the collector ends with the last worker.
        drop(sender);

        let mut stats = EnrichStats::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(worker_stats) => stats.merge(worker_stats),
                Err(err) => {
                    warn!("Enrichment worker failed: {}", err);
                    stats.worker_panics += 1;
                }
            }
        }

        let results = collector
            .finish()
            .await
            .map_err(|e| PoolError::CollectorFailed(e.to_string()))?;

        let leftover = queue.len();
        if leftover > 0 {
            if self.cancel.is_cancelled() {
                debug!("{} candidates were never dequeued", leftover);
                stats.cancelled += leftover;
            } else {
                warn!("{} candidates were left in the queue by failed workers", leftover);
            }
        }

        info!(
            "Enrichment finished: attempted={}, succeeded={}, failed={}, cancelled={}",
            stats.attempted,
            stats.succeeded,
            stats.failed(),
            stats.cancelled
        );

        Ok(EnrichmentOutcome { results, stats })
    }

    async fn run_worker(
        self,
        worker_id: usize,
        queue: WorkQueue<Candidate>,
        sender: mpsc::UnboundedSender<EnrichmentResult>,
    ) -> EnrichStats {
        let mut stats = EnrichStats::default();

        while !self.cancel.is_cancelled() {
            let Some(candidate) = queue.pop() else {
                break;
            };
            stats.attempted += 1;

            let attempt = AssertUnwindSafe(self.process(&candidate))
                .catch_unwind()
                .await
                .unwrap_or(Attempt::Panicked);

            match attempt {
                Attempt::Enriched(result) => {
                    debug!(
                        "Enriched {:?}: rating={:?}, votes={:?}",
                        result.title, result.rating, result.votes
                    );
                    stats.succeeded += 1;
                    if sender.send(result).is_err() {
                        warn!("Result collector closed early, worker {} stopping", worker_id);
                        break;
                    }
                }
                Attempt::Failed(err) => {
                    warn!(
                        kind = ?err.kind(),
                        "Dropping {:?}: {}",
                        candidate.title,
                        err
                    );
                    stats.record_failure(&err);
                }
                Attempt::MissingRating => {
                    debug!("Dropping {:?}: no rating available", candidate.title);
                    stats.missing_rating_dropped += 1;
                }
                Attempt::Cancelled => {
                    debug!("Abandoned {:?} after cancellation", candidate.title);
                    stats.cancelled += 1;
                    break;
                }
                Attempt::Panicked => {
                    warn!("Lookup panicked for {:?}, worker {} continuing", candidate.title, worker_id);
                    stats.other_failed += 1;
                    stats.worker_panics += 1;
                }
            }
        }

        stats
    }

    /// Search, then fetch the rating, then derive the poster.
    #[instrument(skip(self, candidate), fields(title = %candidate.title))]
    async fn process(&self, candidate: &Candidate) -> Attempt {
        let id = match self.guarded(self.lookup.search(&candidate.title)).await {
            Ok(id) => id,
            Err(attempt) => return attempt,
        };

        if self.cancel.is_cancelled() {
            return Attempt::Cancelled;
        }

        let info = match self.guarded(self.lookup.fetch_rating(&id)).await {
            Ok(info) => info,
            Err(attempt) => return attempt,
        };

        let info = match (info.rating, self.missing_rating) {
            (Some(_), _) => info,
            (None, MissingRatingPolicy::ZeroFill) => RatingInfo {
                rating: Some(0.0),
                votes: None,
            },
            (None, MissingRatingPolicy::Drop) => return Attempt::MissingRating,
        };

        let poster_url = self.posters.poster_url(Some(&id));
        Attempt::Enriched(EnrichmentResult::new(candidate, info, poster_url))
    }

    /// Run one lookup stage under the stage timeout, giving up early on
    /// cancellation.
    async fn guarded<T>(
        &self,
        call: impl Future<Output = Result<T, LookupError>>,
    ) -> Result<T, Attempt> {
        let bounded = async {
            match self.stage_timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or(Err(LookupError::Timeout)),
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Attempt::Cancelled),
            outcome = bounded => outcome.map_err(Attempt::Failed),
        }
    }
}

impl std::fmt::Debug for EnrichmentPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentPool")
            .field("missing_rating", &self.missing_rating)
            .field("stage_timeout", &self.stage_timeout)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
