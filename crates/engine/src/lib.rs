//! Engine crate for the top-films pipeline.
//!
//! Hosts the concurrent enrichment pool and the orchestrator that wires
//! listings, filtering, enrichment and ranking together.

pub mod collector;
pub mod config;
pub mod orchestrator;
pub mod pool;
pub mod work_queue;

pub use collector::ResultCollector;
pub use config::TopFilmsConfig;
pub use orchestrator::{TopFilmsOrchestrator, TopFilmsReport};
pub use pool::{EnrichStats, EnrichmentOutcome, EnrichmentPool, MissingRatingPolicy, PoolError};
pub use work_queue::WorkQueue;
