//! Pipeline for filtering and ranking film candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - `rank` for ordering enriched films by rating
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. Filters remove unwanted candidates (arthouse films with few shows)
//! 2. Survivors are enriched with ratings (see the `engine` crate)
//! 3. `rank` orders the enriched films and keeps the top N
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{rank, FilterPipeline};
//! use pipeline::filters::ArthouseFilter;
//!
//! let pipeline = FilterPipeline::new().add_filter(ArthouseFilter::new(30));
//! let filtered = pipeline.apply(candidates)?;
//!
//! // ... enrich ...
//! let top = rank(enriched, 10)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod ranking;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use ranking::{rank, DataError, RankedList, FILMS_COUNT};
