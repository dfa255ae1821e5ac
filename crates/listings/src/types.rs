//! Core domain types shared by every stage of the top-films pipeline.
//!
//! - `ListingEntry` / `Listings`: what the listings collaborator hands us
//! - `Candidate`: a film discovered from the listings, before enrichment
//! - `FilmId`: the rating source's identifier for a film
//! - `RatingInfo`: the fields fetched for a resolved identifier
//! - `EnrichmentResult`: a candidate with its rating attached

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Listings
// =============================================================================

/// One film as reported by the listings source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Number of cinema shows currently scheduled for the film
    pub show_count: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_url: String,
}

/// Film title -> listing entry.
///
/// A `BTreeMap` keeps candidate order deterministic across runs.
pub type Listings = BTreeMap<String, ListingEntry>;

// =============================================================================
// Candidate
// =============================================================================

/// A film discovered from the listings source.
///
/// Identity is `title`. `show_count` is frozen here and never refreshed, so
/// the arthouse filter always sees the value the listing reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub show_count: u32,
    pub description: String,
    pub source_url: String,
}

impl Candidate {
    /// Create a candidate with no description or source url.
    pub fn new(title: impl Into<String>, show_count: u32) -> Self {
        Self {
            title: title.into(),
            show_count,
            description: String::new(),
            source_url: String::new(),
        }
    }

    pub fn from_listing(title: impl Into<String>, entry: &ListingEntry) -> Self {
        Self {
            title: title.into(),
            show_count: entry.show_count,
            description: entry.description.clone(),
            source_url: entry.source_url.clone(),
        }
    }
}

/// Turn a listings mapping into candidates, in title order.
pub fn candidates_from_listings(listings: Listings) -> Vec<Candidate> {
    listings
        .into_iter()
        .map(|(title, entry)| Candidate {
            title,
            show_count: entry.show_count,
            description: entry.description,
            source_url: entry.source_url,
        })
        .collect()
}

// =============================================================================
// Film identifier
// =============================================================================

/// Identifier of a film on the rating source.
///
/// Always a non-empty run of ASCII digits. An identifier that could not be
/// resolved is modelled as `Option::<FilmId>::None`, never as a placeholder
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilmId(String);

impl FilmId {
    /// Parse an identifier, returning `None` unless `raw` is all digits.
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Enrichment
// =============================================================================

/// Rating fields fetched for a resolved identifier.
///
/// `rating: None` means the rating document had no rating element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingInfo {
    pub rating: Option<f32>,
    pub votes: Option<u32>,
}

/// A candidate enriched with data from the rating source.
///
/// Built by a pool worker and never mutated once handed to the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub title: String,
    pub rating: Option<f32>,
    pub votes: Option<u32>,
    pub poster_url: Option<String>,
    pub show_count: u32,
}

impl EnrichmentResult {
    pub fn new(candidate: &Candidate, info: RatingInfo, poster_url: impl Into<String>) -> Self {
        Self {
            title: candidate.title.clone(),
            rating: info.rating,
            votes: info.votes,
            poster_url: Some(poster_url.into()),
            show_count: candidate.show_count,
        }
    }
}
