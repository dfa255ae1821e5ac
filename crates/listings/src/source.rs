//! Listing sources.
//!
//! The pipeline only depends on the `title -> ListingEntry` shape. How the
//! listing was obtained (scraped page, saved snapshot, fixture) is up to the
//! implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{ListingError, Result};
use crate::types::Listings;

/// Supplies the films currently screened.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Returns the name of this source (for logging)
    fn name(&self) -> &str;

    async fn fetch_listings(&self) -> Result<Listings>;
}

/// In-memory listings, handy for fixtures and for callers that parsed the
/// page themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticListingSource {
    listings: Listings,
}

impl StaticListingSource {
    pub fn new(listings: Listings) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl ListingSource for StaticListingSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_listings(&self) -> Result<Listings> {
        Ok(self.listings.clone())
    }
}

/// Reads listings from a JSON snapshot on disk.
///
/// Format:
/// ```json
/// { "Film title": { "show_count": 42, "description": "...", "source_url": "..." } }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotListingSource {
    path: PathBuf,
}

impl SnapshotListingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ListingSource for SnapshotListingSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn fetch_listings(&self) -> Result<Listings> {
        debug!("Reading listings snapshot from {}", self.path.display());
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ListingError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let listings = parse_listings(&raw)?;
        info!(
            "Loaded {} films from {}",
            listings.len(),
            self.path.display()
        );
        Ok(listings)
    }
}

/// Parse a JSON listings document.
///
/// Titles are trimmed; an empty title is rejected since title is the
/// candidate's identity.
pub fn parse_listings(raw: &str) -> Result<Listings> {
    let parsed: Listings = serde_json::from_str(raw)?;
    let mut listings = Listings::new();
    for (title, entry) in parsed {
        let title = title.trim();
        if title.is_empty() {
            return Err(ListingError::Validation(
                "listing entry with an empty title".to_string(),
            ));
        }
        listings.insert(title.to_string(), entry);
    }
    Ok(listings)
}
