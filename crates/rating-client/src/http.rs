//! reqwest-backed rating lookup.

use std::time::Duration;

use async_trait::async_trait;
use listings::{FilmId, RatingInfo};
use reqwest::{Client, redirect};
use tracing::{debug, instrument};

use crate::error::LookupError;
use crate::parse::{extract_film_id, parse_rating_document};
use crate::RatingLookup;

/// Browser-like user agent; the search endpoint serves a captcha to bare clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/55.0.2883.87 Safari/537.36";

/// Per-request timeout applied to both stages.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the two lookup stages send their requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingEndpoints {
    /// Search endpoint, queried with `first=yes&kp_query=<title>`
    pub search_url: String,
    /// Base for rating documents, fetched as `{rating_base}/{id}.xml`
    pub rating_base: String,
}

impl Default for RatingEndpoints {
    fn default() -> Self {
        Self {
            search_url: "https://www.kinopoisk.ru/index.php".to_string(),
            rating_base: "https://rating.kinopoisk.ru".to_string(),
        }
    }
}

/// Looks films up over HTTP.
///
/// Cheap to clone: `reqwest::Client` is reference counted, so every pool
/// worker shares one connection pool.
#[derive(Debug, Clone)]
pub struct HttpRatingLookup {
    client: Client,
    endpoints: RatingEndpoints,
}

impl HttpRatingLookup {
    /// Build a lookup with the given endpoints and per-request timeout.
    pub fn new(endpoints: RatingEndpoints, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &RatingEndpoints {
        &self.endpoints
    }

    fn rating_url(&self, id: &FilmId) -> String {
        format!("{}/{}.xml", self.endpoints.rating_base.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl RatingLookup for HttpRatingLookup {
    #[instrument(skip(self))]
    async fn search(&self, title: &str) -> Result<FilmId, LookupError> {
        let response = self
            .client
            .get(&self.endpoints.search_url)
            .query(&[("first", "yes"), ("kp_query", title)])
            .send()
            .await?;

        // The identifier lives in the URL we were redirected to, whatever the status.
        let final_url = response.url().as_str();
        debug!("Search for {:?} landed on {}", title, final_url);
        extract_film_id(final_url).ok_or(LookupError::Unresolved)
    }

    #[instrument(skip(self), fields(film_id = %id))]
    async fn fetch_rating(&self, id: &FilmId) -> Result<RatingInfo, LookupError> {
        let response = self
            .client
            .get(self.rating_url(id))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        parse_rating_document(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_url_joins_base() {
        let lookup = HttpRatingLookup::new(
            RatingEndpoints {
                search_url: "http://localhost/index.php".to_string(),
                rating_base: "http://localhost/rating/".to_string(),
            },
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        let id = FilmId::parse("326").unwrap();

        assert_eq!(lookup.rating_url(&id), "http://localhost/rating/326.xml");
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = RatingEndpoints::default();
        assert_eq!(endpoints.rating_base, "https://rating.kinopoisk.ru");
        assert!(endpoints.search_url.ends_with("/index.php"));
    }
}
