//! End-to-end tests for the top-films orchestrator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use engine::{MissingRatingPolicy, TopFilmsConfig, TopFilmsOrchestrator};
use listings::{FilmId, ListingEntry, Listings, RatingInfo, StaticListingSource};
use rating_client::{LookupError, RatingEndpoints, RatingLookup};
use tokio::net::TcpListener;

// ============================================================================
// Test Fixtures
// ============================================================================

fn listings(entries: &[(&str, u32)]) -> Listings {
    entries
        .iter()
        .map(|(title, show_count)| {
            (
                title.to_string(),
                ListingEntry {
                    show_count: *show_count,
                    description: format!("About {}", title),
                    source_url: format!("/movie/{}/", title.to_lowercase()),
                },
            )
        })
        .collect()
}

/// Ratings keyed by title; identifier is the rating times ten.
struct TableLookup {
    ratings: HashMap<String, Option<f32>>,
}

impl TableLookup {
    fn new(entries: &[(&str, Option<f32>)]) -> Self {
        Self {
            ratings: entries.iter().map(|(t, r)| (t.to_string(), *r)).collect(),
        }
    }
}

#[async_trait]
impl RatingLookup for TableLookup {
    async fn search(&self, title: &str) -> Result<FilmId, LookupError> {
        match self.ratings.get(title) {
            Some(Some(rating)) => {
                let tenths = (rating * 10.0).round() as u32;
                Ok(FilmId::parse(&tenths.to_string()).unwrap())
            }
            Some(None) => Ok(FilmId::parse("1").unwrap()),
            None => Err(LookupError::Unresolved),
        }
    }

    async fn fetch_rating(&self, id: &FilmId) -> Result<RatingInfo, LookupError> {
        let tenths: u32 = id.as_str().parse().unwrap();
        if tenths == 1 {
            return Ok(RatingInfo::default());
        }
        Ok(RatingInfo {
            rating: Some(tenths as f32 / 10.0),
            votes: Some(tenths * 100),
        })
    }
}

fn orchestrator(
    entries: &[(&str, u32)],
    lookup: TableLookup,
    config: TopFilmsConfig,
) -> TopFilmsOrchestrator {
    TopFilmsOrchestrator::new(
        Arc::new(StaticListingSource::new(listings(entries))),
        Arc::new(lookup),
        config,
    )
}

// ============================================================================
// Stubbed lookup
// ============================================================================

#[tokio::test]
async fn test_filter_enrich_rank_scenario() {
    let lookup = TableLookup::new(&[
        ("Small Release", Some(9.9)),
        ("Space Opera", Some(6.5)),
        ("Courtroom Drama", Some(9.1)),
    ]);
    let orchestrator = orchestrator(
        &[("Small Release", 10), ("Space Opera", 50), ("Courtroom Drama", 60)],
        lookup,
        TopFilmsConfig::default().with_worker_count(2),
    );

    let films = orchestrator.get_top_films().await.unwrap();

    let ranked: Vec<_> = films.iter().map(|f| (f.title.as_str(), f.rating)).collect();
    assert_eq!(
        ranked,
        vec![("Courtroom Drama", Some(9.1)), ("Space Opera", Some(6.5))]
    );
    assert_eq!(films.as_slice()[0].show_count, 60);
    assert_eq!(films.as_slice()[1].votes, Some(6500));
}

#[tokio::test]
async fn test_unresolved_films_shorten_the_list() {
    let lookup = TableLookup::new(&[("Known", Some(7.0))]);
    let orchestrator = orchestrator(
        &[("Known", 40), ("Unknown", 40)],
        lookup,
        TopFilmsConfig::default(),
    );

    let report = orchestrator.run().await.unwrap();

    assert_eq!(report.films.len(), 1);
    assert_eq!(report.stats.attempted, 2);
    assert_eq!(report.stats.unresolved, 1);
}

#[tokio::test]
async fn test_missing_rating_policy_is_applied() {
    let entries = [("Rated", 40), ("Unrated", 40)];
    let table = [("Rated", Some(7.0)), ("Unrated", None)];

    let zero_filled = orchestrator(&entries, TableLookup::new(&table), TopFilmsConfig::default())
        .get_top_films()
        .await
        .unwrap();
    let ranked: Vec<_> = zero_filled.iter().map(|f| (f.title.as_str(), f.rating)).collect();
    assert_eq!(ranked, vec![("Rated", Some(7.0)), ("Unrated", Some(0.0))]);

    let dropped = orchestrator(
        &entries,
        TableLookup::new(&table),
        TopFilmsConfig::default().with_missing_rating(MissingRatingPolicy::Drop),
    )
    .get_top_films()
    .await
    .unwrap();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped.as_slice()[0].title, "Rated");
}

#[tokio::test]
async fn test_top_n_truncates() {
    let entries: Vec<(String, u32)> = (1..=20).map(|i| (format!("Film {}", i), 100)).collect();
    let refs: Vec<(&str, u32)> = entries.iter().map(|(t, s)| (t.as_str(), *s)).collect();
    let table: Vec<(&str, Option<f32>)> = refs
        .iter()
        .enumerate()
        .map(|(i, (t, _))| (*t, Some(1.0 + i as f32 / 10.0)))
        .collect();

    let films = orchestrator(&refs, TableLookup::new(&table), TopFilmsConfig::default().with_top_n(3))
        .get_top_films()
        .await
        .unwrap();

    let titles: Vec<_> = films.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Film 20", "Film 19", "Film 18"]);
}

#[tokio::test]
async fn test_zero_workers_fails_the_run() {
    let orchestrator = orchestrator(
        &[("Film", 40)],
        TableLookup::new(&[("Film", Some(7.0))]),
        TopFilmsConfig::default().with_worker_count(0),
    );

    assert!(orchestrator.get_top_films().await.is_err());
}

// ============================================================================
// Full stack over HTTP
// ============================================================================

async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("kp_query").map(String::as_str) {
        Some("Space Opera") => Redirect::to("/film/65/").into_response(),
        Some("Courtroom Drama") => Redirect::to("/film/91/").into_response(),
        Some("Hung Jury") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Redirect::to("/film/1/").into_response()
        }
        _ => (StatusCode::OK, "no results").into_response(),
    }
}

async fn film_page(Path(_id): Path<String>) -> &'static str {
    "film"
}

async fn rating(Path(file): Path<String>) -> Response {
    let body = match file.as_str() {
        "65.xml" => r#"<rating><kp_rating num_vote="1200">6.5</kp_rating></rating>"#,
        "91.xml" => r#"<rating><kp_rating num_vote="8800">9.1</kp_rating></rating>"#,
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    (StatusCode::OK, body).into_response()
}

async fn start_mock_rating_service() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock rating service");
    let addr = listener.local_addr().expect("Failed to get local address");

    let app = Router::new()
        .route("/index.php", get(search))
        .route("/film/{id}/", get(film_page))
        .route("/rating/{file}", get(rating));

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Mock rating service failed");
    });

    (format!("http://{}", addr), handle)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_stack_over_http() {
    let (base, handle) = start_mock_rating_service().await;
    let config = TopFilmsConfig::default()
        .with_worker_count(3)
        .with_request_timeout(Duration::from_millis(300))
        .with_endpoints(RatingEndpoints {
            search_url: format!("{}/index.php", base),
            rating_base: format!("{}/rating", base),
        });
    let source = StaticListingSource::new(listings(&[
        ("Small Release", 10),
        ("Space Opera", 50),
        ("Courtroom Drama", 60),
        ("Hung Jury", 45),
        ("Nobody Knows", 70),
    ]));

    let orchestrator = TopFilmsOrchestrator::with_http_lookup(Arc::new(source), config)
        .expect("Failed to build orchestrator");
    let report = orchestrator.run().await.expect("run failed");

    let ranked: Vec<_> = report
        .films
        .iter()
        .map(|f| (f.title.as_str(), f.rating, f.votes))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Courtroom Drama", Some(9.1), Some(8800)),
            ("Space Opera", Some(6.5), Some(1200)),
        ]
    );
    assert_eq!(
        report.films.as_slice()[0].poster_url.as_deref(),
        Some("https://st.kp.yandex.net/images/film_iphone/iphone360_91.jpg")
    );
    assert_eq!(report.stats.attempted, 4);
    assert_eq!(report.stats.timed_out, 1);
    assert_eq!(report.stats.unresolved, 1);

    handle.abort();
}
