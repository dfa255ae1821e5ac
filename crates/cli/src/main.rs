use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::config::{
    FILMS_COUNT, MIN_NUMBER_OF_CINEMA_SHOWS, NUMBER_OF_ASYNC_WORKERS, REQUEST_TIMEOUT,
};
use engine::{EnrichStats, MissingRatingPolicy, TopFilmsConfig, TopFilmsOrchestrator};
use listings::{candidates_from_listings, ListingSource, SnapshotListingSource};
use pipeline::RankedList;
use pipeline::filters::ArthouseFilter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Top Films - best rated films currently in cinemas
#[derive(Parser, Debug)]
#[command(name = "top-films")]
#[command(about = "Rank currently screened films by rating, skipping arthouse releases", long_about = None)]
struct Cli {
    /// Path to a JSON listings snapshot (title -> {show_count, description, source_url})
    #[arg(short, long, global = true, env = "TOP_FILMS_LISTINGS", default_value = "data/listings.json")]
    listings: PathBuf,

    /// Films need more than this many shows to be considered
    #[arg(long, global = true, env = "TOP_FILMS_MIN_SHOWS", default_value_t = MIN_NUMBER_OF_CINEMA_SHOWS)]
    min_shows: u32,

    /// Number of films to return
    #[arg(long, global = true, env = "TOP_FILMS_COUNT", default_value_t = FILMS_COUNT)]
    top: usize,

    /// Number of concurrent rating lookups
    #[arg(long, global = true, env = "TOP_FILMS_WORKERS", default_value_t = NUMBER_OF_ASYNC_WORKERS)]
    workers: usize,

    /// Timeout for each rating request, in seconds
    #[arg(long, global = true, env = "TOP_FILMS_TIMEOUT_SECS", default_value_t = REQUEST_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Leave out films without a rating instead of listing them as 0
    #[arg(long, global = true, env = "TOP_FILMS_DROP_MISSING_RATINGS")]
    drop_missing_ratings: bool,

    /// Runs `top` when no subcommand is given
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Look up ratings and print the top films
    Top {
        /// Print the ranked list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the listing with the arthouse verdict for each film (no network)
    Candidates,
}

impl Cli {
    fn top_films_config(&self) -> TopFilmsConfig {
        let missing_rating = if self.drop_missing_ratings {
            MissingRatingPolicy::Drop
        } else {
            MissingRatingPolicy::ZeroFill
        };
        TopFilmsConfig::default()
            .with_min_shows(self.min_shows)
            .with_top_n(self.top)
            .with_worker_count(self.workers)
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_missing_rating(missing_rating)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("Using listings snapshot {}", cli.listings.display());
    let source = SnapshotListingSource::new(&cli.listings);

    match cli.command.as_ref().unwrap_or(&Commands::Top { json: false }) {
        Commands::Top { json } => handle_top(source, cli.top_films_config(), *json).await?,
        Commands::Candidates => handle_candidates(source, cli.min_shows).await?,
    }

    Ok(())
}

/// Handle the 'top' command
async fn handle_top(source: SnapshotListingSource, config: TopFilmsConfig, json: bool) -> Result<()> {
    let orchestrator = TopFilmsOrchestrator::with_http_lookup(Arc::new(source), config)?;

    // Ctrl-C stops the lookups; whatever finished is still ranked
    let token = orchestrator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let start = Instant::now();
    let report = orchestrator.run().await?;

    if json {
        let rendered = serde_json::to_string_pretty(&report.films)
            .context("Failed to serialize ranked films")?;
        println!("{}", rendered);
    } else {
        print_films(&report.films);
        print_stats(&report.stats, start.elapsed());
    }
    Ok(())
}

/// Handle the 'candidates' command
async fn handle_candidates(source: SnapshotListingSource, min_shows: u32) -> Result<()> {
    let listings = source
        .fetch_listings()
        .await
        .with_context(|| format!("Failed to load {}", source.path().display()))?;
    let filter = ArthouseFilter::new(min_shows);

    let mut candidates = candidates_from_listings(listings);
    candidates.sort_by(|a, b| b.show_count.cmp(&a.show_count));

    println!("{}", format!("Films on screen ({}):", candidates.len()).bold().blue());
    for candidate in &candidates {
        let verdict = if filter.passes(candidate) {
            "kept".green()
        } else {
            "arthouse".yellow()
        };
        println!(
            "  {} | Cinema shows: {} | {}",
            candidate.title, candidate.show_count, verdict
        );
    }
    Ok(())
}

/// Helper function to format and print ranked films
fn print_films(films: &RankedList) {
    println!("{}", "Top films:".bold().blue());
    if films.is_empty() {
        println!("  (no films could be rated)");
        return;
    }
    for (i, film) in films.iter().enumerate() {
        let rating = film
            .rating
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "-".to_string());
        let votes = film
            .votes
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}. Title: {} | Rating: {} | Votes number: {} | Cinema shows: {}",
            (i + 1).to_string().green(),
            film.title.bold(),
            rating,
            votes,
            film.show_count
        );
    }
}

fn print_stats(stats: &EnrichStats, elapsed: Duration) {
    println!(
        "{} Looked up {} films in {:.2?}: {} rated, {} failed ({} timed out, {} unresolved), {} cancelled",
        "✓".green(),
        stats.attempted,
        elapsed,
        stats.succeeded,
        stats.failed(),
        stats.timed_out,
        stats.unresolved,
        stats.cancelled
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_top_with_defaults() {
        let cli = Cli::try_parse_from(["top-films"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.min_shows, MIN_NUMBER_OF_CINEMA_SHOWS);
        assert_eq!(cli.top, FILMS_COUNT);
        assert_eq!(cli.workers, NUMBER_OF_ASYNC_WORKERS);
        assert_eq!(cli.timeout_secs, REQUEST_TIMEOUT.as_secs());
        assert!(!cli.drop_missing_ratings);
    }

    #[test]
    fn test_shared_flags_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "top-films",
            "top",
            "--min-shows",
            "5",
            "--top",
            "3",
            "--workers",
            "2",
            "--timeout-secs",
            "4",
            "--drop-missing-ratings",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Commands::Top { json: true }));
        let config = cli.top_films_config();
        assert_eq!(config.min_shows, 5);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.worker_count, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(4));
        assert_eq!(config.missing_rating, MissingRatingPolicy::Drop);
    }

    #[test]
    fn test_shared_flags_accepted_before_subcommand() {
        let cli = Cli::try_parse_from(["top-films", "--min-shows", "12", "candidates"]).unwrap();

        assert_eq!(cli.command, Some(Commands::Candidates));
        assert_eq!(cli.min_shows, 12);
    }
}
