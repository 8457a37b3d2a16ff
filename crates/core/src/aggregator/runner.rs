//! Cast aggregation worker pool.
//!
//! A fixed number of workers pull movie indices from a shared cursor, look up
//! each movie's cast and fold it into a shared [`ActorCounts`]. The caller
//! waits for the pool to drain or for the run deadline, whichever is first.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::catalog::{CastLookupProvider, MovieTitle};
use crate::retry::RetryPolicy;

use super::config::AggregatorConfig;
use super::types::{ActorCounts, AggregateReport};

/// Counts actor appearances across a list of movies.
pub struct Aggregator {
    lookup: Arc<dyn CastLookupProvider>,
    config: AggregatorConfig,
}

/// State shared by every worker of one run.
struct RunContext {
    lookup: Arc<dyn CastLookupProvider>,
    movies: Vec<MovieTitle>,
    cursor: AtomicUsize,
    counts: ActorCounts,
    retries: AtomicU64,
    policy: RetryPolicy,
    expired: AtomicBool,
}

impl Aggregator {
    /// Create a new aggregator.
    pub fn new(lookup: Arc<dyn CastLookupProvider>, config: AggregatorConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Look up every movie and count actor appearances.
    ///
    /// Returns once all lookups are done or the configured deadline elapses.
    /// On expiry the counts gathered so far are returned with
    /// `complete == false`; lookups still in flight keep running in the
    /// background but no longer affect the report.
    pub async fn aggregate(&self, movies: &[MovieTitle]) -> AggregateReport {
        let total = movies.len();
        if total == 0 {
            info!("No movies to query");
            return AggregateReport::empty();
        }

        let workers = self.config.concurrency.clamp(1, total);
        let deadline = self.config.deadline();

        info!(
            "Querying cast of {} movies with {} workers (deadline {:?})",
            total, workers, deadline
        );

        let ctx = Arc::new(RunContext {
            lookup: Arc::clone(&self.lookup),
            movies: movies.to_vec(),
            cursor: AtomicUsize::new(0),
            counts: ActorCounts::new(),
            retries: AtomicU64::new(0),
            policy: self.config.retry_policy(),
            expired: AtomicBool::new(false),
        });

        let handles: Vec<_> = (0..workers)
            .map(|worker_id| tokio::spawn(Self::run_worker(worker_id, Arc::clone(&ctx))))
            .collect();

        let complete = match tokio::time::timeout(deadline, join_all(handles)).await {
            Ok(results) => {
                let mut all_ok = true;
                for result in results {
                    if let Err(e) = result {
                        error!("Aggregation worker failed: {}", e);
                        all_ok = false;
                    }
                }
                all_ok
            }
            Err(_) => {
                ctx.expired.store(true, Ordering::SeqCst);
                warn!(
                    "Deadline of {:?} elapsed, returning partial counts",
                    deadline
                );
                false
            }
        };

        let tally = ctx.counts.snapshot().await;
        let retries = ctx.retries.load(Ordering::SeqCst);
        let report = AggregateReport::from_tally(tally, complete, total, retries);

        info!(
            "Actor querying complete: {} actors from {}/{} movies ({} unmatched, {} failed, {} retries)",
            report.counts.len(),
            report.movies_resolved,
            total,
            report.movies_unmatched,
            report.movies_failed,
            report.retries
        );
        debug!("Actor counts: {:?}", report.counts);

        report
    }

    /// Process movies until the list is exhausted or the run expires.
    async fn run_worker(worker_id: usize, ctx: Arc<RunContext>) {
        let total = ctx.movies.len();

        loop {
            if ctx.expired.load(Ordering::SeqCst) {
                debug!("Worker {} stopping: run expired", worker_id);
                break;
            }

            let index = ctx.cursor.fetch_add(1, Ordering::SeqCst);
            let Some(title) = ctx.movies.get(index) else {
                break;
            };

            info!("Querying for {} ({}/{})...", title, index + 1, total);

            let mut attempts: u64 = 0;
            let result = ctx
                .policy
                .run(title, Some(&ctx.expired), || {
                    attempts += 1;
                    ctx.lookup.cast_members(title)
                })
                .await;
            ctx.retries
                .fetch_add(attempts.saturating_sub(1), Ordering::SeqCst);

            match result {
                Ok(Some(cast)) => {
                    debug!("Cast for {}: {:?}", title, cast);
                    ctx.counts.record_movie(&cast).await;
                }
                Ok(None) => {
                    debug!("No match for {}", title);
                    ctx.counts.record_unmatched().await;
                }
                Err(e) => {
                    warn!("Cast lookup for {} failed: {}", title, e);
                    ctx.counts.record_failed().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::catalog::CatalogError;
    use crate::testing::{fixtures, MockCastLookup};

    fn aggregator(lookup: &MockCastLookup, config: AggregatorConfig) -> Aggregator {
        Aggregator::new(Arc::new(lookup.clone()), config)
    }

    #[tokio::test]
    async fn test_empty_movie_list() {
        let lookup = MockCastLookup::new();
        let report = aggregator(&lookup, AggregatorConfig::default())
            .aggregate(&[])
            .await;

        assert!(report.complete);
        assert!(report.counts.is_empty());
        assert_eq!(report.movies_total, 0);
        assert!(lookup.recorded_lookups().await.is_empty());
    }

    #[tokio::test]
    async fn test_counts_shawshank_catalog() {
        let (movies, casts) = fixtures::shawshank_catalog();
        let lookup = MockCastLookup::with_casts(casts);

        let report = aggregator(&lookup, AggregatorConfig::default())
            .aggregate(&movies)
            .await;

        assert!(report.complete);
        assert_eq!(report.movies_total, 6);
        assert_eq!(report.movies_resolved, 6);
        assert_eq!(report.counts.len(), 4);
        assert_eq!(report.counts["Johnny Depp"], 5);
        assert_eq!(report.counts["Mohanlal"], 3);
        assert_eq!(report.counts["Mammooty"], 3);
        assert_eq!(report.counts["Stuart Little"], 1);
    }

    #[tokio::test]
    async fn test_unmatched_movie_contributes_nothing() {
        let lookup = MockCastLookup::new();
        lookup
            .add_cast("Heat", fixtures::cast(&["Al Pacino", "Robert De Niro"]))
            .await;

        let movies = fixtures::titles(&["Heat", "Not A Real Movie"]);
        let report = aggregator(&lookup, AggregatorConfig::default())
            .aggregate(&movies)
            .await;

        assert!(report.complete);
        assert_eq!(report.movies_resolved, 1);
        assert_eq!(report.movies_unmatched, 1);
        assert_eq!(report.counts.len(), 2);
        assert_eq!(report.counts["Al Pacino"], 1);
    }

    #[tokio::test]
    async fn test_duplicate_titles_counted_separately() {
        let lookup = MockCastLookup::new();
        lookup.add_cast("Heat", fixtures::cast(&["Al Pacino"])).await;

        let movies = fixtures::titles(&["Heat", "Heat", "Heat"]);
        let report = aggregator(&lookup, AggregatorConfig::default())
            .aggregate(&movies)
            .await;

        assert_eq!(report.counts["Al Pacino"], 3);
        assert_eq!(lookup.lookup_count("Heat").await, 3);
    }

    #[tokio::test]
    async fn test_timeouts_are_retried() {
        let (movies, casts) = fixtures::shawshank_catalog();
        let lookup = MockCastLookup::with_casts(casts);
        lookup.fail_with_timeouts("The Godfather", 4).await;
        lookup.fail_with_timeouts("Shawshank Ascension IV", 1).await;

        let report = aggregator(&lookup, AggregatorConfig::default())
            .aggregate(&movies)
            .await;

        assert!(report.complete);
        assert_eq!(report.retries, 5);
        assert_eq!(report.movies_failed, 0);
        assert_eq!(report.counts["Johnny Depp"], 5);
        assert_eq!(report.counts["Mohanlal"], 3);
        assert_eq!(lookup.lookup_count("The Godfather").await, 5);
    }

    #[tokio::test]
    async fn test_bounded_retries_mark_movie_failed() {
        let (movies, casts) = fixtures::shawshank_catalog();
        let lookup = MockCastLookup::with_casts(casts);
        lookup.fail_with_timeouts("Shawshank Ascension IV", 100).await;

        let config = AggregatorConfig::default().with_max_retries(2);
        let report = aggregator(&lookup, config).aggregate(&movies).await;

        assert!(report.complete);
        assert_eq!(report.movies_failed, 1);
        assert_eq!(report.movies_resolved, 5);
        assert_eq!(report.counts["Mammooty"], 2);
        assert_eq!(report.counts["Mohanlal"], 2);
        assert_eq!(lookup.lookup_count("Shawshank Ascension IV").await, 3);
    }

    #[tokio::test]
    async fn test_permanent_error_skips_movie() {
        let (movies, casts) = fixtures::shawshank_catalog();
        let lookup = MockCastLookup::with_casts(casts);
        lookup
            .set_error(
                "The Godfather",
                CatalogError::ApiError {
                    status: 500,
                    message: "Internal error".to_string(),
                },
            )
            .await;

        let report = aggregator(&lookup, AggregatorConfig::default())
            .aggregate(&movies)
            .await;

        assert!(report.complete);
        assert_eq!(report.movies_failed, 1);
        assert_eq!(report.counts["Johnny Depp"], 4);
        assert_eq!(lookup.lookup_count("The Godfather").await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_lookup_waits_between_retries() {
        let lookup = MockCastLookup::new();
        lookup.add_cast("Alien", fixtures::cast(&["Sigourney Weaver"])).await;
        lookup.set_error("Heat", CatalogError::RateLimitExceeded).await;

        let config = AggregatorConfig::default().with_deadline_secs(10);
        let movies = fixtures::titles(&["Heat", "Alien"]);
        let start = tokio::time::Instant::now();
        let report = aggregator(&lookup, config).aggregate(&movies).await;

        assert!(!report.complete);
        assert!(start.elapsed() >= Duration::from_secs(10));
        assert_eq!(report.counts["Sigourney Weaver"], 1);

        // One attempt per second of the run, then none after the deadline
        tokio::time::sleep(Duration::from_secs(5)).await;
        let attempts = lookup.lookup_count("Heat").await;
        assert!(attempts >= 10, "attempts: {}", attempts);
        assert!(attempts <= 11, "attempts: {}", attempts);
    }

    #[tokio::test]
    async fn test_worker_pool_is_bounded() {
        let (movies, casts) = fixtures::generated_catalog(40, 3, 15);
        let lookup = MockCastLookup::with_casts(casts);
        lookup.set_default_delay(Duration::from_millis(5)).await;

        let config = AggregatorConfig::default().with_concurrency(4);
        let report = aggregator(&lookup, config).aggregate(&movies).await;

        assert!(report.complete);
        assert_eq!(report.movies_resolved, 40);
        assert!(lookup.max_in_flight() <= 4);
        assert!(lookup.max_in_flight() >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_returns_partial_counts() {
        let (movies, casts) = fixtures::shawshank_catalog();
        let lookup = MockCastLookup::with_casts(casts);
        lookup.set_default_delay(Duration::from_millis(10)).await;
        lookup
            .set_delay("Shawshank Ascension IV", Duration::from_secs(3600))
            .await;

        let config = AggregatorConfig::default().with_deadline_secs(5);
        let report = aggregator(&lookup, config).aggregate(&movies).await;

        assert!(!report.complete);
        assert_eq!(report.movies_resolved, 5);
        assert_eq!(report.counts["Johnny Depp"], 5);
        assert_eq!(report.counts["Mohanlal"], 2);
        assert_eq!(report.counts["Mammooty"], 2);
        assert_eq!(report.counts["Stuart Little"], 1);
    }
}
