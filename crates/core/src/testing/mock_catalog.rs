//! Mock movie list and cast lookup providers for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{ActorName, CastLookupProvider, CatalogError, MovieListProvider, MovieTitle};

/// Mock implementation of the MovieListProvider trait.
///
/// Returns a fixed list of titles, optionally failing a configured number of
/// times first.
#[derive(Debug, Clone, Default)]
pub struct MockMovieList {
    /// Titles to return.
    titles: Arc<RwLock<Vec<MovieTitle>>>,
    /// Errors returned, in order, before the titles are served.
    pending_errors: Arc<RwLock<VecDeque<CatalogError>>>,
    /// Number of `top_movies` calls.
    calls: Arc<AtomicUsize>,
}

impl MockMovieList {
    /// Create a new mock with no titles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock returning `titles`.
    pub fn with_titles(titles: Vec<MovieTitle>) -> Self {
        Self {
            titles: Arc::new(RwLock::new(titles)),
            ..Self::default()
        }
    }

    /// Replace the titles to return.
    pub async fn set_titles(&self, titles: Vec<MovieTitle>) {
        *self.titles.write().await = titles;
    }

    /// Fail the next `times` calls with `error`.
    pub async fn fail_next(&self, times: usize, error: CatalogError) {
        let mut pending = self.pending_errors.write().await;
        for _ in 0..times {
            pending.push_back(error.clone());
        }
    }

    /// How many times `top_movies` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieListProvider for MockMovieList {
    fn name(&self) -> &str {
        "mock"
    }

    async fn top_movies(&self) -> Result<Vec<MovieTitle>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.pending_errors.write().await.pop_front() {
            return Err(err);
        }

        Ok(self.titles.read().await.clone())
    }
}

/// Mock implementation of the CastLookupProvider trait.
///
/// Provides controllable behavior for testing:
/// - Return configured casts per title (unknown titles have no match)
/// - Time out a configured number of times per title
/// - Fail permanently for selected titles
/// - Delay lookups and track how many run at once
///
/// # Example
///
/// ```rust,ignore
/// use topactors_core::testing::{MockCastLookup, fixtures};
///
/// let lookup = MockCastLookup::new();
/// lookup.add_cast("Heat", fixtures::cast(&["Al Pacino", "Robert De Niro"])).await;
/// lookup.fail_with_timeouts("Heat", 2).await;
///
/// // Two timeouts, then the cast
/// assert!(lookup.cast_members("Heat").await.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCastLookup {
    /// Cast per title.
    casts: Arc<RwLock<HashMap<MovieTitle, Vec<ActorName>>>>,
    /// Remaining timeouts per title.
    timeouts: Arc<RwLock<HashMap<MovieTitle, u32>>>,
    /// Permanent errors per title.
    errors: Arc<RwLock<HashMap<MovieTitle, CatalogError>>>,
    /// Per-title lookup delay.
    delays: Arc<RwLock<HashMap<MovieTitle, Duration>>>,
    /// Delay for titles without their own.
    default_delay: Arc<RwLock<Duration>>,
    /// Every title looked up, in call order (retries included).
    lookups: Arc<RwLock<Vec<MovieTitle>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight counter when a lookup ends or is dropped.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockCastLookup {
    /// Create a new mock that matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with the given casts.
    pub fn with_casts(casts: HashMap<MovieTitle, Vec<ActorName>>) -> Self {
        Self {
            casts: Arc::new(RwLock::new(casts)),
            ..Self::default()
        }
    }

    /// Add or replace the cast for a title.
    pub async fn add_cast(&self, title: &str, cast: Vec<ActorName>) {
        self.casts.write().await.insert(title.to_string(), cast);
    }

    /// Time out the next `times` lookups of `title`.
    pub async fn fail_with_timeouts(&self, title: &str, times: u32) {
        self.timeouts.write().await.insert(title.to_string(), times);
    }

    /// Fail every lookup of `title` with `error`.
    pub async fn set_error(&self, title: &str, error: CatalogError) {
        self.errors.write().await.insert(title.to_string(), error);
    }

    /// Delay every lookup of `title`.
    pub async fn set_delay(&self, title: &str, delay: Duration) {
        self.delays.write().await.insert(title.to_string(), delay);
    }

    /// Delay lookups of titles without their own delay.
    pub async fn set_default_delay(&self, delay: Duration) {
        *self.default_delay.write().await = delay;
    }

    /// Every lookup made so far, in call order.
    pub async fn recorded_lookups(&self) -> Vec<MovieTitle> {
        self.lookups.read().await.clone()
    }

    /// Number of lookups made for `title`.
    pub async fn lookup_count(&self, title: &str) -> usize {
        self.lookups
            .read()
            .await
            .iter()
            .filter(|t| t.as_str() == title)
            .count()
    }

    /// Highest number of lookups observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CastLookupProvider for MockCastLookup {
    async fn cast_members(&self, title: &str) -> Result<Option<Vec<ActorName>>, CatalogError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        self.lookups.write().await.push(title.to_string());

        let delay = match self.delays.read().await.get(title) {
            Some(d) => *d,
            None => *self.default_delay.read().await,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        {
            let mut timeouts = self.timeouts.write().await;
            if let Some(remaining) = timeouts.get_mut(title) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(CatalogError::Timeout);
                }
            }
        }

        if let Some(err) = self.errors.read().await.get(title) {
            return Err(err.clone());
        }

        Ok(self.casts.read().await.get(title).cloned())
    }
}
