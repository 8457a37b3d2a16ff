//! Top actors leaderboard.
//!
//! Ties the pieces together: fetch the top movie list, aggregate cast
//! appearances across it and rank the result. Each step runs at most once
//! per `TopActors` instance.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::aggregator::{AggregateReport, Aggregator, AggregatorConfig};
use crate::catalog::{
    fetch_top_movies, ActorName, CastLookupProvider, CatalogError, MovieListProvider, MovieTitle,
};
use crate::ranking::{self, RankedEntry};
use crate::retry::RetryPolicy;

/// Finds the actors appearing most often across a catalog's top movies.
///
/// ```rust,ignore
/// let top = TopActors::new(tmdb.clone(), tmdb, AggregatorConfig::default());
/// let leaderboard = top.rank_actors().await?;
/// // [{ actor: "Johnny Depp", count: 5, rank: 1 }, { actor: "Mammooty", count: 3, rank: 2 }, ...]
/// ```
pub struct TopActors {
    movie_list: Arc<dyn MovieListProvider>,
    aggregator: Aggregator,
    retry: RetryPolicy,
    movies: OnceCell<Vec<MovieTitle>>,
    report: OnceCell<AggregateReport>,
}

impl TopActors {
    /// Create a new leaderboard over the given providers.
    pub fn new(
        movie_list: Arc<dyn MovieListProvider>,
        lookup: Arc<dyn CastLookupProvider>,
        config: AggregatorConfig,
    ) -> Self {
        let retry = config.retry_policy();

        Self {
            movie_list,
            aggregator: Aggregator::new(lookup, config),
            retry,
            movies: OnceCell::new(),
            report: OnceCell::new(),
        }
    }

    /// The top movie list, fetched once.
    pub async fn top_movies(&self) -> Result<&[MovieTitle], CatalogError> {
        let movies = self
            .movies
            .get_or_try_init(|| fetch_top_movies(self.movie_list.as_ref(), &self.retry))
            .await?;

        debug!("Top movies: {:?}", movies);
        Ok(movies)
    }

    /// Aggregated cast appearances across the top movies, computed once.
    pub async fn aggregate(&self) -> Result<&AggregateReport, CatalogError> {
        let movies = self.top_movies().await?;

        let report = self
            .report
            .get_or_init(|| self.aggregator.aggregate(movies))
            .await;
        Ok(report)
    }

    /// Actors with their appearance counts, most frequent first.
    pub async fn top_actors(&self) -> Result<Vec<(ActorName, u32)>, CatalogError> {
        let report = self.aggregate().await?;
        let actors = ranking::sort_by_count(&report.counts);

        debug!("Top actors: {:?}", actors);
        Ok(actors)
    }

    /// Actors ranked by standard competition ranking.
    pub async fn rank_actors(&self) -> Result<Vec<RankedEntry>, CatalogError> {
        Ok(ranking::assign_ranks(self.top_actors().await?))
    }
}
