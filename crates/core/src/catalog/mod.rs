//! Movie catalog providers.
//!
//! This module defines the two collaborators the aggregation engine talks to:
//! a source of top-rated movie titles and a per-title cast lookup. The
//! TMDB client implements both.

mod tmdb;
mod types;

pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::retry::RetryPolicy;

/// Errors that can occur when querying a movie catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Could not connect to the catalog.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed for another reason.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Whether the failure is worth retrying as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Timeout | CatalogError::RateLimitExceeded)
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else if e.is_connect() {
            CatalogError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            CatalogError::ParseError(e.to_string())
        } else {
            CatalogError::HttpError(e.to_string())
        }
    }
}

/// Source of the ordered list of candidate movie titles.
#[async_trait]
pub trait MovieListProvider: Send + Sync {
    /// Provider name, used in log output.
    fn name(&self) -> &str;

    /// Fetch the ordered list of top movie titles.
    async fn top_movies(&self) -> Result<Vec<MovieTitle>, CatalogError>;
}

/// Per-title cast lookup.
#[async_trait]
pub trait CastLookupProvider: Send + Sync {
    /// Look up the cast of the best match for `title`.
    ///
    /// Returns `Ok(None)` when nothing matches the title.
    async fn cast_members(&self, title: &str) -> Result<Option<Vec<ActorName>>, CatalogError>;
}

/// Fetch the top movie list, retrying transient failures per `policy`.
///
/// Non-transient errors are returned to the caller untouched.
pub async fn fetch_top_movies(
    provider: &dyn MovieListProvider,
    policy: &RetryPolicy,
) -> Result<Vec<MovieTitle>, CatalogError> {
    info!("Querying {} for top movies...", provider.name());

    let movies = policy
        .run("top movie list", None, || provider.top_movies())
        .await?;

    info!("Received {} top movies from {}", movies.len(), provider.name());
    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockMovieList;

    #[test]
    fn test_transient_errors() {
        assert!(CatalogError::Timeout.is_transient());
        assert!(CatalogError::RateLimitExceeded.is_transient());
        assert!(!CatalogError::NotFound("x".to_string()).is_transient());
        assert!(!CatalogError::ConnectionFailed("refused".to_string()).is_transient());
        assert!(!CatalogError::ApiError {
            status: 500,
            message: "boom".to_string()
        }
        .is_transient());
    }

    #[tokio::test]
    async fn test_fetch_top_movies_retries_timeouts() {
        let provider = MockMovieList::with_titles(vec!["Heat".to_string(), "Alien".to_string()]);
        provider.fail_next(3, CatalogError::Timeout).await;

        let movies = fetch_top_movies(&provider, &RetryPolicy::unbounded())
            .await
            .unwrap();

        assert_eq!(movies, vec!["Heat", "Alien"]);
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_fetch_top_movies_propagates_fatal_error() {
        let provider = MockMovieList::with_titles(vec!["Heat".to_string()]);
        provider
            .fail_next(1, CatalogError::NotConfigured("Invalid TMDB API key".to_string()))
            .await;

        let err = fetch_top_movies(&provider, &RetryPolicy::unbounded())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotConfigured(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_top_movies_bounded_retry_gives_up() {
        let provider = MockMovieList::with_titles(vec!["Heat".to_string()]);
        provider.fail_next(10, CatalogError::Timeout).await;

        let policy = RetryPolicy::unbounded().with_max_retries(2);
        let err = fetch_top_movies(&provider, &policy).await.unwrap_err();

        assert_eq!(err, CatalogError::Timeout);
        assert_eq!(provider.call_count(), 3);
    }
}
