//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{ActorName, CastMember, MovieMatch, MovieTitle};
use super::{CastLookupProvider, CatalogError, MovieListProvider};

/// TMDB returns a fixed page size for list endpoints.
const TMDB_PAGE_SIZE: usize = 20;

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Response language, e.g. "en-US".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// How many top-rated titles to collect (default: 250).
    #[serde(default = "default_top_rated_limit")]
    pub top_rated_limit: usize,
}

fn default_timeout() -> u64 {
    30
}

fn default_top_rated_limit() -> usize {
    250
}

impl TmdbConfig {
    /// Config with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: default_timeout(),
            language: None,
            top_rated_limit: default_top_rated_limit(),
        }
    }
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
    top_rated_limit: usize,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            language: config.language,
            top_rated_limit: config.top_rated_limit,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("api_key", &self.api_key)]);

        if let Some(language) = &self.language {
            request = request.query(&[("language", language)]);
        }

        request
    }

    /// Send a request and decode a JSON body, mapping HTTP failures.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, what, body));
        }

        response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })
    }

    /// Fetch one page of the top rated movie list (1-indexed).
    pub async fn top_rated_page(
        &self,
        page: u32,
    ) -> Result<TmdbPage<TmdbMovieResult>, CatalogError> {
        debug!("TMDB top rated: page={}", page);

        let request = self.get("/movie/top_rated").query(&[("page", page)]);
        self.fetch(request, "top rated").await
    }

    /// Search for movies by title.
    pub async fn search_movies(&self, query: &str) -> Result<Vec<MovieMatch>, CatalogError> {
        debug!("TMDB movie search: query='{}'", query);

        let request = self.get("/search/movie").query(&[("query", query)]);
        let page: TmdbPage<TmdbMovieResult> = self.fetch(request, "movie search").await?;

        Ok(page.results.into_iter().map(|r| r.into()).collect())
    }

    /// Get the credited cast of a movie by TMDB ID, in billing order.
    pub async fn movie_cast(&self, tmdb_id: u32) -> Result<Vec<CastMember>, CatalogError> {
        debug!("TMDB movie credits: id={}", tmdb_id);

        let request = self.get(&format!("/movie/{}/credits", tmdb_id));
        let credits: TmdbCredits = self.fetch(request, "movie credits").await?;

        Ok(credits.into_cast())
    }
}

#[async_trait]
impl MovieListProvider for TmdbClient {
    fn name(&self) -> &str {
        "TMDB top rated"
    }

    async fn top_movies(&self) -> Result<Vec<MovieTitle>, CatalogError> {
        let mut collector = TopRatedCollector::new(self.top_rated_limit);
        let mut next = collector.wants_more().then_some(1);

        while let Some(page) = next {
            let response = self.top_rated_page(page).await?;
            next = collector.add_page(page, response);
        }

        Ok(collector.finish())
    }
}

#[async_trait]
impl CastLookupProvider for TmdbClient {
    async fn cast_members(&self, title: &str) -> Result<Option<Vec<ActorName>>, CatalogError> {
        let Some(best) = self.search_movies(title).await?.into_iter().next() else {
            return Ok(None);
        };

        debug!(
            "Best TMDB match for '{}': '{}' ({:?}, id={})",
            title,
            best.title,
            best.year(),
            best.id
        );

        let cast = self.movie_cast(best.id).await?;
        Ok(Some(cast.into_iter().map(|c| c.name).collect()))
    }
}

/// Accumulates top rated pages up to a title limit.
struct TopRatedCollector {
    titles: Vec<MovieTitle>,
    limit: usize,
}

impl TopRatedCollector {
    fn new(limit: usize) -> Self {
        Self {
            titles: Vec::with_capacity(limit),
            limit,
        }
    }

    fn wants_more(&self) -> bool {
        self.titles.len() < self.limit
    }

    /// Add the response for `requested` and return the next page to fetch.
    ///
    /// Stops on reaching the limit, on a short page or on the last page.
    fn add_page(&mut self, requested: u32, response: TmdbPage<TmdbMovieResult>) -> Option<u32> {
        let received = response.results.len();
        self.titles.extend(response.results.into_iter().map(|m| m.title));

        if !self.wants_more() || received < TMDB_PAGE_SIZE || requested >= response.total_pages {
            None
        } else {
            Some(requested + 1)
        }
    }

    fn finish(mut self) -> Vec<MovieTitle> {
        self.titles.truncate(self.limit);
        self.titles
    }
}

/// Map a non-success HTTP status to a catalog error.
fn status_error(status: StatusCode, what: &str, body: String) -> CatalogError {
    match status {
        StatusCode::UNAUTHORIZED => CatalogError::NotConfigured("Invalid TMDB API key".to_string()),
        StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimitExceeded,
        StatusCode::NOT_FOUND => CatalogError::NotFound(what.to_string()),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CatalogError::Timeout,
        _ => CatalogError::ApiError {
            status: status.as_u16(),
            message: body,
        },
    }
}

// ============================================================================
// TMDB API Response Types
// ============================================================================

/// A page of TMDB list/search results.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

/// A movie entry in TMDB list/search results.
#[derive(Debug, Deserialize)]
pub struct TmdbMovieResult {
    pub id: u32,
    pub title: String,
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCastResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbCastResult {
    name: String,
    character: Option<String>,
    #[serde(default)]
    order: u32,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<TmdbMovieResult> for MovieMatch {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            // TMDB sends "" for unknown dates
            release_date: r.release_date.filter(|d| !d.is_empty()),
        }
    }
}

impl TmdbCredits {
    fn into_cast(self) -> Vec<CastMember> {
        let mut cast: Vec<CastMember> = self
            .cast
            .into_iter()
            .map(|c| CastMember {
                name: c.name,
                character: c.character.filter(|s| !s.is_empty()),
                order: c.order,
            })
            .collect();
        cast.sort_by_key(|c| c.order);
        cast
    }
}
