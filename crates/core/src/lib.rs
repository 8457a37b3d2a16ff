//! Ranks actors by how many top-rated movies they appear in.

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod ranking;
pub mod retry;
pub mod testing;
pub mod top_actors;

pub use aggregator::{AggregateMap, AggregateReport, Aggregator, AggregatorConfig};
pub use catalog::{
    fetch_top_movies, ActorName, CastLookupProvider, CatalogError, MovieListProvider, MovieTitle,
    TmdbClient, TmdbConfig,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, OutputConfig,
    OutputFormat,
};
pub use ranking::{rank, RankedEntry};
pub use retry::RetryPolicy;
pub use top_actors::TopActors;
