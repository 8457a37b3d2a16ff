//! Concurrent cast aggregation.
//!
//! Fans out one cast lookup per movie across a bounded pool of workers and
//! counts, per actor, how many movies they appear in.

mod config;
mod runner;
mod types;

pub use config::AggregatorConfig;
pub use runner::Aggregator;
pub use types::{ActorCounts, AggregateMap, AggregateReport, Tally};
