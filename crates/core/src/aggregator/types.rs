//! Aggregation types.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::catalog::ActorName;

/// Actor name to number of movies the actor appeared in.
pub type AggregateMap = HashMap<ActorName, u32>;

/// Actor appearance counts and per-movie outcomes at one point in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub counts: AggregateMap,
    pub resolved: usize,
    pub unmatched: usize,
    pub failed: usize,
}

/// Actor appearance counts shared by the aggregation workers.
///
/// Each movie outcome is recorded under a single write lock, so a snapshot
/// always holds whole movies and its outcome totals match its counts.
#[derive(Debug, Default)]
pub struct ActorCounts {
    tally: RwLock<Tally>,
}

impl ActorCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one appearance for every distinct actor in `cast`.
    pub async fn record_movie(&self, cast: &[ActorName]) {
        let distinct: HashSet<&str> = cast.iter().map(String::as_str).collect();

        let mut tally = self.tally.write().await;
        for actor in distinct {
            *tally.counts.entry(actor.to_string()).or_insert(0) += 1;
        }
        tally.resolved += 1;
    }

    /// Note a movie the catalog had no match for.
    pub async fn record_unmatched(&self) {
        self.tally.write().await.unmatched += 1;
    }

    /// Note a movie whose lookup failed permanently.
    pub async fn record_failed(&self) {
        self.tally.write().await.failed += 1;
    }

    /// Copy of the current counts and outcomes.
    pub async fn snapshot(&self) -> Tally {
        self.tally.read().await.clone()
    }
}

/// Result of an aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Appearance counts per actor.
    pub counts: AggregateMap,
    /// False when the deadline elapsed before every movie was processed.
    pub complete: bool,
    /// Number of movies submitted.
    pub movies_total: usize,
    /// Movies whose cast was found and counted.
    pub movies_resolved: usize,
    /// Movies the catalog had no match for.
    pub movies_unmatched: usize,
    /// Movies whose lookup failed permanently.
    pub movies_failed: usize,
    /// Transient failures that were retried.
    pub retries: u64,
}

impl AggregateReport {
    /// Report for a run with nothing to do.
    pub fn empty() -> Self {
        Self {
            complete: true,
            ..Self::default()
        }
    }

    pub(crate) fn from_tally(
        tally: Tally,
        complete: bool,
        movies_total: usize,
        retries: u64,
    ) -> Self {
        Self {
            counts: tally.counts,
            complete,
            movies_total,
            movies_resolved: tally.resolved,
            movies_unmatched: tally.unmatched,
            movies_failed: tally.failed,
            retries,
        }
    }

    /// Movies that finished one way or another before the snapshot.
    pub fn movies_processed(&self) -> usize {
        self.movies_resolved + self.movies_unmatched + self.movies_failed
    }
}
