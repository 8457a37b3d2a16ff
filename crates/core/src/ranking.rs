//! Standard competition ranking of actor counts.
//!
//! Actors are ordered by appearance count, highest first. Equal counts are
//! ordered by actor name (ascending, byte-wise) so the output is the same on
//! every run. Tied actors share a rank and the next distinct count takes its
//! 1-based position, so 5, 3, 3, 1 ranks as 1, 2, 2, 4.

use serde::{Deserialize, Serialize};

use crate::aggregator::AggregateMap;
use crate::catalog::ActorName;

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub actor: ActorName,
    pub count: u32,
    /// 1-based competition rank.
    pub rank: usize,
}

/// Actor counts ordered by count descending, then name ascending.
pub fn sort_by_count(counts: &AggregateMap) -> Vec<(ActorName, u32)> {
    let mut sorted: Vec<(ActorName, u32)> = counts
        .iter()
        .map(|(actor, count)| (actor.clone(), *count))
        .collect();
    sorted.sort_by(|(a_name, a_count), (b_name, b_count)| {
        b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
    });
    sorted
}

/// Assign competition ranks to pairs already sorted by count descending.
pub fn assign_ranks<I>(sorted: I) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = (ActorName, u32)>,
{
    let mut ranked: Vec<RankedEntry> = Vec::new();

    for (actor, count) in sorted {
        let rank = match ranked.last() {
            Some(prev) if prev.count == count => prev.rank,
            _ => ranked.len() + 1,
        };
        ranked.push(RankedEntry { actor, count, rank });
    }

    ranked
}

/// Rank every actor in `counts`.
pub fn rank(counts: &AggregateMap) -> Vec<RankedEntry> {
    assign_ranks(sort_by_count(counts))
}
