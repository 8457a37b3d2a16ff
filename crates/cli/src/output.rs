//! Leaderboard rendering.

use anyhow::Result;

use topactors_core::{OutputConfig, OutputFormat, RankedEntry};

/// Render the leaderboard in the configured format.
pub fn render(ranked: &[RankedEntry], config: &OutputConfig) -> Result<String> {
    let shown = match config.limit {
        Some(limit) => &ranked[..limit.min(ranked.len())],
        None => ranked,
    };

    match config.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(shown)?),
        OutputFormat::Table => Ok(render_table(shown)),
    }
}

fn render_table(ranked: &[RankedEntry]) -> String {
    let actor_width = ranked
        .iter()
        .map(|e| e.actor.chars().count())
        .max()
        .unwrap_or(0)
        .max("ACTOR".len());

    let mut out = format!("{:>4}  {:<actor_width$}  {:>5}\n", "RANK", "ACTOR", "COUNT");
    for e in ranked {
        out.push_str(&format!(
            "{:>4}  {:<actor_width$}  {:>5}\n",
            e.rank, e.actor, e.count
        ));
    }
    out
}
