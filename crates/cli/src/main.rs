mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use topactors_core::{load_config, validate_config, TmdbClient, TopActors};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so stdout carries only the leaderboard
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::env::var("TOPACTORS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!(
        "Concurrency: {}, deadline: {}s",
        config.aggregator.concurrency, config.aggregator.deadline_secs
    );

    let tmdb = Arc::new(
        TmdbClient::new(config.tmdb.clone()).context("Failed to create TMDB client")?,
    );
    info!("Using TMDB at {}", tmdb.base_url());

    let top = TopActors::new(tmdb.clone(), tmdb, config.aggregator.clone());

    let report = top
        .aggregate()
        .await
        .context("Failed to fetch the top movie list")?;
    if !report.complete {
        warn!(
            "Deadline reached, leaderboard covers {} of {} movies",
            report.movies_processed(),
            report.movies_total
        );
    }

    let ranked = top.rank_actors().await?;
    let rendered = output::render(&ranked, &config.output)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }

    Ok(())
}
