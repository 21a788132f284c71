use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use pick_status::config::Config;
use pick_status::engine::teams::{NoDirectory, TeamDirectory};
use pick_status::feed::{
    load_picks, load_team_directory, start_pick_monitor, JsonFilePickSource, PickSource,
};
use pick_status::{summarize, PickEngine};

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries JSON only.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let directory: Arc<dyn TeamDirectory> = match config.teams_path.as_deref() {
        Some(path) => {
            let dir = load_team_directory(path)
                .await
                .context("Failed to load team directory")?;
            info!("Team directory loaded: {} entries from {}", dir.len(), path);
            Arc::new(dir)
        }
        None => Arc::new(NoDirectory),
    };

    let policy = config.live_policy.policy();
    info!("Live policy: {}", policy.name);
    let engine = PickEngine::new(directory, policy);

    if !config.watch {
        let records = load_picks(&config.picks_path)
            .await
            .context("Failed to load picks")?;
        let outcomes = engine.evaluate_all(&records);
        info!(
            "Evaluated {} pick(s): {:?}",
            outcomes.len(),
            summarize(&outcomes)
        );
        println!("{}", to_json(&outcomes, config.pretty)?);
        return Ok(());
    }

    let sources: Vec<Arc<dyn PickSource>> =
        vec![Arc::new(JsonFilePickSource::new(&config.picks_path))];
    let mut rx = start_pick_monitor(
        sources,
        Duration::from_secs(config.poll_interval_secs),
        engine,
    );

    loop {
        tokio::select! {
            change = rx.recv() => match change {
                Some(change) => println!("{}", to_json(&change, config.pretty)?),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}
