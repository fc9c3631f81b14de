//! LifeSim batch runner
//!
//! Plays many lives on autopilot in parallel and reports how they went.
//! Usage: `lifesim [runner_config.json] [sim_config.json]`

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use simulation::autopilot::{self, BatchSummary};
use simulation::{RunnerConfig, SimConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn log_level() -> Level {
    match std::env::var("LIFESIM_LOG").as_deref() {
        Ok("trace") => Level::TRACE,
        Ok("debug") => Level::DEBUG,
        Ok("warn") => Level::WARN,
        Ok("error") => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("LifeSim batch runner starting...");

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let runner = match args.next() {
        Some(path) => RunnerConfig::from_file(&path)
            .with_context(|| format!("loading runner config {}", path.display()))?,
        None => RunnerConfig::builtin().context("loading builtin runner config")?,
    };
    let sim = match args.next() {
        Some(path) => SimConfig::from_file(&path)
            .with_context(|| format!("loading sim config {}", path.display()))?,
        None => SimConfig::builtin().clone(),
    };

    info!(lives = runner.lives, seed = runner.base_seed, "simulating");
    let start = Instant::now();
    let lives = autopilot::run_batch(&runner, &sim).context("batch run failed")?;
    let elapsed = start.elapsed();

    for life in lives.iter().filter_map(|l| l.obituary.as_ref()) {
        info!(
            name = %life.name,
            age = life.age,
            cause = %life.cause,
            lifetime_happiness = life.lifetime_happiness,
            score = life.score,
            "obituary"
        );
    }

    let summary = BatchSummary::from_lives(&lives);
    info!(
        "Batch complete: {} lives in {:?}, {} died, mean score {:.1}, mean lifespan {:.1}",
        summary.lives, elapsed, summary.deaths, summary.mean_score, summary.mean_lifespan
    );
    for (cause, count) in &summary.causes {
        info!("  {cause}: {count}");
    }

    Ok(())
}
