//! wildstead - A deterministic survival sandbox
//!
//! Headless simulation runner

mod command_script;
mod commands;
mod config;
mod headless;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use headless::HeadlessConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a wildstead world headless", long_about = None)]
struct Args {
    /// World configuration file (TOML)
    #[arg(long, default_value = config::DEFAULT_WORLD_CONFIG_PATH)]
    config: PathBuf,
    /// World seed, overriding the config file
    #[arg(long)]
    seed: Option<f64>,
    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Chunk radius kept generated around the player
    #[arg(long)]
    render_distance: Option<i32>,
    /// Recipe and building book (JSON), replacing the built-in one
    #[arg(long)]
    recipes: Option<PathBuf>,
    /// Command script (JSON list of `{tick, command}` steps)
    #[arg(long)]
    script: Option<PathBuf>,
    /// Write JSONL events here
    #[arg(long)]
    event_log: Option<PathBuf>,
    /// Write the end-of-run summary here
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    // WARN by default, overridable via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting wildstead v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut world = config::load_world_config_from_path(&args.config);
    if let Some(seed) = args.seed {
        world.seed = Some(seed);
    }
    if let Some(render_distance) = args.render_distance {
        world.render_distance = render_distance;
    }

    let summary = headless::run(HeadlessConfig {
        world,
        recipes: args.recipes,
        ticks: args.ticks,
        command_script: args.script,
        event_log: args.event_log,
        summary: args.summary,
    })?;

    println!(
        "seed {} | {} ticks | day {} | chunks {} live, {} generated, {} evicted | {} harvested{}",
        summary.seed,
        summary.ticks,
        summary.day,
        summary.live_chunks,
        summary.chunks_generated,
        summary.chunks_evicted,
        summary.harvested,
        if summary.game_over { " | game over" } else { "" }
    );
    Ok(())
}
