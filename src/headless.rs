use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, warn};
use wildstead_testkit::{EventRecord, JsonlSink, RunSummary, SummarySink};
use wildstead_world::{
    ChunkPos, RecipeBook, RecordingScene, SimTick, TickEvent, WorldConfig, WorldState,
};

use crate::command_script::CommandScript;
use crate::commands::{execute_command, parse_command};

/// Simulated seconds per tick.
pub const TICK_SECONDS: f64 = 1.0 / 60.0;

pub struct HeadlessConfig {
    pub world: WorldConfig,
    pub recipes: Option<PathBuf>,
    pub ticks: u64,
    pub command_script: Option<PathBuf>,
    pub event_log: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

/// Event log that may be switched off.
struct Events {
    sink: Option<JsonlSink>,
}

impl Events {
    fn write(&mut self, tick: SimTick, kind: &str, payload: serde_json::Value) -> Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.write(&EventRecord {
                tick,
                kind,
                payload,
            }),
            None => Ok(()),
        }
    }

    fn chunks(&mut self, tick: SimTick, kind: &str, chunks: &[ChunkPos]) -> Result<()> {
        for pos in chunks {
            self.write(tick, kind, json!({ "chunk": pos.key(), "x": pos.x, "z": pos.z }))?;
        }
        Ok(())
    }
}

/// Run the world for `cfg.ticks` fixed steps and return the run summary.
pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let recipes = match &cfg.recipes {
        Some(path) => RecipeBook::load_from_path(path)
            .with_context(|| format!("failed to load recipes from {}", path.display()))?,
        None => RecipeBook::builtin(),
    };
    let mut script = cfg
        .command_script
        .as_deref()
        .map(CommandScript::from_path)
        .transpose()?;
    let mut events = Events {
        sink: cfg.event_log.as_deref().map(JsonlSink::create).transpose()?,
    };

    let mut world = WorldState::new(cfg.world, recipes, RecordingScene::new())
        .context("invalid world configuration")?;
    info!(seed = world.seed().value(), ticks = cfg.ticks, "headless run starting");

    let initial: Vec<ChunkPos> = world.chunks().positions().collect();
    events.chunks(SimTick::ZERO, "chunk_generated", &initial)?;

    let mut summary = RunSummary {
        seed: world.seed().value(),
        chunks_generated: initial.len(),
        peak_live_chunks: initial.len(),
        ..RunSummary::default()
    };

    for _ in 0..cfg.ticks {
        let tick = world.current_tick().advance(1);

        if let Some(script) = script.as_mut() {
            for input in script.due(tick) {
                let nodes_before = world.nodes().len();
                let payload = match parse_command(&input) {
                    Ok(cmd) => {
                        let out = execute_command(&mut world, cmd);
                        json!({ "input": input, "output": out.lines })
                    }
                    Err(err) => {
                        warn!(%err, input = %input, "rejected scripted command");
                        json!({ "input": input, "error": err.to_string() })
                    }
                };
                summary.harvested += nodes_before.saturating_sub(world.nodes().len());
                events.write(tick, "command", payload)?;
            }
        }

        let report = world.tick(TICK_SECONDS);
        events.chunks(tick, "chunk_generated", &report.stream.generated)?;
        events.chunks(tick, "chunk_evicted", &report.stream.evicted)?;
        summary.chunks_generated += report.stream.generated.len();
        summary.chunks_evicted += report.stream.evicted.len();
        summary.peak_live_chunks = summary.peak_live_chunks.max(world.chunks().len());

        for event in &report.events {
            match event {
                TickEvent::DayStarted { day } => {
                    events.write(tick, "day", json!({ "day": day }))?;
                }
                TickEvent::GameOver { days_survived } => {
                    events.write(tick, "game_over", json!({ "days_survived": days_survived }))?;
                }
            }
        }
    }

    if let Some(script) = &script {
        if !script.is_finished() {
            warn!(remaining = script.remaining(), "run ended before the command script finished");
        }
    }
    if let Some(sink) = events.sink.as_mut() {
        sink.flush()?;
    }

    summary.ticks = world.current_tick().0;
    summary.live_chunks = world.chunks().len();
    summary.live_nodes = world.nodes().len();
    summary.day = world.clock().day;
    summary.game_over = world.is_game_over();

    if let Some(path) = &cfg.summary {
        SummarySink::create(path)?.write(&summary)?;
    }
    info!(
        ticks = summary.ticks,
        generated = summary.chunks_generated,
        evicted = summary.chunks_evicted,
        "headless run finished"
    );
    Ok(summary)
}
