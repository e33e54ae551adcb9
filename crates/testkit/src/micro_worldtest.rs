//! Micro-worldtest harness for deterministic, tick-based replay checks.
//!
//! A micro-worldtest steps a small simulation for a fixed number of ticks and
//! captures selected state each tick. Two runs that should be identical (same
//! seed, same inputs) are compared frame by frame through their JSON form, so
//! any drift in floating point output shows up as a mismatch.

use anyhow::{bail, Result};
use serde::Serialize;
use wildstead_core::SimTick;

/// Configuration for a micro-worldtest.
#[derive(Debug, Clone)]
pub struct MicroWorldtestConfig {
    /// Human-readable name (written into the report).
    pub name: String,
    /// Number of ticks to step (report includes the initial frame at tick 0).
    pub ticks: u64,
}

/// Single frame captured at a given tick.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Captured payload.
    pub snapshot: S,
}

/// Every frame of one run.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestReport<S> {
    /// Name from the config.
    pub name: String,
    /// Frames in tick order.
    pub frames: Vec<MicroWorldtestFrame<S>>,
}

/// Run a micro-worldtest and return its frames.
///
/// Captures the initial frame at tick 0, then steps `config.ticks` times,
/// capturing a frame after each step (so the report contains `ticks + 1` frames).
pub fn run_micro_worldtest<State, Snapshot, StepFn, SnapFn>(
    config: MicroWorldtestConfig,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> MicroWorldtestReport<Snapshot>
where
    Snapshot: Serialize,
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(config.ticks as usize + 1);

    let mut tick = SimTick::ZERO;
    frames.push(MicroWorldtestFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..config.ticks {
        step(tick, &mut state);
        tick = tick.advance(1);
        frames.push(MicroWorldtestFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    MicroWorldtestReport {
        name: config.name,
        frames,
    }
}

/// Fail with the first differing tick if two reports do not serialize identically.
pub fn assert_reports_match<S: Serialize>(
    expected: &MicroWorldtestReport<S>,
    actual: &MicroWorldtestReport<S>,
) -> Result<()> {
    if expected.frames.len() != actual.frames.len() {
        bail!(
            "{}: frame count differs ({} vs {})",
            actual.name,
            expected.frames.len(),
            actual.frames.len()
        );
    }
    for (left, right) in expected.frames.iter().zip(&actual.frames) {
        let left_json = serde_json::to_value(&left.snapshot)?;
        let right_json = serde_json::to_value(&right.snapshot)?;
        if left_json != right_json {
            bail!(
                "{}: tick {} differs\nexpected: {left_json}\nactual:   {right_json}",
                actual.name,
                left.tick
            );
        }
    }
    Ok(())
}
