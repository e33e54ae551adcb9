#![warn(missing_docs)]
//! Deterministic testing surfaces (event stream, run summaries, tick traces).

mod micro_worldtest;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use wildstead_core::SimTick;

pub use micro_worldtest::*;

/// Primary event record captured by headless runs.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Event kind label (`chunk_generated`, `command`, ...).
    pub kind: &'a str,
    /// Structured payload.
    pub payload: Value,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: BufWriter<File>,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create event log {}", path.display()))?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    /// Flush buffered events to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

/// Read back every line of a JSONL event log.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read event log {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("line {} of {} is not JSON", index + 1, path.display()))
        })
        .collect()
}

/// End-of-run numbers for CI artifacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// World seed used for the run.
    pub seed: f64,
    /// Ticks simulated.
    pub ticks: u64,
    /// Chunks generated over the run, including the starting window.
    pub chunks_generated: usize,
    /// Chunks evicted over the run.
    pub chunks_evicted: usize,
    /// Largest live chunk count observed.
    pub peak_live_chunks: usize,
    /// Live chunks at the end.
    pub live_chunks: usize,
    /// Live resource nodes at the end.
    pub live_nodes: usize,
    /// Nodes harvested.
    pub harvested: usize,
    /// Day counter at the end.
    pub day: u32,
    /// Whether the player died.
    pub game_over: bool,
}

/// Writes a [`RunSummary`] as pretty JSON.
pub struct SummarySink {
    file: File,
}

impl SummarySink {
    /// Create a sink pointed at the supplied path, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the summary.
    pub fn write(&mut self, summary: &RunSummary) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        self.file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(stem: &str, ext: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "{stem}-{}.{ext}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn summary_sink_writes_file() {
        let path = temp_path("run-summary", "json");
        let summary = RunSummary {
            seed: 42.0,
            ticks: 600,
            chunks_generated: 49,
            peak_live_chunks: 49,
            live_chunks: 49,
            ..RunSummary::default()
        };
        let mut sink = SummarySink::create(&path).expect("sink create");
        sink.write(&summary).expect("write succeeds");
        let contents = fs::read_to_string(&path).expect("file readable");
        assert!(contents.contains("peak_live_chunks"));
        assert!(contents.contains("600"));
    }

    #[test]
    fn events_round_trip_through_jsonl() {
        let path = temp_path("events", "jsonl");
        let mut sink = JsonlSink::create(&path).expect("sink create");
        for tick in 0..3 {
            sink.write(&EventRecord {
                tick: SimTick(tick),
                kind: "chunk_generated",
                payload: json!({ "chunk": [tick, 0] }),
            })
            .expect("write succeeds");
        }
        sink.flush().expect("flush succeeds");

        let events = read_jsonl(&path).expect("log readable");
        assert_eq!(events.len(), 3);
        assert_eq!(events[2]["tick"], json!(2));
        assert_eq!(events[0]["kind"], json!("chunk_generated"));
        assert_eq!(events[1]["payload"]["chunk"], json!([1, 0]));
    }
}
