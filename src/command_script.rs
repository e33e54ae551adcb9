use std::{collections::VecDeque, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use wildstead_core::SimTick;

#[derive(Debug, Deserialize)]
struct ScriptFile {
    steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptStep {
    tick: u64,
    command: String,
}

/// Commands scheduled against simulation ticks.
///
/// A script is a JSON object `{"steps": [{"tick": n, "command": "/..."}]}` whose
/// steps must already be sorted by tick. Steps sharing a tick run in file order.
#[derive(Debug)]
pub struct CommandScript {
    pending: VecDeque<ScriptStep>,
}

impl CommandScript {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read command script {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid command script {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let file: ScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            bail!("command script contains no steps");
        }
        if file.steps.windows(2).any(|pair| pair[1].tick < pair[0].tick) {
            bail!("command script steps must be sorted by tick");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        for mut step in file.steps {
            step.command = step.command.trim().to_string();
            if step.command.is_empty() {
                bail!("command script has an empty command at tick {}", step.tick);
            }
            pending.push_back(step);
        }
        Ok(Self { pending })
    }

    /// Remove and return every command due at or before `tick`.
    pub fn due(&mut self, tick: SimTick) -> Vec<String> {
        let mut commands = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick.0) {
            if let Some(step) = self.pending.pop_front() {
                commands.push(step.command);
            }
        }
        commands
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}
