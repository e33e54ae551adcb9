//! Boundary to the render collaborator.
//!
//! The world never draws anything. It announces what exists through
//! [`SceneSink::attach`] and withdraws it through [`SceneSink::detach`]; the
//! sink decides what a handle means.

use std::collections::BTreeMap;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use wildstead_core::{BuildingKind, NodeKind};

use crate::chunk::ChunkPos;
use crate::heightmap::Heightfield;

/// Opaque handle issued by a scene sink.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RenderHandle(pub u64);

/// Something the world asks the scene to show.
#[derive(Debug, Clone, Copy)]
pub enum Renderable<'a> {
    /// Terrain surface of a chunk, centred on its anchor.
    Terrain {
        chunk: ChunkPos,
        origin: DVec2,
        heightfield: &'a Heightfield,
    },
    /// Harvestable resource.
    Node { kind: NodeKind, position: DVec2 },
    /// Placed building piece.
    Building {
        kind: BuildingKind,
        position: DVec3,
        rotation: f64,
    },
}

/// What a [`Renderable`] was, kept after the borrow ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum RenderKind {
    Terrain { chunk: ChunkPos },
    Node { kind: NodeKind },
    Building { kind: BuildingKind },
}

impl From<&Renderable<'_>> for RenderKind {
    fn from(renderable: &Renderable<'_>) -> Self {
        match *renderable {
            Renderable::Terrain { chunk, .. } => RenderKind::Terrain { chunk },
            Renderable::Node { kind, .. } => RenderKind::Node { kind },
            Renderable::Building { kind, .. } => RenderKind::Building { kind },
        }
    }
}

/// Receives scene attach/detach calls.
pub trait SceneSink {
    /// Start showing `renderable`; the returned handle identifies it later.
    fn attach(&mut self, renderable: Renderable<'_>) -> RenderHandle;

    /// Stop showing a previously attached renderable.
    fn detach(&mut self, handle: RenderHandle);
}

/// Sink that hands out handles and otherwise ignores everything.
#[derive(Debug, Default)]
pub struct NullScene {
    next: u64,
}

impl SceneSink for NullScene {
    fn attach(&mut self, _renderable: Renderable<'_>) -> RenderHandle {
        let handle = RenderHandle(self.next);
        self.next += 1;
        handle
    }

    fn detach(&mut self, _handle: RenderHandle) {}
}

/// Sink that keeps the live handle set and call counters.
///
/// Used by tests and the headless runner to observe what the world would
/// have drawn.
#[derive(Debug, Default)]
pub struct RecordingScene {
    next: u64,
    live: BTreeMap<RenderHandle, RenderKind>,
    attached: u64,
    detached: u64,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles currently attached, with what they show.
    pub fn live(&self) -> &BTreeMap<RenderHandle, RenderKind> {
        &self.live
    }

    /// Whether `handle` is currently attached.
    pub fn is_live(&self, handle: RenderHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Total attach calls so far.
    pub fn attached(&self) -> u64 {
        self.attached
    }

    /// Total detach calls so far.
    pub fn detached(&self) -> u64 {
        self.detached
    }

    /// Live renderables matching a predicate.
    pub fn count_live(&self, predicate: impl Fn(&RenderKind) -> bool) -> usize {
        self.live.values().filter(|kind| predicate(kind)).count()
    }
}

impl SceneSink for RecordingScene {
    fn attach(&mut self, renderable: Renderable<'_>) -> RenderHandle {
        let handle = RenderHandle(self.next);
        self.next += 1;
        self.attached += 1;
        self.live.insert(handle, RenderKind::from(&renderable));
        handle
    }

    fn detach(&mut self, handle: RenderHandle) {
        let removed = self.live.remove(&handle);
        assert!(removed.is_some(), "detaching unknown handle {handle:?}");
        self.detached += 1;
    }
}
