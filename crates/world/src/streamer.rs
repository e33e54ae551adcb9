//! Streaming window of live chunks around the player.
//!
//! Chunks inside the render distance (square radius, inclusive) are generated
//! when the player's chunk changes; chunks more than one ring beyond it are
//! evicted. The extra ring keeps a player pacing along a border from
//! regenerating the same chunks every crossing.

use glam::DVec3;
use serde::Serialize;
use tracing::{debug, instrument};
use wildstead_core::WorldSeed;

use crate::chunk::{Chunk, ChunkPos};
use crate::config::WorldConfig;
use crate::heightmap::TerrainSynthesizer;
use crate::node::InteractionRegistry;
use crate::populate::ChunkPopulator;
use crate::scene::{Renderable, SceneSink};
use crate::storage::ChunkRegistry;

/// Chunks generated and evicted by one streaming update, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamReport {
    pub generated: Vec<ChunkPos>,
    pub evicted: Vec<ChunkPos>,
}

impl StreamReport {
    /// Whether the update did nothing.
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty() && self.evicted.is_empty()
    }
}

/// Owns the live chunk registry and keeps it centred on the player.
#[derive(Debug)]
pub struct WorldStreamer {
    terrain: TerrainSynthesizer,
    populator: ChunkPopulator,
    chunks: ChunkRegistry,
    chunk_size: f64,
    render_distance: i32,
    last_chunk: Option<ChunkPos>,
}

impl WorldStreamer {
    pub fn new(seed: WorldSeed, config: &WorldConfig) -> Self {
        Self {
            terrain: TerrainSynthesizer::new(seed, config),
            populator: ChunkPopulator::new(seed, config),
            chunks: ChunkRegistry::new(),
            chunk_size: config.chunk_size,
            render_distance: config.render_distance,
            last_chunk: None,
        }
    }

    pub fn terrain(&self) -> &TerrainSynthesizer {
        &self.terrain
    }

    pub fn chunks(&self) -> &ChunkRegistry {
        &self.chunks
    }

    pub(crate) fn chunks_mut(&mut self) -> &mut ChunkRegistry {
        &mut self.chunks
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    /// Chunk the player occupied at the last refresh.
    pub fn last_chunk(&self) -> Option<ChunkPos> {
        self.last_chunk
    }

    /// Generate the full window around `player` regardless of the last chunk.
    pub fn prime(
        &mut self,
        player: DVec3,
        scene: &mut dyn SceneSink,
        nodes: &mut InteractionRegistry,
    ) -> StreamReport {
        let current = ChunkPos::from_world(player, self.chunk_size);
        self.refresh(current, scene, nodes)
    }

    /// Per-tick update. Does nothing unless the player changed chunk.
    pub fn update(
        &mut self,
        player: DVec3,
        scene: &mut dyn SceneSink,
        nodes: &mut InteractionRegistry,
    ) -> StreamReport {
        let current = ChunkPos::from_world(player, self.chunk_size);
        if self.last_chunk == Some(current) {
            return StreamReport::default();
        }
        self.refresh(current, scene, nodes)
    }

    #[instrument(skip(self, scene, nodes), fields(center = %center))]
    fn refresh(
        &mut self,
        center: ChunkPos,
        scene: &mut dyn SceneSink,
        nodes: &mut InteractionRegistry,
    ) -> StreamReport {
        let mut report = StreamReport::default();

        for pos in center.square(self.render_distance) {
            if self.generate_chunk(pos, scene, nodes) {
                report.generated.push(pos);
            }
        }

        let keep = self.render_distance + 1;
        let stale: Vec<ChunkPos> = self
            .chunks
            .positions()
            .filter(|pos| pos.chebyshev_distance(center) > keep)
            .collect();
        for pos in stale {
            self.evict_chunk(pos, scene, nodes);
            report.evicted.push(pos);
        }

        self.last_chunk = Some(center);
        debug!(
            generated = report.generated.len(),
            evicted = report.evicted.len(),
            live = self.chunks.len(),
            "streaming window refreshed"
        );
        report
    }

    /// Generate and register one chunk. A live coordinate is left untouched.
    pub fn generate_chunk(
        &mut self,
        pos: ChunkPos,
        scene: &mut dyn SceneSink,
        nodes: &mut InteractionRegistry,
    ) -> bool {
        if self.chunks.contains(pos) {
            return false;
        }

        let heightfield = self.terrain.generate(pos);
        let terrain = scene.attach(Renderable::Terrain {
            chunk: pos,
            origin: pos.origin(self.chunk_size),
            heightfield: &heightfield,
        });
        let mut chunk = Chunk::new(pos, heightfield, terrain);

        for spawn in self.populator.populate(pos) {
            let render = scene.attach(Renderable::Node {
                kind: spawn.kind,
                position: spawn.position,
            });
            chunk.push_node(nodes.register(spawn, pos, render));
        }

        debug!(chunk_pos = %pos, nodes = chunk.nodes().len(), "chunk generated");
        self.chunks.insert(chunk)
    }

    /// Tear down a live chunk: detach its nodes and terrain, then drop it.
    ///
    /// # Panics
    /// Panics if `pos` is not live.
    pub fn evict_chunk(
        &mut self,
        pos: ChunkPos,
        scene: &mut dyn SceneSink,
        nodes: &mut InteractionRegistry,
    ) {
        let Some(chunk) = self.chunks.remove(pos) else {
            panic!("evicting chunk {pos} that is not live");
        };
        for id in chunk.nodes() {
            if let Some(node) = nodes.unregister(*id) {
                scene.detach(node.render);
            }
        }
        scene.detach(chunk.terrain());
        debug!(chunk_pos = %pos, "chunk evicted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{RecordingScene, RenderKind};

    fn config(render_distance: i32) -> WorldConfig {
        WorldConfig {
            render_distance,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn prime_generates_full_window() {
        let mut streamer = WorldStreamer::new(WorldSeed(10.0), &config(2));
        let mut scene = RecordingScene::new();
        let mut nodes = InteractionRegistry::new();

        let report = streamer.prime(DVec3::new(0.0, 2.0, 5.0), &mut scene, &mut nodes);
        assert_eq!(report.generated.len(), 25);
        assert!(report.evicted.is_empty());
        assert_eq!(streamer.chunks().len(), 25);
        assert_eq!(nodes.len(), 25 * 13);
        assert_eq!(
            scene.count_live(|kind| matches!(kind, RenderKind::Terrain { .. })),
            25
        );
        assert_eq!(scene.live().len(), 25 + 25 * 13);
    }

    #[test]
    fn sub_chunk_movement_is_a_no_op() {
        let mut streamer = WorldStreamer::new(WorldSeed(10.0), &config(1));
        let mut scene = RecordingScene::new();
        let mut nodes = InteractionRegistry::new();
        streamer.prime(DVec3::ZERO, &mut scene, &mut nodes);
        let attached = scene.attached();

        let report = streamer.update(DVec3::new(20.0, 0.0, -20.0), &mut scene, &mut nodes);
        assert!(report.is_empty());
        assert_eq!(scene.attached(), attached);
        assert_eq!(scene.detached(), 0);
    }

    #[test]
    fn eviction_detaches_everything_the_chunk_owned() {
        let mut streamer = WorldStreamer::new(WorldSeed(3.0), &config(0));
        let mut scene = RecordingScene::new();
        let mut nodes = InteractionRegistry::new();
        streamer.prime(DVec3::ZERO, &mut scene, &mut nodes);

        // Two chunks east: origin is beyond render distance + 1.
        let report = streamer.update(DVec3::new(100.0, 0.0, 0.0), &mut scene, &mut nodes);
        assert_eq!(report.generated, vec![ChunkPos::new(2, 0)]);
        assert_eq!(report.evicted, vec![ChunkPos::new(0, 0)]);
        assert_eq!(streamer.chunks().len(), 1);
        assert_eq!(scene.live().len(), 1 + 13);
        assert!(nodes.iter().all(|node| node.chunk == ChunkPos::new(2, 0)));
    }

    #[test]
    fn hysteresis_ring_is_kept() {
        let mut streamer = WorldStreamer::new(WorldSeed(3.0), &config(0));
        let mut scene = RecordingScene::new();
        let mut nodes = InteractionRegistry::new();
        streamer.prime(DVec3::ZERO, &mut scene, &mut nodes);

        let report = streamer.update(DVec3::new(60.0, 0.0, 0.0), &mut scene, &mut nodes);
        assert_eq!(report.generated, vec![ChunkPos::new(1, 0)]);
        assert!(report.evicted.is_empty());

        let back = streamer.update(DVec3::new(10.0, 0.0, 0.0), &mut scene, &mut nodes);
        assert!(back.generated.is_empty());
        assert!(back.evicted.is_empty());
        assert_eq!(streamer.last_chunk(), Some(ChunkPos::new(0, 0)));
    }

    #[test]
    fn generating_a_live_chunk_is_ignored() {
        let mut streamer = WorldStreamer::new(WorldSeed(3.0), &config(0));
        let mut scene = RecordingScene::new();
        let mut nodes = InteractionRegistry::new();
        assert!(streamer.generate_chunk(ChunkPos::new(4, 4), &mut scene, &mut nodes));
        let attached = scene.attached();
        assert!(!streamer.generate_chunk(ChunkPos::new(4, 4), &mut scene, &mut nodes));
        assert_eq!(scene.attached(), attached);
    }

    #[test]
    #[should_panic(expected = "not live")]
    fn evicting_a_dead_chunk_panics() {
        let mut streamer = WorldStreamer::new(WorldSeed(3.0), &config(0));
        let mut scene = RecordingScene::new();
        let mut nodes = InteractionRegistry::new();
        streamer.evict_chunk(ChunkPos::new(9, 9), &mut scene, &mut nodes);
    }
}
