//! Resource placement within a chunk.

use glam::DVec2;
use tracing::{debug, instrument};
use wildstead_core::{NodeKind, WorldSeed};

use crate::chunk::ChunkPos;
use crate::config::WorldConfig;

/// A node decided by the populator, not yet registered anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSpawn {
    pub kind: NodeKind,
    /// Ground-plane position (x, z).
    pub position: DVec2,
}

/// Places trees, rocks, bushes and animals inside a chunk footprint.
#[derive(Debug, Clone)]
pub struct ChunkPopulator {
    seed: WorldSeed,
    chunk_size: f64,
    spread: f64,
    counts: [(NodeKind, u32); 4],
}

impl ChunkPopulator {
    pub fn new(seed: WorldSeed, config: &WorldConfig) -> Self {
        Self {
            seed,
            chunk_size: config.chunk_size,
            spread: config.spread,
            counts: NodeKind::ALL.map(|kind| (kind, config.per_chunk(kind))),
        }
    }

    /// Objects of `kind` placed in every chunk.
    pub fn count(&self, kind: NodeKind) -> u32 {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, count)| *count)
    }

    /// Objects placed in every chunk across all categories.
    pub fn nodes_per_chunk(&self) -> usize {
        self.counts.iter().map(|(_, count)| *count as usize).sum()
    }

    /// Decide the nodes of one chunk.
    ///
    /// Categories are drawn in a fixed order from a single chunk-scoped
    /// stream, x before z for every object, so the result is a pure function
    /// of seed and coordinate.
    #[instrument(skip(self), fields(chunk_pos = %pos, world_seed = self.seed.value()))]
    pub fn populate(&self, pos: ChunkPos) -> Vec<NodeSpawn> {
        let mut rng = self.seed.chunk_stream(pos.x, pos.z);
        let origin = pos.origin(self.chunk_size);
        let extent = self.chunk_size * self.spread;

        let mut spawns = Vec::with_capacity(self.nodes_per_chunk());
        for (kind, count) in self.counts {
            for _ in 0..count {
                let x = origin.x + rng.next_centered() * extent;
                let z = origin.y + rng.next_centered() * extent;
                spawns.push(NodeSpawn {
                    kind,
                    position: DVec2::new(x, z),
                });
            }
        }
        debug!(count = spawns.len(), "chunk populated");
        spawns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildstead_core::SeededRandom;

    fn populator(seed: f64) -> ChunkPopulator {
        ChunkPopulator::new(WorldSeed(seed), &WorldConfig::default())
    }

    #[test]
    fn default_counts_per_chunk() {
        let populator = populator(1.0);
        assert_eq!(populator.count(NodeKind::Tree), 5);
        assert_eq!(populator.count(NodeKind::Rock), 3);
        assert_eq!(populator.count(NodeKind::Bush), 3);
        assert_eq!(populator.count(NodeKind::Animal), 2);
        assert_eq!(populator.nodes_per_chunk(), 13);
    }

    #[test]
    fn categories_come_in_fixed_order() {
        let spawns = populator(2.0).populate(ChunkPos::new(0, 0));
        let kinds: Vec<_> = spawns.iter().map(|s| s.kind).collect();
        let mut expected = vec![NodeKind::Tree; 5];
        expected.extend([NodeKind::Rock; 3]);
        expected.extend([NodeKind::Bush; 3]);
        expected.extend([NodeKind::Animal; 2]);
        assert_eq!(kinds, expected);
    }

    #[test]
    fn positions_stay_inside_spread_footprint() {
        let populator = populator(8181.0);
        for pos in ChunkPos::new(-2, 5).square(2) {
            let origin = pos.origin(50.0);
            for spawn in populator.populate(pos) {
                let offset = spawn.position - origin;
                assert!(offset.x.abs() <= 20.0 + 1e-9, "{spawn:?} outside {pos}");
                assert!(offset.y.abs() <= 20.0 + 1e-9, "{spawn:?} outside {pos}");
            }
        }
    }

    #[test]
    fn first_tree_uses_first_two_draws() {
        let seed = WorldSeed(64.0);
        let pos = ChunkPos::new(3, -1);
        let mut rng = SeededRandom::new(seed.value() + 3000.0 - 1.0);
        let extent = 50.0 * 0.8;
        let x = 150.0 + rng.next_centered() * extent;
        let z = -50.0 + rng.next_centered() * extent;

        let spawns = ChunkPopulator::new(seed, &WorldConfig::default()).populate(pos);
        assert_eq!(spawns[0].position, DVec2::new(x, z));
    }

    #[test]
    fn same_chunk_same_spawns() {
        let populator = populator(555.5);
        assert_eq!(
            populator.populate(ChunkPos::new(7, 7)),
            populator.populate(ChunkPos::new(7, 7))
        );
        assert_ne!(
            populator.populate(ChunkPos::new(7, 7)),
            populator.populate(ChunkPos::new(7, 8))
        );
    }

    #[test]
    fn zero_totals_place_nothing() {
        let config = WorldConfig {
            tree_total: 0,
            rock_total: 8,
            bush_total: 0,
            animal_total: 0,
            ..WorldConfig::default()
        };
        let populator = ChunkPopulator::new(WorldSeed(1.0), &config);
        assert!(populator.populate(ChunkPos::new(0, 0)).is_empty());
    }
}
