//! Terrain heightfield synthesis.
//!
//! Every sample is seeded from its world-space position, never from the chunk
//! that happens to own it, so two chunks sharing a border compute the shared
//! vertices from identical inputs and agree bit-for-bit.

use glam::DVec3;
use tracing::{debug, instrument};
use wildstead_core::{SeededRandom, WorldSeed};

use crate::chunk::ChunkPos;
use crate::config::WorldConfig;

/// Precision factor applied to world coordinates before flooring into a seed.
const VERTEX_PRECISION: f64 = 10.0;

/// Weight that separates the z component of a vertex seed from the x component.
const VERTEX_Z_WEIGHT: f64 = 1000.0;

/// Border of a heightfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Row at the lowest z
    North,
    /// Row at the highest z
    South,
    /// Column at the lowest x
    West,
    /// Column at the highest x
    East,
}

/// Height samples for one chunk.
///
/// Samples are stored row-major, z then x, with `segments + 1` samples per
/// edge so that border vertices are duplicated between neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    segments: u32,
    step: f64,
    heights: Vec<f64>,
}

impl Heightfield {
    /// Heightfield with every sample at `height`.
    pub fn flat(segments: u32, height: f64) -> Self {
        let edge = segments as usize + 1;
        Self {
            segments,
            step: 1.0,
            heights: vec![height; edge * edge],
        }
    }

    /// Subdivisions per edge.
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Samples per edge.
    pub fn samples_per_edge(&self) -> usize {
        self.segments as usize + 1
    }

    /// World-space distance between neighbouring samples.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Raw samples, row-major (z then x).
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Height at local sample `(ix, iz)`.
    ///
    /// # Panics
    /// Panics if either index is beyond `segments`.
    pub fn get(&self, ix: usize, iz: usize) -> f64 {
        let edge = self.samples_per_edge();
        assert!(ix < edge, "ix out of bounds");
        assert!(iz < edge, "iz out of bounds");
        self.heights[iz * edge + ix]
    }

    /// Samples along one border, in increasing x (rows) or z (columns).
    pub fn edge(&self, edge: Edge) -> Vec<f64> {
        let last = self.segments as usize;
        let range = 0..self.samples_per_edge();
        match edge {
            Edge::North => range.map(|ix| self.get(ix, 0)).collect(),
            Edge::South => range.map(|ix| self.get(ix, last)).collect(),
            Edge::West => range.map(|iz| self.get(0, iz)).collect(),
            Edge::East => range.map(|iz| self.get(last, iz)).collect(),
        }
    }

    /// Unit surface normal at a sample, from central differences.
    ///
    /// Border samples fall back to one-sided differences.
    pub fn normal(&self, ix: usize, iz: usize) -> DVec3 {
        let last = self.segments as usize;
        let (x0, x1) = (ix.saturating_sub(1), (ix + 1).min(last));
        let (z0, z1) = (iz.saturating_sub(1), (iz + 1).min(last));
        let dx = (self.get(x1, iz) - self.get(x0, iz)) / ((x1 - x0) as f64 * self.step);
        let dz = (self.get(ix, z1) - self.get(ix, z0)) / ((z1 - z0) as f64 * self.step);
        DVec3::new(-dx, 1.0, -dz).normalize()
    }

    /// Normals for every sample, in the same order as [`Heightfield::heights`].
    pub fn normals(&self) -> Vec<DVec3> {
        let edge = self.samples_per_edge();
        (0..edge)
            .flat_map(|iz| (0..edge).map(move |ix| (ix, iz)))
            .map(|(ix, iz)| self.normal(ix, iz))
            .collect()
    }

    /// Lowest sample.
    pub fn min_height(&self) -> f64 {
        self.heights.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Highest sample.
    pub fn max_height(&self) -> f64 {
        self.heights.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Produces heightfields for chunk coordinates.
#[derive(Debug, Clone)]
pub struct TerrainSynthesizer {
    seed: WorldSeed,
    chunk_size: f64,
    segments: u32,
    height_min: f64,
    height_max: f64,
}

impl TerrainSynthesizer {
    pub fn new(seed: WorldSeed, config: &WorldConfig) -> Self {
        Self {
            seed,
            chunk_size: config.chunk_size,
            segments: config.terrain_segments,
            height_min: config.height_min,
            height_max: config.height_max,
        }
    }

    /// Distance between neighbouring samples.
    pub fn step(&self) -> f64 {
        self.chunk_size / f64::from(self.segments)
    }

    /// World coordinate of a global lattice line.
    ///
    /// Lattice line `cx * segments` is the low border of chunk `cx`, which sits
    /// half a chunk below the chunk's centre anchor.
    pub fn lattice_coordinate(&self, index: i64) -> f64 {
        index as f64 * self.step() - self.chunk_size / 2.0
    }

    /// Seed of the vertex at world `(x, z)`.
    pub fn vertex_seed(&self, world_x: f64, world_z: f64) -> f64 {
        self.seed.value()
            + (world_x * VERTEX_PRECISION).floor()
            + (world_z * VERTEX_PRECISION).floor() * VERTEX_Z_WEIGHT
    }

    /// Terrain height at world `(x, z)`, independent of any chunk.
    pub fn height_at(&self, world_x: f64, world_z: f64) -> f64 {
        let r = SeededRandom::new(self.vertex_seed(world_x, world_z)).next_f64();
        self.height_min + r * (self.height_max - self.height_min)
    }

    /// Synthesize the heightfield of one chunk.
    #[instrument(skip(self), fields(chunk_pos = %pos, world_seed = self.seed.value()))]
    pub fn generate(&self, pos: ChunkPos) -> Heightfield {
        let segments = i64::from(self.segments);
        let edge = self.segments as usize + 1;
        let base_x = i64::from(pos.x) * segments;
        let base_z = i64::from(pos.z) * segments;

        let mut heights = Vec::with_capacity(edge * edge);
        for iz in 0..=segments {
            let world_z = self.lattice_coordinate(base_z + iz);
            for ix in 0..=segments {
                let world_x = self.lattice_coordinate(base_x + ix);
                heights.push(self.height_at(world_x, world_z));
            }
        }

        let field = Heightfield {
            segments: self.segments,
            step: self.step(),
            heights,
        };
        debug!(
            min = field.min_height(),
            max = field.max_height(),
            "terrain synthesized"
        );
        field
    }
}

/// Whether two adjacent chunks agree exactly along their shared border.
///
/// # Panics
/// Panics if the chunks are not edge-adjacent.
pub fn seams_match(terrain: &TerrainSynthesizer, a: ChunkPos, b: ChunkPos) -> bool {
    let (a_edge, b_edge) = match (b.x - a.x, b.z - a.z) {
        (1, 0) => (Edge::East, Edge::West),
        (-1, 0) => (Edge::West, Edge::East),
        (0, 1) => (Edge::South, Edge::North),
        (0, -1) => (Edge::North, Edge::South),
        _ => panic!("chunks {a} and {b} are not adjacent"),
    };
    let first = terrain.generate(a).edge(a_edge);
    let second = terrain.generate(b).edge(b_edge);
    first
        .iter()
        .zip(&second)
        .all(|(h1, h2)| h1.to_bits() == h2.to_bits())
}
