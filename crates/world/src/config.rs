//! Static world configuration.
//!
//! Everything here is read-only once a [`crate::WorldState`] is built. Values
//! are validated up front so streaming never runs with a zero chunk size or a
//! negative radius.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wildstead_core::NodeKind;

use crate::chunk::ChunkPos;

/// Chunks the per-category totals are spread across (a 3x3 block).
pub const INITIAL_VISIBLE_CHUNKS: u32 = 9;

/// Largest accepted render distance.
pub const MAX_RENDER_DISTANCE: i32 = 32;

/// Largest accepted terrain subdivision count.
pub const MAX_TERRAIN_SEGMENTS: u32 = 256;

/// Tunables for generation, streaming and survival.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed world seed; a random one is drawn when absent.
    pub seed: Option<f64>,
    /// Edge length of a chunk in world units.
    pub chunk_size: f64,
    /// Square radius, in chunks, kept generated around the player.
    pub render_distance: i32,
    /// Terrain subdivisions per chunk edge.
    pub terrain_segments: u32,
    /// Lowest terrain height.
    pub height_min: f64,
    /// Highest terrain height.
    pub height_max: f64,
    /// Trees across the initially visible block of chunks.
    pub tree_total: u32,
    /// Rocks across the initially visible block of chunks.
    pub rock_total: u32,
    /// Bushes across the initially visible block of chunks.
    pub bush_total: u32,
    /// Animals across the initially visible block of chunks.
    pub animal_total: u32,
    /// Fraction of the chunk footprint that objects are scattered over.
    pub spread: f64,
    /// Maximum horizontal reach for harvesting.
    pub interaction_distance: f64,
    /// Ticks in one full day.
    pub day_length_ticks: u64,
    /// Where the player starts.
    pub start_position: [f64; 3],
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            chunk_size: 50.0,
            render_distance: 3,
            terrain_segments: 25,
            height_min: -0.3,
            height_max: 1.2,
            tree_total: 50,
            rock_total: 30,
            bush_total: 27,
            animal_total: 18,
            spread: 0.8,
            interaction_distance: 5.0,
            day_length_ticks: 10_000,
            start_position: [0.0, 2.0, 5.0],
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Chunk size must be finite and positive.
    #[error("chunk size must be finite and positive, got {0}")]
    ChunkSize(f64),
    /// Render distance out of range.
    #[error("render distance must be within 0..={max}, got {value}", max = MAX_RENDER_DISTANCE)]
    RenderDistance {
        /// Offending value
        value: i32,
    },
    /// Terrain needs at least one segment per edge.
    #[error("terrain segments must be within 1..={max}, got {value}", max = MAX_TERRAIN_SEGMENTS)]
    TerrainSegments {
        /// Offending value
        value: u32,
    },
    /// Height range is inverted or not finite.
    #[error("invalid height range {min}..{max}")]
    HeightRange {
        /// Configured minimum
        min: f64,
        /// Configured maximum
        max: f64,
    },
    /// Spread must lie in (0, 1].
    #[error("spread must be within (0, 1], got {0}")]
    Spread(f64),
    /// Seed must be finite.
    #[error("seed must be finite, got {0}")]
    Seed(f64),
    /// Interaction distance must be finite and non-negative.
    #[error("interaction distance must be finite and non-negative, got {0}")]
    InteractionDistance(f64),
    /// A day needs at least one tick.
    #[error("day length must be at least one tick")]
    DayLength,
    /// Start position must be finite and inside the streamable world.
    #[error("start position must be finite and within the world, got {0:?}")]
    StartPosition([f64; 3]),
}

impl WorldConfig {
    /// Check every field, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            return Err(ConfigError::ChunkSize(self.chunk_size));
        }
        if !(0..=MAX_RENDER_DISTANCE).contains(&self.render_distance) {
            return Err(ConfigError::RenderDistance {
                value: self.render_distance,
            });
        }
        if !(1..=MAX_TERRAIN_SEGMENTS).contains(&self.terrain_segments) {
            return Err(ConfigError::TerrainSegments {
                value: self.terrain_segments,
            });
        }
        if !self.height_min.is_finite()
            || !self.height_max.is_finite()
            || self.height_min > self.height_max
        {
            return Err(ConfigError::HeightRange {
                min: self.height_min,
                max: self.height_max,
            });
        }
        if !(self.spread > 0.0 && self.spread <= 1.0) {
            return Err(ConfigError::Spread(self.spread));
        }
        if let Some(seed) = self.seed {
            if !seed.is_finite() {
                return Err(ConfigError::Seed(seed));
            }
        }
        if !self.interaction_distance.is_finite() || self.interaction_distance < 0.0 {
            return Err(ConfigError::InteractionDistance(self.interaction_distance));
        }
        if self.day_length_ticks == 0 {
            return Err(ConfigError::DayLength);
        }
        if self.start_position.iter().any(|v| !v.is_finite())
            || ChunkPos::checked_from_world(self.start(), self.chunk_size).is_none()
        {
            return Err(ConfigError::StartPosition(self.start_position));
        }
        Ok(())
    }

    /// Configured global total for a node category.
    pub fn total_for(&self, kind: NodeKind) -> u32 {
        match kind {
            NodeKind::Tree => self.tree_total,
            NodeKind::Rock => self.rock_total,
            NodeKind::Bush => self.bush_total,
            NodeKind::Animal => self.animal_total,
        }
    }

    /// Objects of `kind` placed in each chunk. The remainder is dropped.
    pub fn per_chunk(&self, kind: NodeKind) -> u32 {
        self.total_for(kind) / INITIAL_VISIBLE_CHUNKS
    }

    /// Start position as a vector.
    pub fn start(&self) -> DVec3 {
        DVec3::from_array(self.start_position)
    }
}
