#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod crafting;
pub mod item;
pub mod random;

use rand::Rng;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crafting::{BuildingKind, BuildingSpec, Recipe, RecipeBook, RecipeError};
pub use item::{Item, NodeKind, UnknownItem};
pub use random::SeededRandom;

/// Fixed tick type (one tick per simulated frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Upper bound (exclusive) for randomly drawn world seeds.
pub const RANDOM_SEED_RANGE: f64 = 10_000.0;

/// Root value of all procedural generation.
///
/// Seeds are floating point so that the additive per-chunk and per-vertex
/// derivations stay exact for the coordinate ranges the world uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSeed(pub f64);

impl WorldSeed {
    /// Draw a fresh seed in `[0, RANDOM_SEED_RANGE)`.
    pub fn random() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    /// Draw a seed from a caller-supplied RNG.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0.0..RANDOM_SEED_RANGE))
    }

    /// Raw seed value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Seed for the object-placement stream of chunk `(chunk_x, chunk_z)`.
    #[inline]
    pub fn chunk_seed(self, chunk_x: i32, chunk_z: i32) -> f64 {
        self.0 + f64::from(chunk_x) * 1000.0 + f64::from(chunk_z)
    }

    /// Stream dedicated to the objects of chunk `(chunk_x, chunk_z)`.
    pub fn chunk_stream(self, chunk_x: i32, chunk_z: i32) -> SeededRandom {
        SeededRandom::new(self.chunk_seed(chunk_x, chunk_z))
    }
}
