//! Sine-hash pseudo-random stream.
//!
//! Terrain heights have to be recomputable from a world position alone, by any
//! chunk that shares a border vertex, so every draw is a pure function of the
//! cursor value. The stream is not statistically strong; it only has to be
//! reproducible bit-for-bit.

/// Multiplier applied to `sin(state)` before taking the fractional part.
const SCALE: f64 = 10_000.0;

/// Deterministic pseudo-random stream over an `f64` cursor.
///
/// Instances are cheap; callers create a fresh one per logical use (per
/// chunk, per vertex) instead of sharing one across unrelated computations.
#[derive(Debug, Clone, PartialEq)]
pub struct SeededRandom {
    state: f64,
}

impl SeededRandom {
    /// Create a stream positioned at `seed`.
    pub fn new(seed: f64) -> Self {
        Self { state: seed }
    }

    /// Current cursor value.
    pub fn state(&self) -> f64 {
        self.state
    }

    /// Next value in `[0, 1)`; advances the cursor by one.
    pub fn next_f64(&mut self) -> f64 {
        let x = self.state.sin() * SCALE;
        self.state += 1.0;
        let frac = x - x.floor();
        // `x - floor(x)` can round up to exactly 1.0 for tiny negative x.
        if frac >= 1.0 {
            0.0
        } else {
            frac
        }
    }

    /// Next value in `[-0.5, 0.5)`, used for offsets around a centre.
    #[inline]
    pub fn next_centered(&mut self) -> f64 {
        self.next_f64() - 0.5
    }
}
