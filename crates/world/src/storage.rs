use std::collections::BTreeMap;

use crate::{Chunk, ChunkPos};

/// Live chunk registry keyed by coordinate.
/// Uses BTreeMap for deterministic iteration order (eviction and reports follow key order).
#[derive(Debug, Default)]
pub struct ChunkRegistry {
    chunks: BTreeMap<ChunkPos, Chunk>,
}

impl ChunkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true when no chunks are live.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Register a generated chunk. Returns false, leaving the registry
    /// untouched, if its coordinate is already live.
    pub fn insert(&mut self, chunk: Chunk) -> bool {
        let pos = chunk.position();
        if self.chunks.contains_key(&pos) {
            return false;
        }
        self.chunks.insert(pos, chunk);
        true
    }

    /// Drop a chunk from the live set.
    pub fn remove(&mut self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.remove(&pos)
    }

    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Live coordinates in key order.
    pub fn positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// Live chunks in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }
}
