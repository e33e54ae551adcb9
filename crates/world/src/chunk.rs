use std::fmt;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::config::MAX_RENDER_DISTANCE;
use crate::heightmap::Heightfield;
use crate::node::NodeId;
use crate::scene::RenderHandle;

/// Chunk index along one axis for a continuous world coordinate.
#[inline]
pub fn chunk_index_for(world: f64, chunk_size: f64) -> i32 {
    (world / chunk_size).floor() as i32
}

/// Largest chunk index, on either axis, a player may stand in. The streaming
/// window and its eviction ring around it must still fit in `i32`.
pub const MAX_CHUNK_INDEX: i32 = i32::MAX - MAX_RENDER_DISTANCE - 2;

/// Chunk coordinate expressed in chunk units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world position (the y axis is ignored).
    pub fn from_world(position: DVec3, chunk_size: f64) -> Self {
        Self::new(
            chunk_index_for(position.x, chunk_size),
            chunk_index_for(position.z, chunk_size),
        )
    }

    /// Like [`ChunkPos::from_world`], but `None` for non-finite positions and
    /// for positions beyond [`MAX_CHUNK_INDEX`].
    pub fn checked_from_world(position: DVec3, chunk_size: f64) -> Option<Self> {
        let index = |value: f64| {
            let index = (value / chunk_size).floor();
            (index.is_finite() && index.abs() <= f64::from(MAX_CHUNK_INDEX)).then_some(index as i32)
        };
        Some(Self::new(index(position.x)?, index(position.z)?))
    }

    /// Canonical identity key, `"cx,cz"`.
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Placement anchor in world space.
    ///
    /// The anchor is the centre of the chunk's footprint, so neighbours sit
    /// exactly `chunk_size` apart with no gap or overlap.
    pub fn origin(self, chunk_size: f64) -> DVec2 {
        DVec2::new(
            f64::from(self.x) * chunk_size,
            f64::from(self.z) * chunk_size,
        )
    }

    /// Square-radius distance in chunks.
    pub fn chebyshev_distance(self, other: ChunkPos) -> i32 {
        let distance = self.x.abs_diff(other.x).max(self.z.abs_diff(other.z));
        i32::try_from(distance).unwrap_or(i32::MAX)
    }

    /// Every coordinate within `radius` (inclusive), in x-major order.
    pub fn square(self, radius: i32) -> impl Iterator<Item = ChunkPos> {
        (-radius..=radius).flat_map(move |dx| {
            (-radius..=radius).map(move |dz| ChunkPos::new(self.x.saturating_add(dx), self.z.saturating_add(dz)))
        })
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

/// A generated chunk: its terrain and the ids of the nodes it owns.
#[derive(Debug, Clone)]
pub struct Chunk {
    position: ChunkPos,
    terrain: RenderHandle,
    heightfield: Heightfield,
    nodes: Vec<NodeId>,
}

impl Chunk {
    pub fn new(position: ChunkPos, heightfield: Heightfield, terrain: RenderHandle) -> Self {
        Self {
            position,
            terrain,
            heightfield,
            nodes: Vec::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Scene handle of the terrain surface.
    #[inline]
    pub fn terrain(&self) -> RenderHandle {
        self.terrain
    }

    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    /// Owned node ids in spawn order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub(crate) fn push_node(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    /// Drop a harvested node from the owned list. Returns whether it was present.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> bool {
        match self.nodes.iter().position(|owned| *owned == id) {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }
}
