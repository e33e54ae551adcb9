//! Harvestable resource nodes and the interaction-candidate registry.

use std::collections::BTreeMap;
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use wildstead_core::{Item, NodeKind};

use crate::chunk::ChunkPos;
use crate::populate::NodeSpawn;
use crate::scene::RenderHandle;

/// Stable handle of a resource node. Never reused within one world.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live tree, rock, bush or animal.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Ground-plane position (x, z).
    pub position: DVec2,
    /// Chunk that owns this node.
    pub chunk: ChunkPos,
    /// Scene handle of the node's visual.
    pub render: RenderHandle,
}

impl ResourceNode {
    /// Resource granted on harvest.
    #[inline]
    pub fn resource(&self) -> Item {
        self.kind.resource()
    }

    /// Amount granted on harvest before tool bonuses.
    #[inline]
    pub fn amount(&self) -> u32 {
        self.kind.base_yield()
    }
}

/// Every node that can currently be targeted, keyed by id.
#[derive(Debug, Default)]
pub struct InteractionRegistry {
    nodes: BTreeMap<NodeId, ResourceNode>,
    next_id: u64,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly spawned node and return its handle.
    pub fn register(&mut self, spawn: NodeSpawn, chunk: ChunkPos, render: RenderHandle) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            ResourceNode {
                id,
                kind: spawn.kind,
                position: spawn.position,
                chunk,
                render,
            },
        );
        id
    }

    /// Remove a node, returning it if it was live.
    pub fn unregister(&mut self, id: NodeId) -> Option<ResourceNode> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&ResourceNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Live nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> + '_ {
        self.nodes.values()
    }

    /// Closest live node within `max_distance` of `position` on the ground
    /// plane. Ties go to the lowest id.
    pub fn nearest(&self, position: DVec2, max_distance: f64) -> Option<&ResourceNode> {
        let mut best: Option<(&ResourceNode, f64)> = None;
        for node in self.nodes.values() {
            let distance = node.position.distance(position);
            if distance > max_distance {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((node, distance));
            }
        }
        best.map(|(node, _)| node)
    }
}
