//! Equipment and harvesting.
//!
//! Harvesting re-validates its target against the interaction registry, so a
//! node that was already harvested (or evicted with its chunk) grants nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use wildstead_core::{Item, NodeKind};

use crate::inventory::Inventory;
use crate::node::{InteractionRegistry, NodeId, ResourceNode};
use crate::scene::SceneSink;
use crate::storage::ChunkRegistry;

/// Extra yield for a tool used on a node kind.
pub fn tool_bonus(equipped: Option<Item>, kind: NodeKind) -> u32 {
    match (equipped, kind) {
        (Some(Item::StoneAxe), NodeKind::Tree) => 3,
        (Some(Item::StonePickaxe), NodeKind::Rock) => 3,
        (Some(Item::Spear), NodeKind::Animal) => 2,
        _ => 0,
    }
}

/// Rejected equip requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EquipError {
    /// The item cannot be held as a tool.
    #[error("{0} cannot be equipped")]
    NotEquippable(Item),
    /// The player has none of the item.
    #[error("no {0} in inventory")]
    NotHeld(Item),
}

/// The item held in hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    equipped: Option<Item>,
}

impl Equipment {
    /// Hands holding `item`, without any inventory check.
    pub fn holding(item: Item) -> Self {
        Self {
            equipped: Some(item),
        }
    }

    pub fn equipped(&self) -> Option<Item> {
        self.equipped
    }

    /// Equip `item`, or put it away if it is already in hand.
    ///
    /// Returns what is held afterwards.
    pub fn toggle(&mut self, item: Item, inventory: &Inventory) -> Result<Option<Item>, EquipError> {
        if !item.is_equippable() {
            return Err(EquipError::NotEquippable(item));
        }
        if self.equipped == Some(item) {
            self.equipped = None;
            return Ok(None);
        }
        if !inventory.has(item, 1) {
            return Err(EquipError::NotHeld(item));
        }
        self.equipped = Some(item);
        Ok(self.equipped)
    }
}

/// Outcome of a successful harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Harvest {
    pub node: NodeId,
    pub kind: NodeKind,
    pub item: Item,
    /// Amount added, including the tool bonus.
    pub amount: u32,
}

/// Mutable world pieces a harvest touches.
pub struct HarvestContext<'a> {
    pub chunks: &'a mut ChunkRegistry,
    pub nodes: &'a mut InteractionRegistry,
    pub scene: &'a mut dyn SceneSink,
    pub inventory: &'a mut Inventory,
}

/// Harvest node `id` with `equipped` in hand.
///
/// Returns `None`, changing nothing, if the node is no longer live.
pub fn harvest(ctx: HarvestContext<'_>, id: NodeId, equipped: Option<Item>) -> Option<Harvest> {
    let node: ResourceNode = ctx.nodes.unregister(id)?;
    let amount = node.amount() + tool_bonus(equipped, node.kind);
    let item = node.resource();

    ctx.inventory.add(item, amount);
    ctx.scene.detach(node.render);
    if let Some(chunk) = ctx.chunks.get_mut(node.chunk) {
        chunk.remove_node(id);
    }

    debug!(node = %id, kind = %node.kind, %item, amount, "node harvested");
    Some(Harvest {
        node: id,
        kind: node.kind,
        item,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use crate::chunk::{Chunk, ChunkPos};
    use crate::heightmap::Heightfield;
    use crate::populate::NodeSpawn;
    use crate::scene::{RecordingScene, Renderable};

    struct Fixture {
        chunks: ChunkRegistry,
        nodes: InteractionRegistry,
        scene: RecordingScene,
        inventory: Inventory,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                chunks: ChunkRegistry::new(),
                nodes: InteractionRegistry::new(),
                scene: RecordingScene::new(),
                inventory: Inventory::new(),
            }
        }

        fn spawn(&mut self, kind: NodeKind) -> NodeId {
            let pos = ChunkPos::new(0, 0);
            if !self.chunks.contains(pos) {
                let field = Heightfield::flat(1, 0.0);
                let terrain = self.scene.attach(Renderable::Terrain {
                    chunk: pos,
                    origin: DVec2::ZERO,
                    heightfield: &field,
                });
                self.chunks.insert(Chunk::new(pos, field, terrain));
            }
            let spawn = NodeSpawn {
                kind,
                position: DVec2::new(1.0, 1.0),
            };
            let render = self.scene.attach(Renderable::Node {
                kind,
                position: spawn.position,
            });
            let id = self.nodes.register(spawn, pos, render);
            if let Some(chunk) = self.chunks.get_mut(pos) {
                chunk.push_node(id);
            }
            id
        }

        fn harvest(&mut self, id: NodeId, equipped: Option<Item>) -> Option<Harvest> {
            harvest(
                HarvestContext {
                    chunks: &mut self.chunks,
                    nodes: &mut self.nodes,
                    scene: &mut self.scene,
                    inventory: &mut self.inventory,
                },
                id,
                equipped,
            )
        }
    }

    #[test]
    fn bonus_table() {
        assert_eq!(tool_bonus(Some(Item::StoneAxe), NodeKind::Tree), 3);
        assert_eq!(tool_bonus(Some(Item::StonePickaxe), NodeKind::Rock), 3);
        assert_eq!(tool_bonus(Some(Item::Spear), NodeKind::Animal), 2);
        assert_eq!(tool_bonus(Some(Item::StoneAxe), NodeKind::Rock), 0);
        assert_eq!(tool_bonus(Some(Item::Torch), NodeKind::Bush), 0);
        assert_eq!(tool_bonus(None, NodeKind::Tree), 0);
    }

    #[test]
    fn harvest_once() {
        let mut fixture = Fixture::new();
        let tree = fixture.spawn(NodeKind::Tree);

        let first = fixture.harvest(tree, None).unwrap();
        assert_eq!(first.item, Item::Wood);
        assert_eq!(first.amount, 3);
        assert_eq!(fixture.inventory.count(Item::Wood), 3);

        assert!(fixture.harvest(tree, None).is_none());
        assert_eq!(fixture.inventory.count(Item::Wood), 3);
        assert!(fixture.nodes.is_empty());
        assert!(fixture.chunks.get(ChunkPos::new(0, 0)).unwrap().nodes().is_empty());
        assert_eq!(fixture.scene.live().len(), 1);
    }

    #[test]
    fn tool_bonus_is_added() {
        let mut fixture = Fixture::new();
        let rock = fixture.spawn(NodeKind::Rock);
        let animal = fixture.spawn(NodeKind::Animal);

        assert_eq!(fixture.harvest(rock, Some(Item::StonePickaxe)).unwrap().amount, 5);
        assert_eq!(fixture.harvest(animal, Some(Item::Spear)).unwrap().amount, 4);
        assert_eq!(fixture.inventory.count(Item::Rock), 5);
        assert_eq!(fixture.inventory.count(Item::RawMeat), 4);
    }

    #[test]
    fn equip_toggles_and_validates() {
        let mut inventory = Inventory::starting();
        let mut equipment = Equipment::default();

        assert_eq!(equipment.toggle(Item::Rock, &inventory), Ok(Some(Item::Rock)));
        assert_eq!(equipment.toggle(Item::Rock, &inventory), Ok(None));
        assert_eq!(
            equipment.toggle(Item::Wood, &inventory),
            Err(EquipError::NotEquippable(Item::Wood))
        );
        assert_eq!(
            equipment.toggle(Item::Spear, &inventory),
            Err(EquipError::NotHeld(Item::Spear))
        );

        inventory.add(Item::Spear, 1);
        equipment.toggle(Item::Rock, &inventory).unwrap();
        assert_eq!(equipment.toggle(Item::Spear, &inventory), Ok(Some(Item::Spear)));
        assert_eq!(equipment.equipped(), Some(Item::Spear));
    }
}
