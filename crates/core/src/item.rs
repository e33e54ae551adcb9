//! Item vocabulary - gathered resources, crafted tools, and consumables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anything that can be counted in an inventory.
///
/// Serialized names match the lowercase identifiers used by recipe data and
/// command scripts (`"wood"`, `"rawberries"`, `"stoneaxe"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    /// Chopped from trees
    Wood,
    /// Mined from rocks; also the starting tool
    Rock,
    /// Picked from berry bushes
    RawBerries,
    /// Hunted from animals
    RawMeat,
    /// Cooked at a campfire
    CookedMeat,
    /// Filled water container
    WaterBottle,
    /// Bonus wood when chopping
    StoneAxe,
    /// Bonus rock when mining
    StonePickaxe,
    /// Bonus meat when hunting
    Spear,
    /// Light source
    Torch,
    /// Cooking station, kept when cooking
    Campfire,
    /// Consumed (and returned) by building placement
    BuildingPlan,
    /// Advanced crafting station
    Workbench,
}

impl Item {
    /// Every item, in inventory display order.
    pub const ALL: [Item; 13] = [
        Item::Wood,
        Item::Rock,
        Item::RawBerries,
        Item::RawMeat,
        Item::CookedMeat,
        Item::WaterBottle,
        Item::StoneAxe,
        Item::StonePickaxe,
        Item::Spear,
        Item::Torch,
        Item::Campfire,
        Item::BuildingPlan,
        Item::Workbench,
    ];

    /// Stable lowercase identifier.
    pub fn name(self) -> &'static str {
        match self {
            Item::Wood => "wood",
            Item::Rock => "rock",
            Item::RawBerries => "rawberries",
            Item::RawMeat => "rawmeat",
            Item::CookedMeat => "cookedmeat",
            Item::WaterBottle => "waterbottle",
            Item::StoneAxe => "stoneaxe",
            Item::StonePickaxe => "stonepickaxe",
            Item::Spear => "spear",
            Item::Torch => "torch",
            Item::Campfire => "campfire",
            Item::BuildingPlan => "buildingplan",
            Item::Workbench => "workbench",
        }
    }

    /// Items the player can hold in hand.
    pub fn is_equippable(self) -> bool {
        matches!(
            self,
            Item::Rock | Item::StoneAxe | Item::StonePickaxe | Item::Spear | Item::Torch
        )
    }

    /// Items that can be eaten or drunk.
    pub fn is_consumable(self) -> bool {
        matches!(self, Item::RawBerries | Item::CookedMeat | Item::WaterBottle)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown item name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item: {0}")]
pub struct UnknownItem(pub String);

impl FromStr for Item {
    type Err = UnknownItem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(|c: char| c == '_' || c == ' ', "");
        Item::ALL
            .into_iter()
            .find(|item| item.name() == wanted)
            .ok_or_else(|| UnknownItem(s.to_string()))
    }
}

/// Harvestable world object categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Yields wood
    Tree,
    /// Yields rock
    Rock,
    /// Yields berries
    Bush,
    /// Yields raw meat
    Animal,
}

impl NodeKind {
    /// Population order within a chunk.
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Tree,
        NodeKind::Rock,
        NodeKind::Bush,
        NodeKind::Animal,
    ];

    /// Resource granted on harvest.
    pub fn resource(self) -> Item {
        match self {
            NodeKind::Tree => Item::Wood,
            NodeKind::Rock => Item::Rock,
            NodeKind::Bush => Item::RawBerries,
            NodeKind::Animal => Item::RawMeat,
        }
    }

    /// Amount granted on harvest before tool bonuses.
    pub fn base_yield(self) -> u32 {
        match self {
            NodeKind::Tree => 3,
            NodeKind::Rock => 2,
            NodeKind::Bush => 3,
            NodeKind::Animal => 2,
        }
    }

    /// Lowercase identifier.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Tree => "tree",
            NodeKind::Rock => "rock",
            NodeKind::Bush => "bush",
            NodeKind::Animal => "animal",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
