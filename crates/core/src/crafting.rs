//! Crafting system - Recipe and building tables consumed by the world

use crate::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// A crafting recipe that turns required items into produced items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable identifier used by menus and scripts (e.g. "stoneaxe")
    pub id: String,
    /// Display name
    pub name: String,
    /// Items consumed
    pub requires: BTreeMap<Item, u32>,
    /// Items produced
    pub gives: BTreeMap<Item, u32>,
    /// Short description
    #[serde(default)]
    pub description: String,
}

impl Recipe {
    /// Create a new recipe
    pub fn new(
        id: &str,
        name: &str,
        requires: &[(Item, u32)],
        gives: &[(Item, u32)],
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            requires: requires.iter().copied().collect(),
            gives: gives.iter().copied().collect(),
            description: description.to_string(),
        }
    }

    /// Check if the recipe can be crafted given a count lookup
    pub fn can_craft(&self, available: impl Fn(Item) -> u32) -> bool {
        self.requires
            .iter()
            .all(|(item, required)| available(*item) >= *required)
    }
}

/// Placeable structure pieces
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    /// Base for structures
    Foundation,
    /// Wooden wall
    Wall,
    /// Wall with a door opening
    Doorway,
    /// Floor piece
    Floor,
    /// Wooden stairs
    Stairs,
    /// Slanted roof piece
    Roof,
}

impl BuildingKind {
    /// Every building kind, in menu order.
    pub const ALL: [BuildingKind; 6] = [
        BuildingKind::Foundation,
        BuildingKind::Wall,
        BuildingKind::Doorway,
        BuildingKind::Floor,
        BuildingKind::Stairs,
        BuildingKind::Roof,
    ];

    /// Lowercase identifier.
    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::Foundation => "foundation",
            BuildingKind::Wall => "wall",
            BuildingKind::Doorway => "doorway",
            BuildingKind::Floor => "floor",
            BuildingKind::Stairs => "stairs",
            BuildingKind::Roof => "roof",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        BuildingKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| format!("unknown building: {s}"))
    }
}

/// Requirements for placing one building piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSpec {
    /// Which piece
    pub kind: BuildingKind,
    /// Display name
    pub name: String,
    /// Items consumed on placement
    pub requires: BTreeMap<Item, u32>,
    /// Whether the building plan is handed back after placement
    #[serde(default)]
    pub returns_plan: bool,
    /// Short description
    #[serde(default)]
    pub description: String,
}

impl BuildingSpec {
    fn wooden(kind: BuildingKind, name: &str, wood: u32, description: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            requires: [(Item::Wood, wood), (Item::BuildingPlan, 1)]
                .into_iter()
                .collect(),
            returns_plan: true,
            description: description.to_string(),
        }
    }
}

/// Errors emitted while loading recipe data.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// Wrap IO errors when reading recipe files.
    #[error("failed to read recipe book: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse recipe book: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two recipes share an identifier.
    #[error("duplicate recipe id: {0}")]
    DuplicateRecipe(String),
    /// Two building entries share a kind.
    #[error("duplicate building kind: {0}")]
    DuplicateBuilding(BuildingKind),
}

/// Static crafting and building tables.
///
/// Entries keep their authored order so menus list them consistently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeBook {
    /// Crafting recipes
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    /// Building pieces
    #[serde(default)]
    pub buildings: Vec<BuildingSpec>,
}

impl RecipeBook {
    /// The tables the game ships with.
    pub fn builtin() -> Self {
        use Item::*;
        let recipes = vec![
            Recipe::new(
                "stoneaxe",
                "Stone Axe",
                &[(Wood, 5), (Rock, 3)],
                &[(StoneAxe, 1)],
                "Chop trees faster (+3 wood per tree)",
            ),
            Recipe::new(
                "stonepickaxe",
                "Stone Pickaxe",
                &[(Wood, 3), (Rock, 5)],
                &[(StonePickaxe, 1)],
                "Mine rocks faster (+3 stone per rock)",
            ),
            Recipe::new(
                "spear",
                "Wooden Spear",
                &[(Wood, 4), (Rock, 2)],
                &[(Spear, 1)],
                "Hunt animals (+2 meat)",
            ),
            Recipe::new("torch", "Torch", &[(Wood, 2), (Rock, 1)], &[(Torch, 1)], "Light source"),
            Recipe::new(
                "campfire",
                "Campfire",
                &[(Wood, 5), (Rock, 3)],
                &[(Campfire, 1)],
                "Cook food and stay warm",
            ),
            Recipe::new(
                "buildingplan",
                "Building Plan",
                &[(Wood, 5)],
                &[(BuildingPlan, 1)],
                "Required to build structures",
            ),
            Recipe::new(
                "cookedmeat",
                "Cook Meat",
                &[(RawMeat, 1), (Campfire, 1)],
                &[(CookedMeat, 1), (Campfire, 1)],
                "Restores 30 hunger",
            ),
            Recipe::new(
                "waterbottle",
                "Water Bottle",
                &[(Rock, 2)],
                &[(WaterBottle, 1)],
                "Store water (+50 thirst)",
            ),
            Recipe::new(
                "workbench",
                "Workbench",
                &[(Wood, 15), (Rock, 10)],
                &[(Workbench, 1)],
                "Unlock advanced crafting",
            ),
        ];

        let buildings = vec![
            BuildingSpec::wooden(BuildingKind::Foundation, "Foundation", 10, "Base for structures"),
            BuildingSpec::wooden(BuildingKind::Wall, "Wall", 8, "Wooden wall"),
            BuildingSpec::wooden(BuildingKind::Doorway, "Doorway", 6, "Wall with door opening"),
            BuildingSpec::wooden(BuildingKind::Floor, "Floor", 8, "Floor piece"),
            BuildingSpec::wooden(BuildingKind::Stairs, "Stairs", 12, "Wooden stairs"),
            BuildingSpec::wooden(BuildingKind::Roof, "Roof", 6, "Slanted roof piece"),
        ];

        Self { recipes, buildings }
    }

    /// Parse a recipe book from JSON, rejecting duplicate entries.
    pub fn from_json_str(input: &str) -> Result<Self, RecipeError> {
        let book: RecipeBook = serde_json::from_str(input)?;
        book.check_unique()?;
        Ok(book)
    }

    /// Load a recipe book from a JSON file on disk.
    pub fn load_from_path(path: &Path) -> Result<Self, RecipeError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Look up a recipe by identifier.
    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// Look up the placement requirements of a building kind.
    pub fn building(&self, kind: BuildingKind) -> Option<&BuildingSpec> {
        self.buildings.iter().find(|spec| spec.kind == kind)
    }

    fn check_unique(&self) -> Result<(), RecipeError> {
        let mut ids = std::collections::BTreeSet::new();
        for recipe in &self.recipes {
            if !ids.insert(recipe.id.as_str()) {
                return Err(RecipeError::DuplicateRecipe(recipe.id.clone()));
            }
        }
        let mut kinds = std::collections::BTreeSet::new();
        for spec in &self.buildings {
            if !kinds.insert(spec.kind) {
                return Err(RecipeError::DuplicateBuilding(spec.kind));
            }
        }
        Ok(())
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_can_craft() {
        let recipe = RecipeBook::builtin().recipe("stoneaxe").cloned().unwrap();

        // Has enough materials
        assert!(recipe.can_craft(|item| match item {
            Item::Wood => 6,
            Item::Rock => 3,
            _ => 0,
        }));

        // Not enough of one material
        assert!(!recipe.can_craft(|item| match item {
            Item::Wood => 6,
            Item::Rock => 2,
            _ => 0,
        }));

        // Missing one material type
        assert!(!recipe.can_craft(|item| if item == Item::Wood { 10 } else { 0 }));
    }

    #[test]
    fn builtin_tables_are_complete() {
        let book = RecipeBook::builtin();
        assert_eq!(book.recipes.len(), 9);
        for kind in BuildingKind::ALL {
            let spec = book.building(kind).expect("every kind has a spec");
            assert_eq!(spec.requires.get(&Item::BuildingPlan), Some(&1));
            assert!(spec.returns_plan);
        }
        book.check_unique().expect("builtin ids are unique");
    }

    #[test]
    fn cooking_keeps_the_campfire() {
        let book = RecipeBook::builtin();
        let cook = book.recipe("cookedmeat").unwrap();
        assert_eq!(cook.requires.get(&Item::Campfire), Some(&1));
        assert_eq!(cook.gives.get(&Item::Campfire), Some(&1));
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let book = RecipeBook::builtin();
        let json = serde_json::to_string(&book).unwrap();
        let parsed = RecipeBook::from_json_str(&json).unwrap();
        assert_eq!(parsed, book);
    }

    #[test]
    fn json_with_duplicate_ids_is_rejected() {
        let json = r#"{
            "recipes": [
                {"id": "torch", "name": "Torch", "requires": {"wood": 1}, "gives": {"torch": 1}},
                {"id": "torch", "name": "Torch", "requires": {"wood": 2}, "gives": {"torch": 1}}
            ]
        }"#;
        let err = RecipeBook::from_json_str(json).unwrap_err();
        assert!(matches!(err, RecipeError::DuplicateRecipe(id) if id == "torch"));
    }

    #[test]
    fn json_with_unknown_item_fails_to_parse() {
        let json = r#"{"recipes": [{"id": "x", "name": "X", "requires": {"gold": 1}, "gives": {}}]}"#;
        assert!(matches!(
            RecipeBook::from_json_str(json),
            Err(RecipeError::Parse(_))
        ));
    }

    #[test]
    fn building_kind_parses() {
        assert_eq!("Wall".parse::<BuildingKind>(), Ok(BuildingKind::Wall));
        assert!("tower".parse::<BuildingKind>().is_err());
    }
}
