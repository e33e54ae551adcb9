//! Crafting against the player's inventory.

use thiserror::Error;
use tracing::info;
use wildstead_core::{Recipe, RecipeBook};

use crate::inventory::{Inventory, Shortage};

/// Reasons a craft was refused. The inventory is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    /// No recipe with that identifier.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),
    /// A required material is missing.
    #[error("cannot craft: {0}")]
    Missing(#[from] Shortage),
}

/// Craft recipe `id`: check every requirement, then consume and produce.
pub fn craft<'a>(
    book: &'a RecipeBook,
    id: &str,
    inventory: &mut Inventory,
) -> Result<&'a Recipe, CraftError> {
    let recipe = book
        .recipe(id)
        .ok_or_else(|| CraftError::UnknownRecipe(id.to_string()))?;

    inventory.remove_all(&recipe.requires)?;
    for (item, amount) in &recipe.gives {
        inventory.add(*item, *amount);
    }

    info!(recipe = %recipe.id, "crafted {}", recipe.name);
    Ok(recipe)
}

/// Recipes the inventory can currently afford, in book order.
pub fn craftable<'a>(
    book: &'a RecipeBook,
    inventory: &'a Inventory,
) -> impl Iterator<Item = &'a Recipe> + 'a {
    book.recipes
        .iter()
        .filter(move |recipe| recipe.can_craft(|item| inventory.count(item)))
}
