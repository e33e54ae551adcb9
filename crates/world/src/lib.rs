mod building;
mod chunk;
mod config;
mod crafting;
mod heightmap;
mod interaction;
mod inventory;
mod node;
mod populate;
mod scene;
mod state;
mod storage;
mod streamer;
mod survival;
mod time;

pub use building::*;
pub use chunk::*;
pub use config::*;
pub use crafting::*;
pub use heightmap::*;
pub use interaction::*;
pub use inventory::*;
pub use node::*;
pub use populate::*;
pub use scene::*;
pub use state::*;
pub use storage::*;
pub use streamer::*;
pub use survival::*;
pub use time::*;

pub use wildstead_core::{
    BuildingKind, BuildingSpec, Item, NodeKind, Recipe, RecipeBook, SeededRandom, SimTick,
    WorldSeed,
};
