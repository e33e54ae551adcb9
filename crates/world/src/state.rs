//! The world controller.
//!
//! [`WorldState`] owns every piece of mutable world data and is advanced by an
//! explicit [`WorldState::tick`] call. Independent instances share nothing.

use glam::{DVec2, DVec3};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use wildstead_core::{BuildingKind, Item, Recipe, RecipeBook, SimTick, WorldSeed};

use crate::building::{preview_position, BuildError, BuildSite, PlacedBuilding};
use crate::chunk::ChunkPos;
use crate::config::{ConfigError, WorldConfig};
use crate::crafting::{craft, CraftError};
use crate::interaction::{harvest, EquipError, Equipment, Harvest, HarvestContext};
use crate::inventory::Inventory;
use crate::node::{InteractionRegistry, NodeId, ResourceNode};
use crate::scene::SceneSink;
use crate::storage::ChunkRegistry;
use crate::streamer::{StreamReport, WorldStreamer};
use crate::survival::{ConsumeError, Restore, Vitals};
use crate::time::DayClock;

/// Notable things that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TickEvent {
    /// A new day began.
    DayStarted { day: u32 },
    /// Health reached zero. Reported once.
    GameOver { days_survived: u32 },
}

/// A player position the world cannot stream around.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("player position {0} is not finite or lies outside the world")]
pub struct OutOfWorld(pub DVec3);

/// Everything a tick changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub stream: StreamReport,
    pub events: Vec<TickEvent>,
}

/// One simulated world.
pub struct WorldState<S: SceneSink> {
    config: WorldConfig,
    seed: WorldSeed,
    tick: SimTick,
    player: DVec3,
    streamer: WorldStreamer,
    nodes: InteractionRegistry,
    inventory: Inventory,
    equipment: Equipment,
    vitals: Vitals,
    clock: DayClock,
    recipes: RecipeBook,
    buildings: BuildSite,
    game_over: bool,
    scene: S,
}

impl<S: SceneSink> WorldState<S> {
    /// Validate `config`, then build the world and generate the starting window.
    pub fn new(config: WorldConfig, recipes: RecipeBook, mut scene: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.map(WorldSeed).unwrap_or_else(WorldSeed::random);
        let player = config.start();

        let mut streamer = WorldStreamer::new(seed, &config);
        let mut nodes = InteractionRegistry::new();
        let primed = streamer.prime(player, &mut scene, &mut nodes);
        info!(
            seed = seed.value(),
            chunks = primed.generated.len(),
            nodes = nodes.len(),
            "world created"
        );

        Ok(Self {
            clock: DayClock::new(config.day_length_ticks),
            config,
            seed,
            tick: SimTick::ZERO,
            player,
            streamer,
            nodes,
            inventory: Inventory::starting(),
            equipment: Equipment::holding(Item::Rock),
            vitals: Vitals::new(),
            recipes,
            buildings: BuildSite::new(),
            game_over: false,
            scene,
        })
    }

    /// Advance the world by one step of `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        self.tick = self.tick.advance(1);
        let mut events = Vec::new();

        if self.clock.advance() {
            info!(day = self.clock.day, "new day");
            events.push(TickEvent::DayStarted {
                day: self.clock.day,
            });
        }

        if !self.game_over {
            self.vitals.advance(dt);
            if self.vitals.is_dead() {
                self.game_over = true;
                warn!(day = self.clock.day, "game over");
                events.push(TickEvent::GameOver {
                    days_survived: self.clock.day,
                });
            }
        }

        let stream = self
            .streamer
            .update(self.player, &mut self.scene, &mut self.nodes);

        TickReport {
            tick: self.tick.0,
            stream,
            events,
        }
    }

    /// Move the player. Streaming catches up on the next tick.
    ///
    /// Non-finite positions, and positions so far out that the streaming
    /// window would leave the chunk index range, are refused and the player
    /// stays put.
    pub fn set_player_position(&mut self, position: DVec3) -> Result<(), OutOfWorld> {
        if !position.is_finite()
            || ChunkPos::checked_from_world(position, self.config.chunk_size).is_none()
        {
            return Err(OutOfWorld(position));
        }
        self.player = position;
        Ok(())
    }

    pub fn player_position(&self) -> DVec3 {
        self.player
    }

    /// Chunk the player currently stands in.
    pub fn player_chunk(&self) -> ChunkPos {
        ChunkPos::from_world(self.player, self.config.chunk_size)
    }

    /// Closest node within interaction distance of the player.
    pub fn nearest_candidate(&self) -> Option<&ResourceNode> {
        self.nodes.nearest(
            DVec2::new(self.player.x, self.player.z),
            self.config.interaction_distance,
        )
    }

    /// Harvest a node with whatever is in hand. `None` if it is gone.
    pub fn harvest(&mut self, id: NodeId) -> Option<Harvest> {
        harvest(
            HarvestContext {
                chunks: self.streamer.chunks_mut(),
                nodes: &mut self.nodes,
                scene: &mut self.scene,
                inventory: &mut self.inventory,
            },
            id,
            self.equipment.equipped(),
        )
    }

    /// Harvest the nearest reachable node, if any.
    pub fn harvest_nearest(&mut self) -> Option<Harvest> {
        let id = self.nearest_candidate()?.id;
        self.harvest(id)
    }

    /// Craft a recipe from the book.
    pub fn craft(&mut self, id: &str) -> Result<&Recipe, CraftError> {
        craft(&self.recipes, id, &mut self.inventory)
    }

    /// Equip an item, or unequip it if already held.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, EquipError> {
        self.equipment.toggle(item, &self.inventory)
    }

    /// Eat or drink one item.
    pub fn consume(&mut self, item: Item) -> Result<Restore, ConsumeError> {
        self.vitals.consume(item, &mut self.inventory)
    }

    /// Where a piece would be placed for the player looking along `yaw`.
    pub fn building_preview(&self, yaw: f64) -> DVec3 {
        preview_position(self.player, yaw)
    }

    /// Turn the building preview a quarter turn.
    pub fn rotate_building(&mut self) -> f64 {
        self.buildings.rotate()
    }

    /// Place a piece in front of the player.
    pub fn place_building(&mut self, kind: BuildingKind, yaw: f64) -> Result<&PlacedBuilding, BuildError> {
        let spec = self
            .recipes
            .building(kind)
            .ok_or(BuildError::UnknownBuilding(kind))?;
        let position = preview_position(self.player, yaw);
        self.buildings
            .place(spec, position, &mut self.inventory, &mut self.scene)
    }

    /// Add items directly, bypassing harvesting.
    pub fn give(&mut self, item: Item, amount: u32) {
        self.inventory.add(item, amount);
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    pub fn current_tick(&self) -> SimTick {
        self.tick
    }

    pub fn streamer(&self) -> &WorldStreamer {
        &self.streamer
    }

    pub fn chunks(&self) -> &ChunkRegistry {
        self.streamer.chunks()
    }

    pub fn nodes(&self) -> &InteractionRegistry {
        &self.nodes
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn equipped(&self) -> Option<Item> {
        self.equipment.equipped()
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn clock(&self) -> &DayClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut DayClock {
        &mut self.clock
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    pub fn buildings(&self) -> &BuildSite {
        &self.buildings
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}
