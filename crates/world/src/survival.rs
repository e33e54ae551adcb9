//! Health, hunger and thirst.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use wildstead_core::Item;

use crate::inventory::{Inventory, Shortage};

/// Upper bound of every vital.
pub const MAX_VITAL: f64 = 100.0;

/// Hunger lost per simulated second.
pub const HUNGER_DRAIN: f64 = 0.1;

/// Thirst lost per simulated second.
pub const THIRST_DRAIN: f64 = 0.15;

/// Health lost per second while starving or parched.
pub const STARVATION_DAMAGE: f64 = 0.2;

/// What eating or drinking an item restores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Restore {
    pub health: f64,
    pub hunger: f64,
    pub thirst: f64,
}

/// Effect of a consumable, or `None` for items that cannot be consumed.
pub fn restore_for(item: Item) -> Option<Restore> {
    match item {
        Item::RawBerries => Some(Restore {
            hunger: 15.0,
            ..Restore::default()
        }),
        Item::CookedMeat => Some(Restore {
            health: 5.0,
            hunger: 30.0,
            ..Restore::default()
        }),
        Item::WaterBottle => Some(Restore {
            thirst: 50.0,
            ..Restore::default()
        }),
        _ => None,
    }
}

/// Rejected consume requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsumeError {
    /// The item is not food or drink.
    #[error("{0} cannot be consumed")]
    NotConsumable(Item),
    /// None left.
    #[error("cannot consume: {0}")]
    Missing(#[from] Shortage),
}

/// Player survival meters, each in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f64,
    pub hunger: f64,
    pub thirst: f64,
    /// Simulated time not yet applied as a whole second.
    #[serde(skip)]
    pending: f64,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: MAX_VITAL,
            hunger: MAX_VITAL,
            thirst: MAX_VITAL,
            pending: 0.0,
        }
    }
}

impl Vitals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether health has run out.
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply one second of drain.
    pub fn drain_second(&mut self) {
        self.hunger = (self.hunger - HUNGER_DRAIN).max(0.0);
        self.thirst = (self.thirst - THIRST_DRAIN).max(0.0);
        if self.hunger == 0.0 || self.thirst == 0.0 {
            self.health = (self.health - STARVATION_DAMAGE).max(0.0);
        }
    }

    /// Accumulate `dt` seconds and apply drain for every whole second.
    ///
    /// Returns how many seconds were applied.
    pub fn advance(&mut self, dt: f64) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.pending += dt;
        let mut seconds = 0;
        while self.pending >= 1.0 {
            self.pending -= 1.0;
            self.drain_second();
            seconds += 1;
        }
        seconds
    }

    /// Apply a restore, capping each meter at the maximum.
    pub fn apply(&mut self, restore: Restore) {
        self.health = (self.health + restore.health).min(MAX_VITAL);
        self.hunger = (self.hunger + restore.hunger).min(MAX_VITAL);
        self.thirst = (self.thirst + restore.thirst).min(MAX_VITAL);
    }

    /// Eat or drink one `item` from the inventory.
    pub fn consume(&mut self, item: Item, inventory: &mut Inventory) -> Result<Restore, ConsumeError> {
        let restore = restore_for(item).ok_or(ConsumeError::NotConsumable(item))?;
        inventory.remove(item, 1)?;
        self.apply(restore);
        info!(%item, hunger = self.hunger, thirst = self.thirst, health = self.health, "consumed");
        Ok(restore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_second_of_drain() {
        let mut vitals = Vitals::new();
        vitals.drain_second();
        assert!((vitals.hunger - 99.9).abs() < 1e-9);
        assert!((vitals.thirst - 99.85).abs() < 1e-9);
        assert_eq!(vitals.health, 100.0);
    }

    #[test]
    fn advance_applies_whole_seconds_only() {
        let mut vitals = Vitals::new();
        assert_eq!(vitals.advance(0.5), 0);
        assert_eq!(vitals.hunger, 100.0);
        assert_eq!(vitals.advance(0.75), 1);
        assert_eq!(vitals.advance(2.0), 2);
        assert!((vitals.hunger - 99.7).abs() < 1e-9);
        assert_eq!(vitals.advance(-1.0), 0);
    }

    #[test]
    fn thirst_runs_out_first_then_health_drains() {
        let mut vitals = Vitals::new();
        // Thirst hits zero after ceil(100 / 0.15) seconds.
        for _ in 0..667 {
            vitals.drain_second();
        }
        assert_eq!(vitals.thirst, 0.0);
        assert!(vitals.hunger > 0.0);
        let health = vitals.health;
        vitals.drain_second();
        assert!((health - vitals.health - STARVATION_DAMAGE).abs() < 1e-9);
    }

    #[test]
    fn dies_eventually() {
        let mut vitals = Vitals::new();
        let mut seconds = 0;
        while !vitals.is_dead() {
            vitals.drain_second();
            seconds += 1;
            assert!(seconds < 10_000);
        }
        assert_eq!(vitals.health, 0.0);
    }

    #[test]
    fn consuming_caps_and_spends() {
        let mut vitals = Vitals {
            health: 98.0,
            hunger: 90.0,
            thirst: 10.0,
            ..Vitals::default()
        };
        let mut inventory = Inventory::new();
        inventory.add(Item::CookedMeat, 1);
        inventory.add(Item::WaterBottle, 1);

        vitals.consume(Item::CookedMeat, &mut inventory).unwrap();
        assert_eq!(vitals.hunger, 100.0);
        assert_eq!(vitals.health, 100.0);
        vitals.consume(Item::WaterBottle, &mut inventory).unwrap();
        assert_eq!(vitals.thirst, 60.0);
        assert!(inventory.is_empty());
    }

    #[test]
    fn consuming_checks_first() {
        let mut vitals = Vitals::new();
        let mut inventory = Inventory::starting();
        assert_eq!(
            vitals.consume(Item::Rock, &mut inventory),
            Err(ConsumeError::NotConsumable(Item::Rock))
        );
        assert!(matches!(
            vitals.consume(Item::RawBerries, &mut inventory),
            Err(ConsumeError::Missing(_))
        ));
        assert_eq!(inventory.count(Item::Rock), 1);
    }
}
