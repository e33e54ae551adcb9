//! Player resource counts.
//!
//! Counts are keyed by [`Item`] and never go negative: every removal checks
//! sufficiency before touching anything, and multi-item removals are
//! all-or-nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wildstead_core::Item;

/// Not enough of an item for a requested removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not enough {item}: need {required}, have {available}")]
pub struct Shortage {
    /// Item that ran short.
    pub item: Item,
    /// Amount the operation needed.
    pub required: u32,
    /// Amount actually held.
    pub available: u32,
}

/// Item counts held by the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: BTreeMap<Item, u32>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// The kit every new player starts with: one rock.
    pub fn starting() -> Self {
        let mut inventory = Self::new();
        inventory.add(Item::Rock, 1);
        inventory
    }

    /// Held amount of `item` (zero when absent).
    pub fn count(&self, item: Item) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Whether at least `amount` of `item` is held.
    pub fn has(&self, item: Item, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Add items, saturating at `u32::MAX`.
    pub fn add(&mut self, item: Item, amount: u32) {
        if amount == 0 {
            return;
        }
        let entry = self.counts.entry(item).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Remove `amount` of `item`, or nothing at all if not enough is held.
    pub fn remove(&mut self, item: Item, amount: u32) -> Result<(), Shortage> {
        self.check(item, amount)?;
        self.take_unchecked(item, amount);
        Ok(())
    }

    /// Remove every listed amount, or nothing at all if any is short.
    pub fn remove_all(&mut self, required: &BTreeMap<Item, u32>) -> Result<(), Shortage> {
        self.check_all(required)?;
        for (item, amount) in required {
            self.take_unchecked(*item, *amount);
        }
        Ok(())
    }

    /// First shortage among `required`, in item order.
    pub fn check_all(&self, required: &BTreeMap<Item, u32>) -> Result<(), Shortage> {
        required
            .iter()
            .try_for_each(|(item, amount)| self.check(*item, *amount))
    }

    /// Held items with non-zero counts, in item order.
    pub fn iter(&self) -> impl Iterator<Item = (Item, u32)> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(item, count)| (*item, *count))
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    fn check(&self, item: Item, amount: u32) -> Result<(), Shortage> {
        let available = self.count(item);
        if available < amount {
            return Err(Shortage {
                item,
                required: amount,
                available,
            });
        }
        Ok(())
    }

    fn take_unchecked(&mut self, item: Item, amount: u32) {
        if let Some(count) = self.counts.get_mut(&item) {
            *count -= amount;
            if *count == 0 {
                self.counts.remove(&item);
            }
        }
    }
}
