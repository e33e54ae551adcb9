//! Structure placement.
//!
//! Placed pieces are world-owned rather than chunk-owned: they stay attached
//! when the chunk beneath them is evicted.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec3;
use thiserror::Error;
use tracing::info;
use wildstead_core::{BuildingKind, BuildingSpec, Item};

use crate::inventory::{Inventory, Shortage};
use crate::scene::{RenderHandle, Renderable, SceneSink};

/// How far ahead of the player the preview sits.
pub const PREVIEW_DISTANCE: f64 = 5.0;

/// Preview height below the player's eye.
pub const PREVIEW_DROP: f64 = 2.0;

/// Placement grid spacing.
pub const GRID_SIZE: f64 = 2.0;

/// Closest two placed pieces may be.
pub const MIN_SPACING: f64 = 2.0;

/// Snap to the placement grid, rounding halves up.
fn snap(value: f64) -> f64 {
    (value / GRID_SIZE + 0.5).floor() * GRID_SIZE
}

/// Where a piece would go for a player at `eye` looking along `yaw`.
pub fn preview_position(eye: DVec3, yaw: f64) -> DVec3 {
    let forward = DVec3::new(-yaw.sin(), 0.0, -yaw.cos());
    let ahead = eye + forward * PREVIEW_DISTANCE;
    DVec3::new(snap(ahead.x), eye.y - PREVIEW_DROP, snap(ahead.z))
}

/// Rejected placements. Nothing is consumed in any case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// The recipe book has no entry for this piece.
    #[error("no building entry for {0}")]
    UnknownBuilding(BuildingKind),
    /// Another piece is too close.
    #[error("cannot build at {0}: too close to another building")]
    Blocked(DVec3),
    /// A required material is missing.
    #[error("cannot build: {0}")]
    Missing(#[from] Shortage),
}

/// A piece standing in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBuilding {
    pub kind: BuildingKind,
    pub position: DVec3,
    /// Yaw in radians, a multiple of a quarter turn.
    pub rotation: f64,
    pub render: RenderHandle,
}

/// Placed pieces and the current preview rotation.
#[derive(Debug, Default)]
pub struct BuildSite {
    placed: Vec<PlacedBuilding>,
    rotation: f64,
}

impl BuildSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotation the next piece will be placed with.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Turn the preview a quarter turn.
    pub fn rotate(&mut self) -> f64 {
        self.rotation = (self.rotation + FRAC_PI_2).rem_euclid(TAU);
        self.rotation
    }

    /// Whether no placed piece is within [`MIN_SPACING`] of `position`.
    pub fn can_place(&self, position: DVec3) -> bool {
        self.placed
            .iter()
            .all(|building| building.position.distance(position) >= MIN_SPACING)
    }

    /// Place a piece at `position`, spending its materials.
    ///
    /// A building plan listed with `returns_plan` is handed back afterwards,
    /// so it must be held but is not used up.
    pub fn place(
        &mut self,
        spec: &BuildingSpec,
        position: DVec3,
        inventory: &mut Inventory,
        scene: &mut dyn SceneSink,
    ) -> Result<&PlacedBuilding, BuildError> {
        if !self.can_place(position) {
            return Err(BuildError::Blocked(position));
        }
        inventory.remove_all(&spec.requires)?;
        if spec.returns_plan && spec.requires.contains_key(&Item::BuildingPlan) {
            inventory.add(Item::BuildingPlan, 1);
        }

        let render = scene.attach(Renderable::Building {
            kind: spec.kind,
            position,
            rotation: self.rotation,
        });
        self.placed.push(PlacedBuilding {
            kind: spec.kind,
            position,
            rotation: self.rotation,
            render,
        });
        info!(kind = %spec.kind, x = position.x, z = position.z, "built {}", spec.name);
        Ok(&self.placed[self.placed.len() - 1])
    }

    /// Placed pieces in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedBuilding> + '_ {
        self.placed.iter()
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;
    use wildstead_core::RecipeBook;

    fn stocked(wood: u32) -> Inventory {
        let mut inventory = Inventory::new();
        inventory.add(Item::Wood, wood);
        inventory.add(Item::BuildingPlan, 1);
        inventory
    }

    #[test]
    fn preview_snaps_ahead_of_player() {
        // Facing -z at yaw 0.
        let pos = preview_position(DVec3::new(0.3, 2.0, 5.0), 0.0);
        assert_eq!(pos, DVec3::new(0.0, 0.0, 0.0));

        // Facing -x at a quarter turn.
        let pos = preview_position(DVec3::new(10.0, 3.0, 0.0), FRAC_PI_2);
        assert_eq!(pos, DVec3::new(6.0, 1.0, 0.0));
    }

    #[test]
    fn snapping_rounds_halves_up() {
        assert_eq!(snap(1.0), 2.0);
        assert_eq!(snap(-1.0), 0.0);
        assert_eq!(snap(-1.2), -2.0);
        assert_eq!(snap(2.9), 2.0);
    }

    #[test]
    fn placing_spends_wood_and_returns_the_plan() {
        let book = RecipeBook::builtin();
        let spec = book.building(BuildingKind::Wall).unwrap();
        let mut site = BuildSite::new();
        let mut scene = RecordingScene::new();
        let mut inventory = stocked(10);

        let placed = site
            .place(spec, DVec3::ZERO, &mut inventory, &mut scene)
            .unwrap()
            .clone();
        assert_eq!(placed.kind, BuildingKind::Wall);
        assert!(scene.is_live(placed.render));
        assert_eq!(inventory.count(Item::Wood), 2);
        assert_eq!(inventory.count(Item::BuildingPlan), 1);
    }

    #[test]
    fn crowded_spot_is_blocked() {
        let book = RecipeBook::builtin();
        let spec = book.building(BuildingKind::Floor).unwrap();
        let mut site = BuildSite::new();
        let mut scene = RecordingScene::new();
        let mut inventory = stocked(40);

        site.place(spec, DVec3::ZERO, &mut inventory, &mut scene).unwrap();
        let err = site
            .place(spec, DVec3::new(1.0, 0.0, 1.0), &mut inventory, &mut scene)
            .unwrap_err();
        assert!(matches!(err, BuildError::Blocked(_)));
        assert_eq!(inventory.count(Item::Wood), 32);

        site.place(spec, DVec3::new(2.0, 0.0, 0.0), &mut inventory, &mut scene)
            .unwrap();
        assert_eq!(site.len(), 2);
    }

    #[test]
    fn plan_is_required() {
        let book = RecipeBook::builtin();
        let spec = book.building(BuildingKind::Roof).unwrap();
        let mut site = BuildSite::new();
        let mut scene = RecordingScene::new();
        let mut inventory = Inventory::new();
        inventory.add(Item::Wood, 50);

        let err = site
            .place(spec, DVec3::ZERO, &mut inventory, &mut scene)
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Missing(Shortage {
                item: Item::BuildingPlan,
                ..
            })
        ));
        assert_eq!(inventory.count(Item::Wood), 50);
        assert!(site.is_empty());
    }

    #[test]
    fn rotation_cycles_in_quarter_turns() {
        let mut site = BuildSite::new();
        for _ in 0..4 {
            site.rotate();
        }
        assert!(site.rotation().abs() < 1e-9 || (site.rotation() - TAU).abs() < 1e-9);
        assert!((site.rotate() - FRAC_PI_2).abs() < 1e-9);
    }
}
