//! On-map unit instances and reserve bookkeeping.

use crate::unit_class::Facing;
use crate::unit_type::UnitTypeStats;
use hexmap::HexCoord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit placed on the battlefield (or waiting in a reserve queue).
///
/// The `unit_id` is stable for the unit's whole life: generated at
/// creation, preserved across moves and serialization, and used as the
/// squadron key for air-mission assignment locks.
///
/// # Examples
///
/// ```
/// use hexmap::HexCoord;
/// use units::{Unit, STANDARD_CATALOG};
///
/// let stats = STANDARD_CATALOG.stats("Rifle_Infantry").unwrap();
/// let unit = Unit::new("Rifle_Infantry", stats, HexCoord::new(0, 0));
/// assert!(unit.unit_id.starts_with("u_"));
/// assert_eq!(unit.strength, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_id: String,
    /// Catalog key of the unit type.
    #[serde(rename = "type")]
    pub type_key: String,
    pub hex: HexCoord,
    /// Combat strength, 0-100. Strength 0 removes the unit from play.
    pub strength: u32,
    pub experience: u32,
    pub ammo: u32,
    pub fuel: u32,
    pub entrench: u32,
    pub facing: Facing,
}

impl Unit {
    /// Create a new unit of the given type at a hex, with a fresh stable id
    /// and catalog-default ammo and fuel.
    pub fn new(type_key: &str, stats: &UnitTypeStats, hex: HexCoord) -> Self {
        Self {
            unit_id: new_unit_id(),
            type_key: type_key.to_string(),
            hex,
            strength: 100,
            experience: 0,
            ammo: stats.ammo,
            fuel: stats.fuel,
            entrench: 0,
            facing: Facing::default(),
        }
    }

    /// Whether the unit is still in fighting condition.
    pub fn is_alive(&self) -> bool {
        self.strength > 0
    }

    /// Apply damage, clamping strength at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.strength = self.strength.saturating_sub(amount);
    }
}

/// Generate a fresh stable unit id in the `u_<hex>` shape the
/// serialization contract requires.
pub fn new_unit_id() -> String {
    format!("u_{}", Uuid::new_v4().simple())
}

/// Whether a key has the stable-id shape (as opposed to a legacy hex key).
pub fn is_stable_unit_key(key: &str) -> bool {
    key.starts_with("u_") && !key.contains(',')
}

/// An undeployed unit waiting in a reserve queue.
///
/// Ordinary reserves deploy at the base camp during the deployment phase;
/// airborne reserves load at an airbase and enter play through transport
/// missions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveEntry {
    pub unit: Unit,
    /// Catalog key the reserve was allocated from.
    pub definition: String,
    /// Scenario allocation key, preserved across deploy/recall round trips.
    pub allocation_key: Option<String>,
    /// Optional sprite hint for external presentation layers.
    pub sprite: Option<String>,
}

impl ReserveEntry {
    pub fn new(unit: Unit, definition: &str) -> Self {
        Self {
            unit,
            definition: definition.to_string(),
            allocation_key: None,
            sprite: None,
        }
    }

    pub fn with_allocation_key(mut self, key: &str) -> Self {
        self.allocation_key = Some(key.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_type::UnitTypeCatalog;

    #[test]
    fn test_unit_ids_are_unique_and_stable_shaped() {
        let catalog = UnitTypeCatalog::standard();
        let stats = catalog.stats("Rifle_Infantry").unwrap();
        let a = Unit::new("Rifle_Infantry", stats, HexCoord::new(0, 0));
        let b = Unit::new("Rifle_Infantry", stats, HexCoord::new(1, 0));
        assert_ne!(a.unit_id, b.unit_id);
        assert!(is_stable_unit_key(&a.unit_id));
        assert!(!is_stable_unit_key("3,-4"));
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let catalog = UnitTypeCatalog::standard();
        let stats = catalog.stats("Rifle_Infantry").unwrap();
        let mut unit = Unit::new("Rifle_Infantry", stats, HexCoord::new(0, 0));
        unit.take_damage(250);
        assert_eq!(unit.strength, 0);
        assert!(!unit.is_alive());
    }
}
