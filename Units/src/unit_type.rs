//! The read-only unit-type catalog.
//!
//! Each entry is a stat dictionary queried by the engine: class, move type
//! and movement points, vision, firing ranges, base combat numbers, ammo
//! and fuel defaults, trait strings, and an optional air-support profile
//! for squadrons that can fly missions. The standard table is exposed as a
//! shared registry so every subsystem queries the same data.

use crate::unit_class::UnitClass;
use hexmap::MoveType;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Roles an aircraft can fly in the air-mission subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirRole {
    Strike,
    Escort,
    Cap,
    Transport,
}

/// Air-support profile carried by mission-capable aircraft types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirSupportProfile {
    /// Mission roles this airframe may fly.
    pub roles: Vec<AirRole>,
    /// Combat radius in kilometers, checked against mission distance.
    pub combat_radius_km: f64,
    /// Turns a refit takes after the squadron runs dry.
    pub refit_turns: u32,
}

impl AirSupportProfile {
    /// Whether the profile covers the given role.
    pub fn has_role(&self, role: AirRole) -> bool {
        self.roles.contains(&role)
    }
}

/// Static stats for one unit type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitTypeStats {
    pub name: &'static str,
    pub class: UnitClass,
    pub move_type: MoveType,
    /// Base movement points per turn.
    pub movement: u32,
    /// Spotting radius in hexes.
    pub vision: u32,
    pub range_min: u32,
    pub range_max: u32,
    /// Offensive weight fed to the combat resolver.
    pub firepower: u32,
    /// Protective weight fed to the combat resolver.
    pub armor: u32,
    /// Base hit probability before modifiers (0.0 - 1.0).
    pub accuracy: f64,
    /// Onboard ammunition default.
    pub ammo: u32,
    /// Onboard fuel default.
    pub fuel: u32,
    /// Present on aircraft that can fly scheduled missions.
    pub air_support: Option<AirSupportProfile>,
    /// Free-form trait markers ("carpet" bombers, "anti_air" guns, "scout").
    pub traits: Vec<&'static str>,
}

impl UnitTypeStats {
    /// Whether this type carries a trait marker.
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| *t == name)
    }

    /// Whether this type fights from the air.
    pub fn is_air(&self) -> bool {
        self.class.is_air()
    }

    /// Carpet bombers get the heavy surface-attack multiplier and may only
    /// engage aircraft on retaliation.
    pub fn is_bomber(&self) -> bool {
        self.is_air() && self.has_trait("carpet")
    }

    /// Every non-bomber aircraft counts as a fighter for air-to-air
    /// multipliers.
    pub fn is_fighter(&self) -> bool {
        self.is_air() && !self.is_bomber()
    }

    /// Unarmed observation aircraft; their salvo pools start empty.
    pub fn is_scout(&self) -> bool {
        self.has_trait("scout")
    }

    /// Whether this type may target aircraft on its own attack (air units
    /// and explicit anti-air ground types such as `Flak_88`).
    pub fn can_target_air(&self) -> bool {
        self.is_air() || self.has_trait("anti_air")
    }
}

/// Read-only registry of unit types, keyed by type name.
///
/// # Examples
///
/// ```
/// use units::{UnitTypeCatalog, UnitClass};
///
/// let catalog = UnitTypeCatalog::standard();
/// let tank = catalog.stats("Panzer_IV").unwrap();
/// assert_eq!(tank.class, UnitClass::Tank);
/// assert!(catalog.stats("He_111").unwrap().is_bomber());
/// ```
#[derive(Debug, Clone)]
pub struct UnitTypeCatalog {
    types: HashMap<String, UnitTypeStats>,
}

impl UnitTypeCatalog {
    /// Build the standard type table.
    pub fn standard() -> Self {
        let mut types = HashMap::new();
        let mut add = |key: &str, stats: UnitTypeStats| {
            types.insert(key.to_string(), stats);
        };

        add(
            "Rifle_Infantry",
            UnitTypeStats {
                name: "Rifle Infantry",
                class: UnitClass::Infantry,
                move_type: MoveType::Leg,
                movement: 3,
                vision: 2,
                range_min: 1,
                range_max: 1,
                firepower: 12,
                armor: 4,
                accuracy: 0.55,
                ammo: 6,
                fuel: 0,
                air_support: None,
                traits: vec![],
            },
        );
        add(
            "Paratrooper",
            UnitTypeStats {
                name: "Paratrooper",
                class: UnitClass::Infantry,
                move_type: MoveType::Leg,
                movement: 3,
                vision: 2,
                range_min: 1,
                range_max: 1,
                firepower: 14,
                armor: 4,
                accuracy: 0.55,
                ammo: 6,
                fuel: 0,
                air_support: None,
                traits: vec!["airborne"],
            },
        );
        add(
            "Engineer_Platoon",
            UnitTypeStats {
                name: "Engineer Platoon",
                class: UnitClass::Specialist,
                move_type: MoveType::Leg,
                movement: 3,
                vision: 2,
                range_min: 1,
                range_max: 1,
                firepower: 10,
                armor: 5,
                accuracy: 0.50,
                ammo: 4,
                fuel: 0,
                air_support: None,
                traits: vec![],
            },
        );
        add(
            "Scout_Car",
            UnitTypeStats {
                name: "Scout Car",
                class: UnitClass::Recon,
                move_type: MoveType::Wheel,
                movement: 8,
                vision: 5,
                range_min: 1,
                range_max: 1,
                firepower: 10,
                armor: 8,
                accuracy: 0.50,
                ammo: 5,
                fuel: 40,
                air_support: None,
                traits: vec![],
            },
        );
        add(
            "Halftrack",
            UnitTypeStats {
                name: "Halftrack",
                class: UnitClass::Vehicle,
                move_type: MoveType::Track,
                movement: 6,
                vision: 2,
                range_min: 1,
                range_max: 1,
                firepower: 10,
                armor: 10,
                accuracy: 0.50,
                ammo: 6,
                fuel: 50,
                air_support: None,
                traits: vec![],
            },
        );
        add(
            "Panzer_IV",
            UnitTypeStats {
                name: "Panzer IV",
                class: UnitClass::Tank,
                move_type: MoveType::Track,
                movement: 6,
                vision: 3,
                range_min: 1,
                range_max: 1,
                firepower: 22,
                armor: 16,
                accuracy: 0.60,
                ammo: 8,
                fuel: 60,
                air_support: None,
                traits: vec![],
            },
        );
        add(
            "Howitzer_105",
            UnitTypeStats {
                name: "105mm Howitzer",
                class: UnitClass::Artillery,
                move_type: MoveType::Track,
                movement: 4,
                vision: 1,
                range_min: 2,
                range_max: 4,
                firepower: 26,
                armor: 6,
                accuracy: 0.55,
                ammo: 6,
                fuel: 30,
                air_support: None,
                traits: vec![],
            },
        );
        add(
            "Flak_88",
            UnitTypeStats {
                name: "88mm Flak",
                class: UnitClass::Artillery,
                move_type: MoveType::Track,
                movement: 4,
                vision: 2,
                range_min: 1,
                range_max: 3,
                firepower: 24,
                armor: 8,
                accuracy: 0.60,
                ammo: 6,
                fuel: 30,
                air_support: None,
                traits: vec!["anti_air"],
            },
        );
        add(
            "Bf_109",
            UnitTypeStats {
                name: "Bf 109",
                class: UnitClass::Air,
                move_type: MoveType::Air,
                movement: 10,
                vision: 5,
                range_min: 1,
                range_max: 1,
                firepower: 18,
                armor: 10,
                accuracy: 0.65,
                ammo: 4,
                fuel: 100,
                air_support: Some(AirSupportProfile {
                    roles: vec![AirRole::Escort, AirRole::Cap, AirRole::Strike],
                    combat_radius_km: 120.0,
                    refit_turns: 2,
                }),
                traits: vec![],
            },
        );
        add(
            "Ju_87",
            UnitTypeStats {
                name: "Ju 87 Stuka",
                class: UnitClass::Air,
                move_type: MoveType::Air,
                movement: 9,
                vision: 4,
                range_min: 1,
                range_max: 1,
                firepower: 20,
                armor: 8,
                accuracy: 0.60,
                ammo: 4,
                fuel: 100,
                air_support: Some(AirSupportProfile {
                    roles: vec![AirRole::Strike],
                    combat_radius_km: 100.0,
                    refit_turns: 2,
                }),
                traits: vec![],
            },
        );
        add(
            "He_111",
            UnitTypeStats {
                name: "He 111",
                class: UnitClass::Air,
                move_type: MoveType::Air,
                movement: 8,
                vision: 3,
                range_min: 1,
                range_max: 1,
                firepower: 26,
                armor: 9,
                accuracy: 0.50,
                ammo: 4,
                fuel: 140,
                air_support: Some(AirSupportProfile {
                    roles: vec![AirRole::Strike],
                    combat_radius_km: 160.0,
                    refit_turns: 3,
                }),
                traits: vec!["carpet"],
            },
        );
        add(
            "Ju_52",
            UnitTypeStats {
                name: "Ju 52",
                class: UnitClass::Air,
                move_type: MoveType::Air,
                movement: 8,
                vision: 3,
                range_min: 0,
                range_max: 0,
                firepower: 0,
                armor: 7,
                accuracy: 0.0,
                ammo: 0,
                fuel: 120,
                air_support: Some(AirSupportProfile {
                    roles: vec![AirRole::Transport],
                    combat_radius_km: 140.0,
                    refit_turns: 2,
                }),
                traits: vec![],
            },
        );
        add(
            "Storch",
            UnitTypeStats {
                name: "Fi 156 Storch",
                class: UnitClass::Air,
                move_type: MoveType::Air,
                movement: 9,
                vision: 6,
                range_min: 0,
                range_max: 0,
                firepower: 0,
                armor: 5,
                accuracy: 0.0,
                ammo: 0,
                fuel: 80,
                air_support: Some(AirSupportProfile {
                    roles: vec![],
                    combat_radius_km: 90.0,
                    refit_turns: 1,
                }),
                traits: vec!["scout"],
            },
        );

        Self { types }
    }

    /// Stats for a type key, if registered.
    pub fn stats(&self, key: &str) -> Option<&UnitTypeStats> {
        self.types.get(key)
    }

    /// Whether the key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    /// All registered type keys in sorted order.
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.types.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for UnitTypeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

lazy_static! {
    /// Shared standard catalog instance.
    pub static ref STANDARD_CATALOG: UnitTypeCatalog = UnitTypeCatalog::standard();
}
