//! Upkeep and attrition tables.

use serde::{Deserialize, Serialize};
use units::UnitClass;

/// Per-turn upkeep cost of one unit, by resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpkeepProfile {
    pub ammo: f64,
    pub fuel: f64,
    pub rations: f64,
    pub parts: f64,
}

/// The upkeep table, keyed by unit class.
pub fn upkeep_for_class(class: UnitClass) -> UpkeepProfile {
    match class {
        UnitClass::Infantry => UpkeepProfile {
            ammo: 0.2,
            fuel: 0.0,
            rations: 0.3,
            parts: 0.0,
        },
        UnitClass::Specialist => UpkeepProfile {
            ammo: 0.2,
            fuel: 0.0,
            rations: 0.3,
            parts: 0.1,
        },
        UnitClass::Vehicle => UpkeepProfile {
            ammo: 0.2,
            fuel: 0.5,
            rations: 0.2,
            parts: 0.2,
        },
        UnitClass::Tank => UpkeepProfile {
            ammo: 0.4,
            fuel: 0.8,
            rations: 0.2,
            parts: 0.3,
        },
        UnitClass::Artillery => UpkeepProfile {
            ammo: 0.6,
            fuel: 0.3,
            rations: 0.2,
            parts: 0.2,
        },
        UnitClass::Air => UpkeepProfile {
            ammo: 0.5,
            fuel: 1.0,
            rations: 0.1,
            parts: 0.4,
        },
        UnitClass::Recon => UpkeepProfile {
            ammo: 0.2,
            fuel: 0.5,
            rations: 0.2,
            parts: 0.1,
        },
    }
}

/// What a disconnected unit loses each turn, before commander scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttritionProfile {
    pub ammo: f64,
    pub fuel: f64,
    pub entrench: u32,
    pub strength: f64,
}

/// The standard out-of-supply attrition profile.
pub fn out_of_supply_attrition() -> AttritionProfile {
    AttritionProfile {
        ammo: 1.0,
        fuel: 1.0,
        entrench: 1,
        strength: 2.0,
    }
}

/// Round a supply amount to two decimals, the precision every scaled draw
/// and attrition figure is recorded at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infantry_burns_no_fuel() {
        let upkeep = upkeep_for_class(UnitClass::Infantry);
        assert!(upkeep.fuel.abs() < f64::EPSILON);
        assert!(upkeep.rations > 0.0);
    }

    #[test]
    fn test_aircraft_are_the_thirstiest() {
        let air = upkeep_for_class(UnitClass::Air);
        for class in [
            UnitClass::Infantry,
            UnitClass::Specialist,
            UnitClass::Vehicle,
            UnitClass::Tank,
            UnitClass::Artillery,
            UnitClass::Recon,
        ] {
            assert!(air.fuel >= upkeep_for_class(class).fuel);
        }
    }

    #[test]
    fn test_round2() {
        assert!((round2(2.344) - 2.34).abs() < 1e-9);
        assert!((round2(2.346) - 2.35).abs() < 1e-9);
        assert!((round2(0.8 * 0.75) - 0.6).abs() < 1e-9);
    }
}
