//! Unit classification and facing.

use serde::{Deserialize, Serialize};

/// Broad combat classification of a unit type.
///
/// Class drives upkeep tables, movement/attack interaction (artillery may
/// not move after firing), air targeting rules, and the bot heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitClass {
    Infantry,
    Specialist,
    Vehicle,
    Tank,
    Artillery,
    Air,
    Recon,
}

impl UnitClass {
    /// Whether this class fights from the air.
    pub fn is_air(self) -> bool {
        matches!(self, UnitClass::Air)
    }
}

/// Hex facing on a flat-top grid.
///
/// The variant order matches `hexmap::coords::DIRECTIONS`, so a bearing
/// sector converts directly into a facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    N,
    NE,
    SE,
    S,
    SW,
    NW,
}

impl Facing {
    /// All facings in sector order.
    pub fn all() -> &'static [Facing] {
        &[
            Facing::N,
            Facing::NE,
            Facing::SE,
            Facing::S,
            Facing::SW,
            Facing::NW,
        ]
    }

    /// The direction sector (0..6) this facing points toward.
    pub fn sector(self) -> usize {
        match self {
            Facing::N => 0,
            Facing::NE => 1,
            Facing::SE => 2,
            Facing::S => 3,
            Facing::SW => 4,
            Facing::NW => 5,
        }
    }

    /// Facing for a direction sector (0..6, wrapping).
    pub fn from_sector(sector: usize) -> Facing {
        Facing::all()[sector % 6]
    }
}

impl Default for Facing {
    fn default() -> Self {
        Facing::N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_sector_round_trip() {
        for facing in Facing::all() {
            assert_eq!(Facing::from_sector(facing.sector()), *facing);
        }
    }

    #[test]
    fn test_only_air_class_flies() {
        assert!(UnitClass::Air.is_air());
        assert!(!UnitClass::Tank.is_air());
        assert!(!UnitClass::Artillery.is_air());
    }
}
