//! Combat input structures: combatant profiles and attack contexts.

use hexmap::HexCoord;
use serde::{Deserialize, Serialize};
use units::{Facing, UnitClass, UnitTypeStats};

/// The resolver-facing view of one combatant, extracted from catalog stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantProfile {
    pub class: UnitClass,
    pub firepower: u32,
    pub armor: u32,
    /// Base hit probability before modifiers (0.0 - 1.0).
    pub accuracy: f64,
    pub is_bomber: bool,
    pub is_fighter: bool,
}

impl CombatantProfile {
    /// Build a profile from catalog stats.
    pub fn from_stats(stats: &UnitTypeStats) -> Self {
        Self {
            class: stats.class,
            firepower: stats.firepower,
            armor: stats.armor,
            accuracy: stats.accuracy,
            is_bomber: stats.is_bomber(),
            is_fighter: stats.is_fighter(),
        }
    }

    pub fn is_air(&self) -> bool {
        self.class.is_air()
    }
}

/// Which arc the attack arrives through, relative to the defender's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacingAspect {
    Front,
    Flank,
    Rear,
}

impl FacingAspect {
    /// Accuracy multiplier for the aspect.
    pub fn accuracy_factor(self) -> f64 {
        match self {
            FacingAspect::Front => 1.0,
            FacingAspect::Flank => 1.1,
            FacingAspect::Rear => 1.2,
        }
    }
}

/// Determine the aspect an attack from `attacker_hex` presents to a
/// defender at `defender_hex` facing `defender_facing`.
///
/// The sector from the defender toward the attacker is compared with the
/// defender's facing sector; a circular offset of 0-1 is frontal, 2 is a
/// flank shot, 3 is a rear shot.
pub fn facing_aspect(
    attacker_hex: HexCoord,
    defender_hex: HexCoord,
    defender_facing: Facing,
) -> FacingAspect {
    let toward_attacker = defender_hex.bearing_sector(attacker_hex) as i32;
    let facing = defender_facing.sector() as i32;
    let clockwise = (toward_attacker - facing).rem_euclid(6);
    let offset = clockwise.min(6 - clockwise);
    match offset {
        0 | 1 => FacingAspect::Front,
        2 => FacingAspect::Flank,
        _ => FacingAspect::Rear,
    }
}

/// Attacker-side context for one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackerContext {
    /// Current strength, 0-100; scales expected damage.
    pub strength: u32,
    pub experience: u32,
    /// Firing on a spotter's data rather than own line of sight.
    pub spotted_only: bool,
    /// Commander accuracy bonus, percent.
    pub accuracy_bonus_pct: f64,
    /// Commander (or difficulty) damage bonus, percent.
    pub damage_bonus_pct: f64,
    pub aspect: FacingAspect,
}

impl Default for AttackerContext {
    fn default() -> Self {
        Self {
            strength: 100,
            experience: 0,
            spotted_only: false,
            accuracy_bonus_pct: 0.0,
            damage_bonus_pct: 0.0,
            aspect: FacingAspect::Front,
        }
    }
}

/// Defender-side context for one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenderContext {
    pub strength: u32,
    pub experience: u32,
    /// Terrain cover percentage at the defender's hex.
    pub terrain_defense: u8,
    pub entrench: u32,
    /// Rushing units move faster but present an easier target.
    pub is_rushing: bool,
}

impl Default for DefenderContext {
    fn default() -> Self {
        Self {
            strength: 100,
            experience: 0,
            terrain_defense: 0,
            entrench: 0,
            is_rushing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_aspect_arcs() {
        let defender = HexCoord::new(0, 0);
        // Defender faces north; an attack from the north is frontal.
        assert_eq!(
            facing_aspect(HexCoord::new(0, -2), defender, Facing::N),
            FacingAspect::Front
        );
        // From due south: rear.
        assert_eq!(
            facing_aspect(HexCoord::new(0, 2), defender, Facing::N),
            FacingAspect::Rear
        );
        // Two sectors off: flank.
        assert_eq!(
            facing_aspect(HexCoord::new(2, 0), defender, Facing::N),
            FacingAspect::Flank
        );
    }
}
