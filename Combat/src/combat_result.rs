//! Expectation records and engagement multipliers.

use crate::combat_stats::CombatantProfile;
use serde::{Deserialize, Serialize};

/// The deterministic output of one combat resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatExpectation {
    /// Raw damage a single hit would inflict, before accuracy weighting.
    pub damage_per_hit: f64,
    /// Accuracy-weighted strength damage expected from the exchange.
    pub expected_damage: f64,
    /// Expected suppression, scaled by the attacker's class profile.
    pub expected_suppression: f64,
    /// Final hit probability after all modifiers (0.05 - 0.95).
    pub accuracy: f64,
}

/// The post-multiplier class of an engagement, applied by the engine on
/// top of the resolver expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engagement {
    /// Carpet bomber striking a surface target: x10, rounded up so even a
    /// weak run always scratches the target.
    BomberVsSurface,
    /// Fighter engaging an air target: x4, rounded to nearest.
    FighterVsAir,
    /// Everything else: x1, rounded to nearest.
    Standard,
}

impl Engagement {
    /// Classify an attack by attacker profile and target domain.
    pub fn classify(attacker: &CombatantProfile, defender_is_air: bool) -> Engagement {
        if attacker.is_bomber && !defender_is_air {
            Engagement::BomberVsSurface
        } else if attacker.is_fighter && defender_is_air {
            Engagement::FighterVsAir
        } else {
            Engagement::Standard
        }
    }

    /// The damage and suppression multiplier for this engagement.
    pub fn damage_multiplier(self) -> f64 {
        match self {
            Engagement::BomberVsSurface => 10.0,
            Engagement::FighterVsAir => 4.0,
            Engagement::Standard => 1.0,
        }
    }

    /// Scale an expected value by the multiplier and round it into applied
    /// strength damage. Bomber surface runs round up; everything else
    /// rounds to nearest.
    pub fn apply(self, expected: f64) -> u32 {
        let scaled = expected * self.damage_multiplier();
        let applied = match self {
            Engagement::BomberVsSurface => scaled.ceil(),
            _ => scaled.round(),
        };
        if applied <= 0.0 {
            0
        } else {
            applied as u32
        }
    }
}

/// The damage multiplier a defender's return fire carries.
///
/// Bombers defending themselves against aircraft shoot back at x2 (tail
/// guns); fighters bounced by fighters retaliate at full x4; every other
/// pairing retaliates at x1.
pub fn retaliation_multiplier(defender: &CombatantProfile, attacker: &CombatantProfile) -> f64 {
    if defender.is_bomber && attacker.is_air() {
        2.0
    } else if defender.is_fighter && attacker.is_fighter {
        4.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use units::UnitClass;

    fn profile(class: UnitClass, bomber: bool, fighter: bool) -> CombatantProfile {
        CombatantProfile {
            class,
            firepower: 20,
            armor: 10,
            accuracy: 0.5,
            is_bomber: bomber,
            is_fighter: fighter,
        }
    }

    #[test]
    fn test_engagement_classification() {
        let bomber = profile(UnitClass::Air, true, false);
        let fighter = profile(UnitClass::Air, false, true);
        let tank = profile(UnitClass::Tank, false, false);

        assert_eq!(
            Engagement::classify(&bomber, false),
            Engagement::BomberVsSurface
        );
        assert_eq!(Engagement::classify(&fighter, true), Engagement::FighterVsAir);
        assert_eq!(Engagement::classify(&fighter, false), Engagement::Standard);
        assert_eq!(Engagement::classify(&tank, false), Engagement::Standard);
        // Bombers never get the surface multiplier against aircraft.
        assert_eq!(Engagement::classify(&bomber, true), Engagement::Standard);
    }

    #[test]
    fn test_bomber_damage_rounds_up() {
        // expected 0.35 -> x10 = 3.5 -> ceil 4
        assert_eq!(Engagement::BomberVsSurface.apply(0.35), 4);
        // Even a sliver of expectation lands at least 1.
        assert_eq!(Engagement::BomberVsSurface.apply(0.01), 1);
        // Standard rounds to nearest and may be zero.
        assert_eq!(Engagement::Standard.apply(0.4), 0);
        assert_eq!(Engagement::Standard.apply(0.6), 1);
        // Fighter x4 rounds to nearest.
        assert_eq!(Engagement::FighterVsAir.apply(1.1), 4);
    }

    #[test]
    fn test_retaliation_multipliers() {
        let bomber = profile(UnitClass::Air, true, false);
        let fighter = profile(UnitClass::Air, false, true);
        let infantry = profile(UnitClass::Infantry, false, false);

        assert!((retaliation_multiplier(&bomber, &fighter) - 2.0).abs() < f64::EPSILON);
        assert!((retaliation_multiplier(&fighter, &fighter) - 4.0).abs() < f64::EPSILON);
        assert!((retaliation_multiplier(&infantry, &fighter) - 1.0).abs() < f64::EPSILON);
        assert!((retaliation_multiplier(&fighter, &infantry) - 1.0).abs() < f64::EPSILON);
    }
}
