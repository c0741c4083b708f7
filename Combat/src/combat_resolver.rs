//! The expectation-based combat resolution algorithm.

use crate::combat_result::CombatExpectation;
use crate::combat_stats::{AttackerContext, CombatantProfile, DefenderContext};
use units::UnitClass;

/// Experience steps past this cap stop improving accuracy.
const EXPERIENCE_CAP: u32 = 5;
/// Accuracy gained per experience step.
const EXPERIENCE_STEP: f64 = 0.03;
/// Cover granted per entrenchment level, percent.
const ENTRENCH_COVER_STEP: f64 = 5.0;
/// Entrenchment levels past this cap grant no further cover.
const ENTRENCH_CAP: u32 = 4;
/// Total cover (terrain + entrenchment) is capped here, percent.
const COVER_CAP: f64 = 60.0;
/// Accuracy penalty when firing on spotter data only.
const SPOTTED_ONLY_FACTOR: f64 = 0.85;
/// Accuracy bonus against a rushing defender.
const RUSHING_TARGET_FACTOR: f64 = 1.10;

/// Resolve the expected outcome of a single attack.
///
/// The resolver is a pure function of its inputs: no sampling, no hidden
/// state. Accuracy combines the attacker's base accuracy with experience,
/// facing aspect, the defender's rushing exposure, spotting quality, and
/// the commander bonus, then is degraded by the defender's cover and
/// clamped to [0.05, 0.95]. Damage follows an armor-ratio curve scaled by
/// the attacker's remaining strength.
///
/// # Examples
///
/// ```
/// use combat::{resolve_expected, AttackerContext, CombatantProfile, DefenderContext};
/// use units::STANDARD_CATALOG;
///
/// let rifle = CombatantProfile::from_stats(STANDARD_CATALOG.stats("Rifle_Infantry").unwrap());
/// let outcome = resolve_expected(
///     &rifle,
///     &AttackerContext::default(),
///     &rifle,
///     &DefenderContext::default(),
/// );
/// assert!((outcome.accuracy - 0.55).abs() < 1e-9);
/// assert!(outcome.expected_damage > 0.0);
/// ```
pub fn resolve_expected(
    attacker: &CombatantProfile,
    attacker_ctx: &AttackerContext,
    defender: &CombatantProfile,
    defender_ctx: &DefenderContext,
) -> CombatExpectation {
    let experience_factor =
        1.0 + f64::from(attacker_ctx.experience.min(EXPERIENCE_CAP)) * EXPERIENCE_STEP;
    let aspect_factor = attacker_ctx.aspect.accuracy_factor();
    let rushing_factor = if defender_ctx.is_rushing {
        RUSHING_TARGET_FACTOR
    } else {
        1.0
    };
    let spotted_factor = if attacker_ctx.spotted_only {
        SPOTTED_ONLY_FACTOR
    } else {
        1.0
    };
    let commander_factor = 1.0 + attacker_ctx.accuracy_bonus_pct / 100.0;

    let cover = (f64::from(defender_ctx.terrain_defense)
        + f64::from(defender_ctx.entrench.min(ENTRENCH_CAP)) * ENTRENCH_COVER_STEP)
        .min(COVER_CAP);

    let accuracy = (attacker.accuracy
        * experience_factor
        * aspect_factor
        * rushing_factor
        * spotted_factor
        * commander_factor
        * (1.0 - cover / 100.0))
        .clamp(0.05, 0.95);

    let damage_per_hit =
        f64::from(attacker.firepower) * 10.0 / (10.0 + f64::from(defender.armor));
    let strength_factor = f64::from(attacker_ctx.strength) / 100.0;
    let damage_factor = 1.0 + attacker_ctx.damage_bonus_pct / 100.0;
    let expected_damage = damage_per_hit * accuracy * strength_factor * damage_factor;

    let suppression_ratio = match attacker.class {
        UnitClass::Artillery => 1.5,
        UnitClass::Air => 1.0,
        _ => 0.5,
    };
    let expected_suppression = expected_damage * suppression_ratio;

    CombatExpectation {
        damage_per_hit,
        expected_damage,
        expected_suppression,
        accuracy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_stats::FacingAspect;

    fn rifle() -> CombatantProfile {
        CombatantProfile {
            class: UnitClass::Infantry,
            firepower: 12,
            armor: 4,
            accuracy: 0.55,
            is_bomber: false,
            is_fighter: false,
        }
    }

    #[test]
    fn test_baseline_rifle_exchange() {
        let outcome = resolve_expected(
            &rifle(),
            &AttackerContext::default(),
            &rifle(),
            &DefenderContext::default(),
        );
        assert!((outcome.accuracy - 0.55).abs() < 1e-9);
        assert!((outcome.damage_per_hit - 120.0 / 14.0).abs() < 1e-9);
        assert!((outcome.expected_damage - (120.0 / 14.0) * 0.55).abs() < 1e-9);
        assert!((outcome.expected_suppression - outcome.expected_damage * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cover_and_entrenchment_degrade_accuracy() {
        let defender_ctx = DefenderContext {
            terrain_defense: 20,
            entrench: 2,
            ..DefenderContext::default()
        };
        let outcome = resolve_expected(
            &rifle(),
            &AttackerContext::default(),
            &rifle(),
            &defender_ctx,
        );
        // 20% terrain + 10% entrench cover -> accuracy 0.55 * 0.70
        assert!((outcome.accuracy - 0.55 * 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_cover_is_capped() {
        let defender_ctx = DefenderContext {
            terrain_defense: 80,
            entrench: 4,
            ..DefenderContext::default()
        };
        let outcome = resolve_expected(
            &rifle(),
            &AttackerContext::default(),
            &rifle(),
            &defender_ctx,
        );
        assert!((outcome.accuracy - 0.55 * 0.40).abs() < 1e-9);
    }

    #[test]
    fn test_rear_aspect_and_experience_raise_accuracy() {
        let attacker_ctx = AttackerContext {
            experience: 3,
            aspect: FacingAspect::Rear,
            ..AttackerContext::default()
        };
        let outcome = resolve_expected(
            &rifle(),
            &attacker_ctx,
            &rifle(),
            &DefenderContext::default(),
        );
        assert!((outcome.accuracy - 0.55 * 1.09 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_clamps() {
        let mut sniper = rifle();
        sniper.accuracy = 0.9;
        let attacker_ctx = AttackerContext {
            experience: 5,
            aspect: FacingAspect::Rear,
            accuracy_bonus_pct: 50.0,
            ..AttackerContext::default()
        };
        let outcome = resolve_expected(
            &sniper,
            &attacker_ctx,
            &rifle(),
            &DefenderContext::default(),
        );
        assert!((outcome.accuracy - 0.95).abs() < 1e-9);

        let mut blind = rifle();
        blind.accuracy = 0.01;
        let outcome = resolve_expected(
            &blind,
            &AttackerContext::default(),
            &rifle(),
            &DefenderContext::default(),
        );
        assert!((outcome.accuracy - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_damaged_attacker_hits_softer() {
        let weakened = AttackerContext {
            strength: 40,
            ..AttackerContext::default()
        };
        let full = resolve_expected(
            &rifle(),
            &AttackerContext::default(),
            &rifle(),
            &DefenderContext::default(),
        );
        let hurt = resolve_expected(&rifle(), &weakened, &rifle(), &DefenderContext::default());
        assert!((hurt.expected_damage - full.expected_damage * 0.4).abs() < 1e-9);
    }
}
