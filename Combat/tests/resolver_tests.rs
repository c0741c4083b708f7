/// Regression tests pinning the resolver's numbers for catalog match-ups.
///
/// These fixtures exist so any change to the resolution formula shows up as
/// an explicit diff against recorded expectations.
use combat::{
    facing_aspect, resolve_expected, retaliation_multiplier, AttackerContext, CombatantProfile,
    DefenderContext, Engagement, FacingAspect,
};
use hexmap::HexCoord;
use units::{Facing, STANDARD_CATALOG};

fn profile(key: &str) -> CombatantProfile {
    CombatantProfile::from_stats(STANDARD_CATALOG.stats(key).unwrap())
}

#[test]
fn test_rifle_versus_rifle_recorded_numbers() {
    let rifle = profile("Rifle_Infantry");
    let outcome = resolve_expected(
        &rifle,
        &AttackerContext::default(),
        &rifle,
        &DefenderContext::default(),
    );
    assert!((outcome.accuracy - 0.55).abs() < 1e-9);
    assert!((outcome.damage_per_hit - 8.571428571428571).abs() < 1e-9);
    assert!((outcome.expected_damage - 4.714285714285714).abs() < 1e-9);
    // Infantry suppression ratio is 0.5.
    assert!((outcome.expected_suppression - 2.357142857142857).abs() < 1e-9);
    // Rounded into applied damage by the standard engagement: 5.
    assert_eq!(Engagement::Standard.apply(outcome.expected_damage), 5);
}

#[test]
fn test_panzer_versus_entrenched_infantry() {
    let panzer = profile("Panzer_IV");
    let rifle = profile("Rifle_Infantry");
    let defender_ctx = DefenderContext {
        terrain_defense: 20,
        entrench: 2,
        ..DefenderContext::default()
    };
    let outcome = resolve_expected(&panzer, &AttackerContext::default(), &rifle, &defender_ctx);
    // 0.60 base accuracy against 30% cover.
    assert!((outcome.accuracy - 0.42).abs() < 1e-9);
    assert!((outcome.damage_per_hit - 220.0 / 14.0).abs() < 1e-9);
}

#[test]
fn test_bomber_surface_run_uses_ceil_multiplier() {
    let bomber = profile("He_111");
    let rifle = profile("Rifle_Infantry");
    let outcome = resolve_expected(
        &bomber,
        &AttackerContext::default(),
        &rifle,
        &DefenderContext::default(),
    );
    let engagement = Engagement::classify(&bomber, false);
    assert_eq!(engagement, Engagement::BomberVsSurface);
    let applied = engagement.apply(outcome.expected_damage);
    assert_eq!(applied, (outcome.expected_damage * 10.0).ceil() as u32);
    assert!(applied >= 1);
}

#[test]
fn test_weak_bomber_run_still_lands_one_point() {
    // A mauled bomber against hard cover: expected damage under a point.
    let bomber = profile("He_111");
    let rifle = profile("Rifle_Infantry");
    let attacker_ctx = AttackerContext {
        strength: 5,
        ..AttackerContext::default()
    };
    let defender_ctx = DefenderContext {
        terrain_defense: 60,
        entrench: 4,
        ..DefenderContext::default()
    };
    let outcome = resolve_expected(&bomber, &attacker_ctx, &rifle, &defender_ctx);
    assert!(outcome.expected_damage < 1.0);
    assert!(Engagement::BomberVsSurface.apply(outcome.expected_damage) >= 1);
}

#[test]
fn test_fighter_bounce_multipliers() {
    let fighter = profile("Bf_109");
    let bomber = profile("He_111");

    assert_eq!(Engagement::classify(&fighter, true), Engagement::FighterVsAir);
    // Bomber return fire against a fighter: x2.
    assert!((retaliation_multiplier(&bomber, &fighter) - 2.0).abs() < f64::EPSILON);
    // Fighter bounced by a fighter: x4.
    assert!((retaliation_multiplier(&fighter, &fighter) - 4.0).abs() < f64::EPSILON);
}

#[test]
fn test_aspect_from_board_positions() {
    let defender = HexCoord::new(0, 0);
    assert_eq!(
        facing_aspect(HexCoord::new(0, -3), defender, Facing::N),
        FacingAspect::Front
    );
    assert_eq!(
        facing_aspect(HexCoord::new(0, 3), defender, Facing::N),
        FacingAspect::Rear
    );
    assert_eq!(
        facing_aspect(HexCoord::new(3, 0), defender, Facing::N),
        FacingAspect::Flank
    );
}

#[test]
fn test_spotted_only_penalty_applies() {
    let howitzer = profile("Howitzer_105");
    let panzer = profile("Panzer_IV");
    let direct = resolve_expected(
        &howitzer,
        &AttackerContext::default(),
        &panzer,
        &DefenderContext::default(),
    );
    let indirect = resolve_expected(
        &howitzer,
        &AttackerContext {
            spotted_only: true,
            ..AttackerContext::default()
        },
        &panzer,
        &DefenderContext::default(),
    );
    assert!((indirect.accuracy - direct.accuracy * 0.85).abs() < 1e-9);
    // Artillery suppresses harder than it destroys.
    assert!(direct.expected_suppression > direct.expected_damage);
}
