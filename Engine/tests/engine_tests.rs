/// Integration tests for the phase machine, deployment bookkeeping,
/// movement budgets, and the ground attack exchange.
use engine::{BattleConfig, BattleEngine, BattlePhase, EngineError};
use hexmap::HexCoord;
use units::Faction;

fn hex(q: i32, r: i32) -> HexCoord {
    HexCoord::new(q, r)
}

/// An engine mid-battle: the listed player units deployed, the listed bot
/// units placed, base camp at (0, 3), player turn open.
fn battle(player: &[(&str, HexCoord)], bots: &[(&str, HexCoord)]) -> BattleEngine {
    let mut engine = BattleEngine::new(BattleConfig::open_field(8));
    for (type_key, at) in bots {
        engine.place_bot_unit(type_key, *at).unwrap();
    }
    for (type_key, _) in player {
        engine.add_reserve(type_key, None).unwrap();
    }
    engine.set_base_camp(hex(0, 3)).unwrap();
    for (_, at) in player {
        engine.deploy_unit(*at, 0).unwrap();
    }
    engine.finalize_deployment().unwrap();
    engine.start_player_turn_phase().unwrap();
    engine
}

#[test]
fn test_move_rejected_during_deployment_then_allowed() {
    let mut engine = BattleEngine::new(BattleConfig::open_field(8));
    engine.add_reserve("Rifle_Infantry", None).unwrap();
    engine.set_base_camp(hex(0, 3)).unwrap();
    engine.deploy_unit(hex(0, 0), 0).unwrap();

    // Still in deployment: movement is a phase error.
    let err = engine.move_unit(hex(0, 0), hex(0, 1)).unwrap_err();
    assert!(matches!(err, EngineError::Phase { .. }));

    engine.finalize_deployment().unwrap();
    engine.start_player_turn_phase().unwrap();

    let resolution = engine.move_unit(hex(0, 0), hex(0, 1)).unwrap();
    assert_eq!(resolution.cost, 1);
    let budget = engine.get_movement_budget(hex(0, 1)).unwrap();
    assert_eq!(budget.used, 1);
    assert_eq!(budget.remaining, budget.effective - 1);
}

#[test]
fn test_finalize_requires_base_camp() {
    let mut engine = BattleEngine::new(BattleConfig::open_field(4));
    engine.add_reserve("Rifle_Infantry", None).unwrap();
    assert_eq!(engine.finalize_deployment().unwrap_err(), EngineError::NoBaseCamp);
}

#[test]
fn test_deploy_then_recall_restores_reserves() {
    let mut engine = BattleEngine::new(BattleConfig::open_field(6));
    engine.add_reserve("Rifle_Infantry", Some("alpha")).unwrap();
    engine.add_reserve("Panzer_IV", Some("bravo")).unwrap();
    engine.set_base_camp(hex(0, 2)).unwrap();
    let before: Vec<(String, Option<String>)> = engine
        .reserves()
        .iter()
        .map(|entry| (entry.unit.unit_id.clone(), entry.allocation_key.clone()))
        .collect();

    engine.deploy_unit(hex(1, 0), 0).unwrap();
    engine.recall_unit(hex(1, 0)).unwrap();

    let after: Vec<(String, Option<String>)> = engine
        .reserves()
        .iter()
        .map(|entry| (entry.unit.unit_id.clone(), entry.allocation_key.clone()))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_deploy_rejects_occupied_and_out_of_bounds() {
    let mut engine = BattleEngine::new(BattleConfig::open_field(4));
    engine.place_bot_unit("Rifle_Infantry", hex(1, 1)).unwrap();
    engine.add_reserve("Rifle_Infantry", None).unwrap();
    engine.set_base_camp(hex(0, 2)).unwrap();

    assert_eq!(
        engine.deploy_unit(hex(1, 1), 0).unwrap_err(),
        EngineError::Occupied
    );
    assert_eq!(
        engine.deploy_unit(hex(9, 9), 0).unwrap_err(),
        EngineError::OutOfBounds
    );
    assert_eq!(
        engine.deploy_unit(hex(0, 0), 7).unwrap_err(),
        EngineError::ReserveIndexOutOfRange(7)
    );
}

#[test]
fn test_movement_budget_is_exact_bound() {
    let mut engine = battle(&[("Rifle_Infantry", hex(0, 0))], &[]);
    let budget = engine.get_movement_budget(hex(0, 0)).unwrap();
    assert_eq!(budget.effective, 3);

    // Exactly-budget paths are accepted.
    let reachable = engine.get_reachable_hexes(hex(0, 0));
    assert!(reachable.contains(&hex(0, -3)));
    // One hex past the budget is not.
    assert!(!reachable.contains(&hex(0, -4)));
    assert_eq!(
        engine.move_unit(hex(0, 0), hex(0, -4)).unwrap_err(),
        EngineError::NotReachable
    );
    engine.move_unit(hex(0, 0), hex(0, -3)).unwrap();
    // Budget spent to the last point.
    assert_eq!(engine.get_movement_budget(hex(0, -3)).unwrap().remaining, 0);
}

#[test]
fn test_ground_units_cannot_path_through_occupied_hexes() {
    // A rifle squad walled in by bot units can only leave to the south.
    let engine = battle(
        &[("Rifle_Infantry", hex(0, 0))],
        &[
            ("Rifle_Infantry", hex(0, -1)),
            ("Rifle_Infantry", hex(1, -1)),
            ("Rifle_Infantry", hex(1, 0)),
            ("Rifle_Infantry", hex(-1, 0)),
            ("Rifle_Infantry", hex(-1, 1)),
        ],
    );
    let reachable = engine.get_reachable_hexes(hex(0, 0));
    assert!(reachable.contains(&hex(0, 1)));
    // The hex behind the northern blocker is only reachable by going
    // around; with budget 3 and the cordon, it stays out of reach.
    assert!(!reachable.contains(&hex(0, -2)));
    // No occupied hex is ever a destination.
    for taken in [hex(0, -1), hex(1, -1), hex(1, 0)] {
        assert!(!reachable.contains(&taken));
    }
}

#[test]
fn test_rush_mode_extends_infantry_budget() {
    let mut engine = battle(&[("Rifle_Infantry", hex(0, 0))], &[]);
    assert!(engine.toggle_rush_mode(hex(0, 0)).unwrap());
    assert_eq!(engine.get_movement_budget(hex(0, 0)).unwrap().effective, 4);
    assert!(!engine.toggle_rush_mode(hex(0, 0)).unwrap());
    assert_eq!(engine.get_movement_budget(hex(0, 0)).unwrap().effective, 3);
}

#[test]
fn test_adjacent_attack_with_retaliation() {
    let mut engine = battle(
        &[("Rifle_Infantry", hex(0, 0))],
        &[("Rifle_Infantry", hex(0, 1))],
    );

    let first = engine.attack_unit(hex(0, 0), hex(0, 1)).unwrap();
    // Pinned resolver numbers: 8.5714 damage/hit at 0.55 accuracy.
    assert_eq!(first.inflicted, 5);
    assert!(!first.defender_destroyed);
    // The defender answers into the attacker's rear arc.
    assert_eq!(first.retaliation_inflicted, Some(5));
    assert!(first.retaliation_note.is_none());

    let mut roster = engine.get_roster_snapshot();
    let attacker = roster.player.remove(0);
    let defender = roster.bot.remove(0);
    assert_eq!(attacker.strength, 95);
    assert_eq!(defender.strength, 95);
    // Both sides spent a round.
    assert_eq!(attacker.ammo, 5);
    assert_eq!(defender.ammo, 5);
    assert_eq!(defender.flags.retaliations_used, 1);

    // A second exchange this turn finds the defender out of answers.
    let second = engine.attack_unit(hex(0, 0), hex(0, 1)).unwrap();
    assert!(second.retaliation_inflicted.is_none());
    assert_eq!(
        second.retaliation_note.as_deref(),
        Some("already retaliated this turn")
    );

    let reports = engine.get_combat_reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].inflicted, 5);
}

#[test]
fn test_artillery_standoff_and_post_attack_restrictions() {
    let mut engine = battle(
        &[("Howitzer_105", hex(0, 0))],
        &[
            ("Rifle_Infantry", hex(0, 1)),
            ("Rifle_Infantry", hex(0, 3)),
        ],
    );
    // Adjacent target sits under the howitzer's minimum range.
    assert_eq!(
        engine.attack_unit(hex(0, 0), hex(0, 1)).unwrap_err(),
        EngineError::RangeRestriction
    );
    let resolution = engine.attack_unit(hex(0, 0), hex(0, 3)).unwrap();
    assert!(resolution.inflicted > 0);
    // Retaliation out of the rifle's reach.
    assert!(resolution.retaliation_note.is_some());

    // Artillery is frozen in place after firing.
    assert_eq!(
        engine.move_unit(hex(0, 0), hex(0, -1)).unwrap_err(),
        EngineError::PostAttackRestriction
    );
}

#[test]
fn test_moving_past_half_budget_forbids_attacking() {
    let mut engine = battle(
        &[("Panzer_IV", hex(0, 0))],
        &[("Rifle_Infantry", hex(0, 5))],
    );
    // Panzer budget 6; rolling 4 hexes is past the half mark.
    engine.move_unit(hex(0, 0), hex(0, 4)).unwrap();
    assert_eq!(
        engine.attack_unit(hex(0, 4), hex(0, 5)).unwrap_err(),
        EngineError::MovedTooFarToAttack
    );
}

#[test]
fn test_attack_eligibility_uses_the_scaled_budget() {
    // A mobility commander stretches the tank's budget to ceil(6 x 1.5)
    // = 9, so a four-hex roll stays inside the half-budget mark that
    // would forbid attacking at the stock budget of 6.
    let scaled_battle = || {
        let mut config = BattleConfig::open_field(8);
        config.commander.move_scalar = 1.5;
        let mut engine = BattleEngine::new(config);
        engine.place_bot_unit("Rifle_Infantry", hex(0, 5)).unwrap();
        engine.add_reserve("Panzer_IV", None).unwrap();
        engine.set_base_camp(hex(0, -3)).unwrap();
        engine.deploy_unit(hex(0, 0), 0).unwrap();
        engine.finalize_deployment().unwrap();
        engine.start_player_turn_phase().unwrap();
        engine
    };

    let mut engine = scaled_battle();
    assert_eq!(engine.get_movement_budget(hex(0, 0)).unwrap().base, 9);
    engine.move_unit(hex(0, 0), hex(0, 4)).unwrap();
    let resolution = engine.attack_unit(hex(0, 4), hex(0, 5)).unwrap();
    assert!(resolution.inflicted > 0);

    // Five hexes is past half of nine: too spent to fire.
    let mut engine = scaled_battle();
    engine.move_unit(hex(0, 0), hex(1, 4)).unwrap();
    assert_eq!(
        engine.attack_unit(hex(1, 4), hex(0, 5)).unwrap_err(),
        EngineError::MovedTooFarToAttack
    );
}

#[test]
fn test_ground_cannot_target_air_but_flak_can() {
    let mut engine = battle(
        &[
            ("Panzer_IV", hex(0, 0)),
            ("Flak_88", hex(1, 0)),
        ],
        &[("Bf_109", hex(0, 1))],
    );
    assert_eq!(
        engine.attack_unit(hex(0, 0), hex(0, 1)).unwrap_err(),
        EngineError::CannotTargetAir
    );
    let resolution = engine.attack_unit(hex(1, 0), hex(0, 1)).unwrap();
    assert!(resolution.inflicted > 0);
}

#[test]
fn test_end_turn_round_trip() {
    let mut engine = battle(
        &[("Rifle_Infantry", hex(0, 0))],
        &[("Rifle_Infantry", hex(0, 6))],
    );
    assert_eq!(engine.turn_number(), 1);
    let report = engine.end_turn().unwrap().unwrap();
    assert_eq!(report.faction, Faction::Player);
    assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
    assert_eq!(engine.active_faction(), Faction::Player);
    assert_eq!(engine.turn_number(), 2);

    // Ending the turn twice keeps advancing cleanly.
    engine.end_turn().unwrap();
    assert_eq!(engine.turn_number(), 3);
}

#[test]
fn test_bot_closes_distance_during_end_turn() {
    let mut engine = battle(
        &[("Rifle_Infantry", hex(0, 0))],
        &[("Rifle_Infantry", hex(0, 4))],
    );
    engine.end_turn().unwrap();
    let roster = engine.get_roster_snapshot();
    let bot_hex = HexCoord::parse_key(&roster.bot[0].hex_key).unwrap();
    assert!(bot_hex.distance(hex(0, 0)) < 4);
}

#[test]
fn test_completed_battle_rejects_mutations() {
    let mut engine = battle(&[("Rifle_Infantry", hex(0, 0))], &[]);
    engine.complete_battle();
    assert!(matches!(
        engine.move_unit(hex(0, 0), hex(0, 1)).unwrap_err(),
        EngineError::Phase { .. }
    ));
    assert!(matches!(
        engine.end_turn().unwrap_err(),
        EngineError::Phase { .. }
    ));
}

#[test]
fn test_attacking_with_enemy_unit_is_not_your_turn() {
    let mut engine = battle(
        &[("Rifle_Infantry", hex(0, 0))],
        &[("Rifle_Infantry", hex(0, 1))],
    );
    assert_eq!(
        engine.move_unit(hex(0, 1), hex(0, 2)).unwrap_err(),
        EngineError::NotYourTurn
    );
}

#[test]
fn test_idle_units_dig_in_over_turns() {
    let mut engine = battle(
        &[("Rifle_Infantry", hex(0, 0))],
        &[("Rifle_Infantry", hex(0, 6))],
    );
    engine.end_turn().unwrap();
    let roster = engine.get_roster_snapshot();
    assert_eq!(roster.player[0].entrench, 1);
}
