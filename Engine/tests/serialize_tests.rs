/// Integration tests for the serialization contract and hydration,
/// including the legacy hex-key upgrade path.
use airops::MissionKind;
use engine::{AirMissionRequest, BattleConfig, BattleEngine, SerializedAirMission};
use hexmap::HexCoord;
use units::Faction;

fn hex(q: i32, r: i32) -> HexCoord {
    HexCoord::new(q, r)
}

fn battle() -> BattleEngine {
    let mut engine = BattleEngine::new(BattleConfig::open_field(10));
    engine.place_bot_unit("Rifle_Infantry", hex(0, 4)).unwrap();
    engine.place_bot_unit("Panzer_IV", hex(2, 2)).unwrap();
    engine.add_reserve("Rifle_Infantry", Some("alpha")).unwrap();
    engine.add_reserve("Ju_87", None).unwrap();
    engine
        .add_airborne_reserve("Paratrooper", Some("airborneDetachment"))
        .unwrap();
    engine.set_base_camp(hex(0, 3)).unwrap();
    engine.deploy_unit(hex(0, 0), 0).unwrap();
    engine.deploy_unit(hex(1, 0), 0).unwrap();
    engine.finalize_deployment().unwrap();
    engine.start_player_turn_phase().unwrap();
    engine
}

#[test]
fn test_serialize_hydrate_round_trip_is_stable() {
    let mut engine = battle();
    // Build up some state worth keeping: an attack and a queued mission.
    engine.attack_unit(hex(0, 0), hex(0, 4)).ok();
    engine
        .try_schedule_air_mission(&AirMissionRequest {
            kind: MissionKind::Strike,
            faction: Faction::Player,
            unit_hex: hex(1, 0),
            target_hex: Some(hex(2, 2)),
            escort_target_hex: None,
        })
        .unwrap();

    let stored = engine.serialize();
    let mut revived = BattleEngine::from_serialized(BattleConfig::open_field(10), &stored).unwrap();
    let round_tripped = revived.serialize();
    assert_eq!(stored, round_tripped);

    // The revived engine answers snapshots identically.
    let original_roster = engine.get_roster_snapshot();
    let revived_roster = revived.get_roster_snapshot();
    assert_eq!(original_roster.player, revived_roster.player);
    assert_eq!(original_roster.bot, revived_roster.bot);
    assert_eq!(original_roster.reserves, revived_roster.reserves);

    let original_missions = engine.get_scheduled_air_missions(None);
    let revived_missions = revived.get_scheduled_air_missions(None);
    assert_eq!(original_missions, revived_missions);

    let original_support = engine.get_support_snapshot();
    let revived_support = revived.get_support_snapshot();
    assert_eq!(original_support, revived_support);
}

#[test]
fn test_hydration_rebuilds_supply_mirrors() {
    let mut engine = battle();
    let stored = engine.serialize();
    let mut revived = BattleEngine::from_serialized(BattleConfig::open_field(10), &stored).unwrap();

    // The revived engine runs a clean supply tick over the rebuilt
    // mirrors without losing anybody.
    let report = revived.end_turn().unwrap().unwrap();
    assert_eq!(report.faction, Faction::Player);
    assert!(report.out_of_supply.is_empty());
}

#[test]
fn test_legacy_hex_mission_keys_are_upgraded() {
    let mut engine = battle();
    let stored_unit_id = engine
        .get_roster_snapshot()
        .player
        .iter()
        .find(|entry| entry.hex_key == hex(1, 0).key())
        .map(|entry| entry.unit_id.clone())
        .unwrap();

    let mut stored = engine.serialize();
    stored.air_missions.push(SerializedAirMission {
        id: "m_40".to_string(),
        kind: "strike".to_string(),
        faction: "player".to_string(),
        // Legacy saves keyed missions by origin hex.
        unit_key: hex(1, 0).key(),
        origin_hex_key: hex(1, 0).key(),
        unit_type: "Ju_87".to_string(),
        status: "queued".to_string(),
        launch_turn: 1,
        turns_remaining: 0,
        target_hex: Some(hex(2, 2)),
        target_unit_key: None,
        escort_target_unit_key: None,
        interceptions: 0,
        outcome: None,
    });

    let revived = BattleEngine::from_serialized(BattleConfig::open_field(10), &stored).unwrap();
    let mission = revived
        .get_scheduled_air_missions(Some(Faction::Player))
        .into_iter()
        .find(|m| m.id == "m_40")
        .unwrap();
    assert!(mission.unit_key.starts_with("u_"));
    assert_eq!(mission.unit_key, stored_unit_id);
}

#[test]
fn test_hydration_rejects_malformed_states() {
    let engine = battle();
    let mut bad_phase = engine.serialize();
    bad_phase.phase = "intermission".to_string();
    assert!(BattleEngine::from_serialized(BattleConfig::open_field(10), &bad_phase).is_err());

    let mut bad_faction = engine.serialize();
    bad_faction.active_faction = "neutral".to_string();
    assert!(BattleEngine::from_serialized(BattleConfig::open_field(10), &bad_faction).is_err());
}

#[test]
fn test_serialized_state_survives_json() {
    let engine = battle();
    let stored = engine.serialize();
    let json = serde_json::to_string(&stored).unwrap();
    let parsed: engine::SerializedBattleState = serde_json::from_str(&json).unwrap();
    assert_eq!(stored, parsed);
}
