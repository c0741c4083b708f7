//! Demo battle: deploy a small force, trade fire, fly a strike with CAP
//! overhead, and print the paper trail the engine keeps.

use hexfront::{AirMissionRequest, BattleConfig, BattleEngine, Faction, HexCoord};
use hexfront::airops::MissionKind;

fn main() {
    let mut engine = BattleEngine::new(BattleConfig::open_field(10));

    // Scenario setup: a bot screen with air cover on call.
    engine
        .place_bot_unit("Rifle_Infantry", HexCoord::new(0, -4))
        .expect("bot rifle placement");
    engine
        .place_bot_unit("Panzer_IV", HexCoord::new(2, -4))
        .expect("bot panzer placement");
    engine
        .place_bot_unit("Bf_109", HexCoord::new(4, -5))
        .expect("bot fighter placement");

    // The player's force pool.
    engine.add_reserve("Rifle_Infantry", Some("alpha")).expect("reserve");
    engine.add_reserve("Panzer_IV", Some("bravo")).expect("reserve");
    engine.add_reserve("Ju_87", Some("stuka")).expect("reserve");
    engine
        .add_airborne_reserve("Paratrooper", Some("airborneDetachment"))
        .expect("airborne reserve");

    engine.set_base_camp(HexCoord::new(0, 4)).expect("base camp");
    engine.deploy_unit_by_key(HexCoord::new(0, 0), "alpha").expect("deploy");
    engine.deploy_unit_by_key(HexCoord::new(1, 0), "bravo").expect("deploy");
    engine.deploy_unit_by_key(HexCoord::new(0, 3), "stuka").expect("deploy");
    let remaining = engine.finalize_deployment().expect("finalize");
    println!("deployment locked, {} squadron(s) still in reserve", remaining.len());
    engine.start_player_turn_phase().expect("start");

    // Turn 1: advance the rifles and cut a strike order for the Stukas.
    engine
        .move_unit(HexCoord::new(0, 0), HexCoord::new(0, -2))
        .expect("advance");
    let mission_id = engine
        .schedule_air_mission(&AirMissionRequest {
            kind: MissionKind::Strike,
            faction: Faction::Player,
            unit_hex: HexCoord::new(0, 3),
            target_hex: Some(HexCoord::new(2, -4)),
            escort_target_hex: None,
        })
        .expect("strike order");
    println!("strike order {} cut against the panzer position", mission_id);

    let report = engine.end_turn().expect("end turn 1").expect("supply report");
    println!(
        "turn {} opens; depot drew {:?} in upkeep",
        engine.turn_number(),
        report.upkeep_drawn
    );
    for arrival in engine.consume_air_mission_arrivals() {
        println!("mission {} is airborne ({:?})", arrival.mission_id, arrival.kind);
    }

    // Turn 2: the strike resolves during this end turn.
    engine.end_turn().expect("end turn 2");
    for engagement in engine.consume_air_engagements() {
        println!(
            "air battle over {}: {} intercepted by {:?}",
            engagement.location, engagement.bomber, engagement.interceptors
        );
    }
    for entry in engine.get_air_mission_reports() {
        println!(
            "air report: {} {} -> {:?} ({:?})",
            entry.mission_id,
            entry.unit_type,
            entry.outcome,
            entry.event
        );
    }
    for entry in engine.get_combat_reports() {
        println!(
            "combat report: {} hit {} for {} ({} destroyed: {})",
            entry.attacker_type,
            entry.defender_type,
            entry.inflicted,
            entry.defender_type,
            entry.defender_destroyed
        );
    }

    let roster = engine.get_roster_snapshot();
    println!("--- roster after turn {} ---", engine.turn_number());
    for entry in roster.player.iter() {
        println!(
            "player {:>16} at {:>6} str {:>3} ammo {}",
            entry.type_key, entry.hex_key, entry.strength, entry.ammo
        );
    }
    for entry in roster.bot.iter() {
        println!(
            "bot    {:>16} at {:>6} str {:>3} ammo {}",
            entry.type_key, entry.hex_key, entry.strength, entry.ammo
        );
    }

    // Save and revive the battle to show the round trip.
    let saved = engine.serialize_to_json().expect("save");
    let parsed = BattleEngine::parse_serialized_json(&saved).expect("parse");
    let revived = BattleEngine::from_serialized(BattleConfig::open_field(10), &parsed)
        .expect("revive");
    println!(
        "round trip ok: phase {:?}, turn {}",
        revived.phase(),
        revived.turn_number()
    );
}
