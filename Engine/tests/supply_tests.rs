/// Integration tests for the supply tick: shipments, production, upkeep
/// draws, and out-of-supply attrition.
use engine::{BattleConfig, BattleEngine};
use hexmap::{BattleMap, HexCoord, TerrainKind};
use supply::{Resource, Shipment};
use units::Faction;

fn hex(q: i32, r: i32) -> HexCoord {
    HexCoord::new(q, r)
}

fn field_engine(config: BattleConfig, player: &[(&str, HexCoord)]) -> BattleEngine {
    let mut engine = BattleEngine::new(config);
    engine.place_bot_unit("Rifle_Infantry", hex(0, -5)).unwrap();
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
fn test_connected_units_draw_upkeep_from_the_depot() {
    let mut engine = field_engine(
        BattleConfig::open_field(6),
        &[("Panzer_IV", hex(0, 2))],
    );
    let before = engine.get_supply_snapshot(Faction::Player);
    let report = engine.end_turn().unwrap().unwrap();

    assert!(report.out_of_supply.is_empty());
    // Tanks draw ammo, fuel, rations, and parts every turn.
    assert_eq!(report.upkeep_drawn.len(), 4);
    let after = engine.get_supply_snapshot(Faction::Player);
    assert!(after.inventory.fuel.current < before.inventory.fuel.current);
    assert!(after.inventory.ammo.current < before.inventory.ammo.current);

    let history = engine.get_supply_history(Faction::Player);
    assert!(!history.is_empty());
}

#[test]
fn test_cut_off_units_suffer_attrition() {
    // A mountain wall at q == 2 isolates the eastern salient from the
    // base camp.
    let mut map = BattleMap::open(6, TerrainKind::Plains);
    for q in -6..=6 {
        for r in -6..=6 {
            let coord = hex(q, r);
            if q == 2 && map.in_bounds(coord) {
                map.set_kind(coord, TerrainKind::Mountains);
            }
        }
    }
    let config = BattleConfig::new(map);
    let mut engine = field_engine(config, &[("Rifle_Infantry", hex(4, 0))]);

    let report = engine.end_turn().unwrap().unwrap();
    assert_eq!(report.out_of_supply.len(), 1);
    assert_eq!(report.attrition.len(), 1);
    let attrition = &report.attrition[0];
    assert!((attrition.strength_lost - 2.0).abs() < 1e-9);
    assert!((attrition.ammo_lost - 1.0).abs() < 1e-9);

    let roster = engine.get_roster_snapshot();
    let cut_off = roster
        .player
        .iter()
        .find(|entry| entry.hex_key == hex(4, 0).key())
        .unwrap();
    assert_eq!(cut_off.strength, 98);
    assert_eq!(cut_off.ammo, 5);
}

#[test]
fn test_commander_supply_bonus_scales_attrition() {
    let mut map = BattleMap::open(6, TerrainKind::Plains);
    for q in -6..=6 {
        for r in -6..=6 {
            let coord = hex(q, r);
            if q == 2 && map.in_bounds(coord) {
                map.set_kind(coord, TerrainKind::Mountains);
            }
        }
    }
    let mut config = BattleConfig::new(map);
    config.commander.supply_bonus_pct = 50.0;
    let mut engine = field_engine(config, &[("Rifle_Infantry", hex(4, 0))]);

    let report = engine.end_turn().unwrap().unwrap();
    let attrition = &report.attrition[0];
    // Half the losses under a 50% supply commander.
    assert!((attrition.strength_lost - 1.0).abs() < 1e-9);
    assert!((attrition.ammo_lost - 0.5).abs() < 1e-9);
}

#[test]
fn test_shipments_deliver_at_their_eta() {
    let mut engine = field_engine(
        BattleConfig::open_field(6),
        &[("Rifle_Infantry", hex(0, 2))],
    );
    engine.add_supply_shipment(
        Faction::Player,
        Shipment {
            resource: Resource::Ammo,
            amount: 25.0,
            eta_turn: 2,
        },
    );

    // Turn 1 tick: the convoy is still on the road.
    let report = engine.end_turn().unwrap().unwrap();
    assert!(report.delivered.is_empty());
    let pending = engine.get_supply_snapshot(Faction::Player).pending_shipments;
    assert_eq!(pending.len(), 1);

    // Turn 2 tick: delivered.
    let report = engine.end_turn().unwrap().unwrap();
    assert_eq!(report.delivered.len(), 1);
    assert!((report.delivered[0].amount - 25.0).abs() < 1e-9);
    assert!(engine
        .get_supply_snapshot(Faction::Player)
        .pending_shipments
        .is_empty());
}

#[test]
fn test_production_credits_elapsed_turns() {
    let mut engine = field_engine(
        BattleConfig::open_field(6),
        &[("Rifle_Infantry", hex(0, 2))],
    );
    // First tick runs at the baseline turn; nothing has elapsed yet.
    let report = engine.end_turn().unwrap().unwrap();
    assert!(report.produced.is_empty());
    // Second tick credits one turn of production.
    let report = engine.end_turn().unwrap().unwrap();
    assert!(!report.produced.is_empty());
    let ammo = report
        .produced
        .iter()
        .find(|(resource, _)| *resource == Resource::Ammo)
        .unwrap();
    assert!((ammo.1 - 4.0).abs() < 1e-9);
}

#[test]
fn test_logistics_snapshot_splits_connected_and_cut_off() {
    let mut map = BattleMap::open(6, TerrainKind::Plains);
    for q in -6..=6 {
        for r in -6..=6 {
            let coord = hex(q, r);
            if q == 2 && map.in_bounds(coord) {
                map.set_kind(coord, TerrainKind::Mountains);
            }
        }
    }
    let config = BattleConfig::new(map);
    let mut engine = field_engine(
        config,
        &[("Rifle_Infantry", hex(0, 2)), ("Rifle_Infantry", hex(4, 0))],
    );
    let logistics = engine.get_logistics_snapshot();
    assert_eq!(logistics.player.sources, vec![hex(0, 3).key()]);
    assert_eq!(logistics.player.connected_units.len(), 1);
    assert_eq!(logistics.player.disconnected_units.len(), 1);
    // The bot has no HQ configured here, so nothing is in supply.
    assert!(logistics.bot.connected_units.is_empty());
}
