use criterion::{criterion_group, criterion_main, Criterion};
use engine::{BattleConfig, BattleEngine};
use hexmap::HexCoord;

fn build_engine() -> BattleEngine {
    let mut engine = BattleEngine::new(BattleConfig::open_field(16));
    // Scatter some blockers so the search has to route around units.
    for (index, hex) in [
        HexCoord::new(1, -1),
        HexCoord::new(2, 0),
        HexCoord::new(-2, 1),
        HexCoord::new(0, 3),
        HexCoord::new(3, -2),
    ]
    .iter()
    .enumerate()
    {
        let type_key = if index % 2 == 0 {
            "Rifle_Infantry"
        } else {
            "Panzer_IV"
        };
        engine.place_bot_unit(type_key, *hex).unwrap();
    }
    engine.add_reserve("Panzer_IV", None).unwrap();
    engine.set_base_camp(HexCoord::new(0, 5)).unwrap();
    engine.deploy_unit(HexCoord::new(0, 0), 0).unwrap();
    engine.finalize_deployment().unwrap();
    engine.start_player_turn_phase().unwrap();
    engine
}

fn bench_reachable(c: &mut Criterion) {
    let engine = build_engine();
    c.bench_function("reachable_hexes_tank", |b| {
        b.iter(|| engine.get_reachable_hexes(HexCoord::new(0, 0)))
    });
}

criterion_group!(benches, bench_reachable);
criterion_main!(benches);
