//! Battle configuration: the read-only inputs an engine is built from.

use bot::Difficulty;
use hexmap::{BattleMap, HexCoord, TerrainCatalog, TerrainKind};
use std::collections::HashMap;
use std::sync::Arc;
use units::{CommanderProfile, UnitTypeCatalog};

/// Kilometers represented by one hex, used for air combat radius checks.
pub const DEFAULT_KM_PER_HEX: f64 = 10.0;

/// Everything the engine needs that it does not own mutably: the map, the
/// shared catalogs, commander and difficulty settings, and scenario
/// geometry (HQs, objectives, airbase capacities).
#[derive(Clone)]
pub struct BattleConfig {
    pub map: BattleMap,
    pub terrain: Arc<TerrainCatalog>,
    pub unit_types: Arc<UnitTypeCatalog>,
    pub commander: CommanderProfile,
    pub difficulty: Difficulty,
    pub km_per_hex: f64,
    /// Seed for the auxiliary PRNG (scatter, ring shuffling).
    pub seed: u64,
    pub player_hq: Option<HexCoord>,
    pub bot_hq: Option<HexCoord>,
    /// Objective hexes the bot considers worth patrolling.
    pub objectives: Vec<HexCoord>,
    /// Optional per-hex cap on queued air departures.
    pub airbase_capacity: HashMap<HexCoord, u32>,
}

impl BattleConfig {
    /// A config over the given map with standard catalogs and neutral
    /// settings.
    pub fn new(map: BattleMap) -> Self {
        Self {
            map,
            terrain: Arc::new(TerrainCatalog::standard()),
            unit_types: Arc::new(UnitTypeCatalog::standard()),
            commander: CommanderProfile::default(),
            difficulty: Difficulty::normal(),
            km_per_hex: DEFAULT_KM_PER_HEX,
            seed: 0,
            player_hq: None,
            bot_hq: None,
            objectives: Vec::new(),
            airbase_capacity: HashMap::new(),
        }
    }

    /// A small open-plains config, handy for demos and tests.
    pub fn open_field(radius: i32) -> Self {
        Self::new(BattleMap::open(radius, TerrainKind::Plains))
    }
}
