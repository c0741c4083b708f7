//! The battle engine: single source of truth for all mutable battle state.
//!
//! `BattleEngine` owns placements, reserves, per-unit turn flags, both
//! supply ledgers, the air-mission board, the combat report buffer, and
//! the auxiliary PRNG. Every mutation validates first, applies second, and
//! finishes by invalidating the snapshot caches through one hook.

use crate::config::BattleConfig;
use crate::error::EngineError;
use crate::phase::BattlePhase;
use crate::reports::{CombatReportEntry, SupplyTickReport, COMBAT_REPORT_LIMIT};
use crate::snapshots::SnapshotCache;
use airops::AirMissionBoard;
use hexmap::HexCoord;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use supply::SupplyState;
use units::{Faction, ReserveEntry, Unit, UnitTypeStats};

/// Per-unit action flags, cleared at each faction's turn start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFlags {
    pub movement_points_used: u32,
    pub attacks_used: u32,
    pub retaliations_used: u32,
    pub is_rushing: bool,
}

/// Where a unit currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitLocation {
    Deployed(Faction, HexCoord),
    Reserve(usize),
    AirborneReserve(usize),
}

/// Bookkeeping needed to put a deployed unit back into the reserve queue
/// exactly as it left.
#[derive(Debug, Clone)]
pub(crate) struct ReserveMeta {
    pub definition: String,
    pub allocation_key: Option<String>,
    pub sprite: Option<String>,
    pub original_index: usize,
}

/// The deterministic battle state machine.
///
/// # Examples
///
/// ```
/// use engine::{BattleConfig, BattleEngine, BattlePhase};
/// use hexmap::HexCoord;
///
/// let mut engine = BattleEngine::new(BattleConfig::open_field(6));
/// engine.add_reserve("Rifle_Infantry", None).unwrap();
/// engine.set_base_camp(HexCoord::new(0, 2)).unwrap();
/// engine.deploy_unit(HexCoord::new(0, 0), 0).unwrap();
/// engine.finalize_deployment().unwrap();
/// engine.start_player_turn_phase().unwrap();
/// assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
/// ```
pub struct BattleEngine {
    pub(crate) config: BattleConfig,
    pub(crate) phase: BattlePhase,
    pub(crate) active_faction: Faction,
    pub(crate) turn_number: u32,
    pub(crate) base_camp: Option<HexCoord>,
    pub(crate) deployment_finalized: bool,
    pub(crate) player_units: HashMap<HexCoord, Unit>,
    pub(crate) bot_units: HashMap<HexCoord, Unit>,
    pub(crate) reserves: Vec<ReserveEntry>,
    pub(crate) airborne_reserves: Vec<ReserveEntry>,
    pub(crate) reserve_meta: HashMap<String, ReserveMeta>,
    pub(crate) turn_flags: HashMap<String, TurnFlags>,
    pub(crate) player_supply: SupplyState,
    pub(crate) bot_supply: SupplyState,
    pub(crate) air: AirMissionBoard,
    pub(crate) combat_reports: VecDeque<CombatReportEntry>,
    pub(crate) next_unit_seq: u64,
    pub(crate) next_combat_report_seq: u64,
    pub(crate) rng: StdRng,
    pub(crate) snapshots: SnapshotCache,
}

impl BattleEngine {
    /// Build a fresh engine in the deployment phase.
    pub fn new(config: BattleConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            phase: BattlePhase::Deployment,
            active_faction: Faction::Player,
            turn_number: 1,
            base_camp: None,
            deployment_finalized: false,
            player_units: HashMap::new(),
            bot_units: HashMap::new(),
            reserves: Vec::new(),
            airborne_reserves: Vec::new(),
            reserve_meta: HashMap::new(),
            turn_flags: HashMap::new(),
            player_supply: SupplyState::new(Faction::Player),
            bot_supply: SupplyState::new(Faction::Bot),
            air: AirMissionBoard::new(),
            combat_reports: VecDeque::new(),
            next_unit_seq: 1,
            next_combat_report_seq: 1,
            rng,
            snapshots: SnapshotCache::default(),
        }
    }

    // ------------------------------------------------------------------
    // State accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn active_faction(&self) -> Faction {
        self.active_faction
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn base_camp(&self) -> Option<HexCoord> {
        self.base_camp
    }

    pub fn reserves(&self) -> &[ReserveEntry] {
        &self.reserves
    }

    pub fn airborne_reserves(&self) -> &[ReserveEntry] {
        &self.airborne_reserves
    }

    /// Turn flags for a unit (zeroes when the unit has not acted).
    pub fn turn_flags_for(&self, unit_id: &str) -> TurnFlags {
        self.turn_flags.get(unit_id).copied().unwrap_or_default()
    }

    pub(crate) fn units(&self, faction: Faction) -> &HashMap<HexCoord, Unit> {
        match faction {
            Faction::Player => &self.player_units,
            Faction::Bot => &self.bot_units,
        }
    }

    pub(crate) fn units_mut(&mut self, faction: Faction) -> &mut HashMap<HexCoord, Unit> {
        match faction {
            Faction::Player => &mut self.player_units,
            Faction::Bot => &mut self.bot_units,
        }
    }

    pub(crate) fn supply_mut(&mut self, faction: Faction) -> &mut SupplyState {
        match faction {
            Faction::Player => &mut self.player_supply,
            Faction::Bot => &mut self.bot_supply,
        }
    }

    pub(crate) fn supply(&self, faction: Faction) -> &SupplyState {
        match faction {
            Faction::Player => &self.player_supply,
            Faction::Bot => &self.bot_supply,
        }
    }

    /// Deployed unit at a hex, either faction.
    pub fn unit_at(&self, hex: HexCoord) -> Option<(&Unit, Faction)> {
        if let Some(unit) = self.player_units.get(&hex) {
            return Some((unit, Faction::Player));
        }
        self.bot_units.get(&hex).map(|unit| (unit, Faction::Bot))
    }

    pub(crate) fn is_occupied(&self, hex: HexCoord) -> bool {
        self.player_units.contains_key(&hex) || self.bot_units.contains_key(&hex)
    }

    /// Placements of one faction, sorted by hex so iteration order never
    /// depends on hash order.
    pub(crate) fn sorted_placements(&self, faction: Faction) -> Vec<(HexCoord, Unit)> {
        let mut entries: Vec<(HexCoord, Unit)> = self
            .units(faction)
            .iter()
            .map(|(hex, unit)| (*hex, unit.clone()))
            .collect();
        entries.sort_by_key(|(hex, _)| *hex);
        entries
    }

    pub(crate) fn stats(&self, type_key: &str) -> Result<UnitTypeStats, EngineError> {
        self.config
            .unit_types
            .stats(type_key)
            .cloned()
            .ok_or_else(|| EngineError::UnknownUnitType(type_key.to_string()))
    }

    pub(crate) fn fresh_unit_id(&mut self) -> String {
        let id = format!("u_{}", self.next_unit_seq);
        self.next_unit_seq += 1;
        id
    }

    pub(crate) fn flags_mut(&mut self, unit_id: &str) -> &mut TurnFlags {
        self.turn_flags.entry(unit_id.to_string()).or_default()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.snapshots.invalidate();
    }

    pub(crate) fn phase_guard(
        &self,
        operation: &str,
        allowed: &[BattlePhase],
    ) -> Result<(), EngineError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EngineError::Phase {
                operation: operation.to_string(),
                phase: self.phase,
            })
        }
    }

    // ------------------------------------------------------------------
    // Unit location plumbing
    // ------------------------------------------------------------------

    /// Find a unit by stable id: deployed first, then the reserve queues.
    pub(crate) fn locate_unit(&self, faction: Faction, unit_id: &str) -> Option<UnitLocation> {
        for (hex, unit) in self.units(faction) {
            if unit.unit_id == unit_id {
                return Some(UnitLocation::Deployed(faction, *hex));
            }
        }
        if faction == Faction::Player {
            if let Some(index) = self.reserves.iter().position(|r| r.unit.unit_id == unit_id) {
                return Some(UnitLocation::Reserve(index));
            }
        }
        if let Some(index) = self
            .airborne_reserves
            .iter()
            .position(|r| r.unit.unit_id == unit_id)
        {
            return Some(UnitLocation::AirborneReserve(index));
        }
        None
    }

    pub(crate) fn unit_clone_at(&self, location: UnitLocation) -> Option<Unit> {
        match location {
            UnitLocation::Deployed(faction, hex) => self.units(faction).get(&hex).cloned(),
            UnitLocation::Reserve(index) => self.reserves.get(index).map(|r| r.unit.clone()),
            UnitLocation::AirborneReserve(index) => {
                self.airborne_reserves.get(index).map(|r| r.unit.clone())
            }
        }
    }

    pub(crate) fn with_unit_mut<F: FnOnce(&mut Unit)>(
        &mut self,
        location: UnitLocation,
        apply: F,
    ) -> bool {
        match location {
            UnitLocation::Deployed(faction, hex) => {
                if let Some(unit) = self.units_mut(faction).get_mut(&hex) {
                    apply(unit);
                    return true;
                }
                false
            }
            UnitLocation::Reserve(index) => {
                if let Some(entry) = self.reserves.get_mut(index) {
                    apply(&mut entry.unit);
                    return true;
                }
                false
            }
            UnitLocation::AirborneReserve(index) => {
                if let Some(entry) = self.airborne_reserves.get_mut(index) {
                    apply(&mut entry.unit);
                    return true;
                }
                false
            }
        }
    }

    /// Remove a destroyed unit from play: placement or reserve slot, supply
    /// mirror, turn flags, and any squadron assignment lock.
    pub(crate) fn destroy_unit(&mut self, faction: Faction, location: UnitLocation) {
        let removed = match location {
            UnitLocation::Deployed(faction, hex) => self.units_mut(faction).remove(&hex),
            UnitLocation::Reserve(index) => {
                if index < self.reserves.len() {
                    Some(self.reserves.remove(index).unit)
                } else {
                    None
                }
            }
            UnitLocation::AirborneReserve(index) => {
                if index < self.airborne_reserves.len() {
                    Some(self.airborne_reserves.remove(index).unit)
                } else {
                    None
                }
            }
        };
        if let Some(unit) = removed {
            log::info!(
                "{} unit {} ({}) destroyed",
                faction.as_str(),
                unit.unit_id,
                unit.type_key
            );
            self.supply_mut(faction).mirror_remove(&unit.unit_id);
            self.turn_flags.remove(&unit.unit_id);
            self.air.clear_assignment(&unit.unit_id);
        }
        self.mark_dirty();
    }

    // ------------------------------------------------------------------
    // Deployment
    // ------------------------------------------------------------------

    /// Enter (or confirm) the deployment phase. Valid only before the
    /// first finalize.
    pub fn begin_deployment(&mut self) -> Result<(), EngineError> {
        self.phase_guard("begin_deployment", &[BattlePhase::Deployment])?;
        log::info!("deployment phase open");
        Ok(())
    }

    /// Allocate a reserve unit of the given type.
    pub fn add_reserve(
        &mut self,
        type_key: &str,
        allocation_key: Option<&str>,
    ) -> Result<String, EngineError> {
        self.phase_guard("add_reserve", &[BattlePhase::Deployment])?;
        let stats = self.stats(type_key)?;
        let id = self.fresh_unit_id();
        let mut unit = Unit::new(type_key, &stats, HexCoord::new(0, 0));
        unit.unit_id = id.clone();
        let mut entry = ReserveEntry::new(unit, type_key);
        if let Some(key) = allocation_key {
            entry = entry.with_allocation_key(key);
        }
        self.reserves.push(entry);
        self.mark_dirty();
        Ok(id)
    }

    /// Allocate an airborne reserve (loaded at an airbase, dropped by
    /// transport missions).
    pub fn add_airborne_reserve(
        &mut self,
        type_key: &str,
        allocation_key: Option<&str>,
    ) -> Result<String, EngineError> {
        self.phase_guard("add_airborne_reserve", &[BattlePhase::Deployment])?;
        let stats = self.stats(type_key)?;
        let id = self.fresh_unit_id();
        let mut unit = Unit::new(type_key, &stats, HexCoord::new(0, 0));
        unit.unit_id = id.clone();
        let mut entry = ReserveEntry::new(unit, type_key);
        if let Some(key) = allocation_key {
            entry = entry.with_allocation_key(key);
        }
        self.airborne_reserves.push(entry);
        self.mark_dirty();
        Ok(id)
    }

    /// Place a bot unit directly (scenario setup).
    pub fn place_bot_unit(&mut self, type_key: &str, hex: HexCoord) -> Result<String, EngineError> {
        self.phase_guard("place_bot_unit", &[BattlePhase::Deployment])?;
        if !self.config.map.in_bounds(hex) {
            return Err(EngineError::OutOfBounds);
        }
        if self.is_occupied(hex) {
            return Err(EngineError::Occupied);
        }
        let stats = self.stats(type_key)?;
        let id = self.fresh_unit_id();
        let mut unit = Unit::new(type_key, &stats, hex);
        unit.unit_id = id.clone();
        self.bot_supply.mirror_insert(&id, type_key, stats.class);
        self.bot_units.insert(hex, unit);
        self.mark_dirty();
        Ok(id)
    }

    /// Choose the Player's base camp: supply source and rearm point.
    pub fn set_base_camp(&mut self, hex: HexCoord) -> Result<(), EngineError> {
        self.phase_guard("set_base_camp", &[BattlePhase::Deployment])?;
        if !self.config.map.in_bounds(hex) {
            return Err(EngineError::OutOfBounds);
        }
        self.base_camp = Some(hex);
        self.mark_dirty();
        Ok(())
    }

    /// Deploy a reserve by queue index.
    pub fn deploy_unit(&mut self, hex: HexCoord, reserve_index: usize) -> Result<(), EngineError> {
        self.phase_guard("deploy_unit", &[BattlePhase::Deployment])?;
        if reserve_index >= self.reserves.len() {
            return Err(EngineError::ReserveIndexOutOfRange(reserve_index));
        }
        if !self.config.map.in_bounds(hex) {
            return Err(EngineError::OutOfBounds);
        }
        if self.is_occupied(hex) {
            return Err(EngineError::Occupied);
        }
        let class = self.stats(&self.reserves[reserve_index].unit.type_key)?.class;
        let entry = self.reserves.remove(reserve_index);
        let ReserveEntry {
            mut unit,
            definition,
            allocation_key,
            sprite,
        } = entry;
        self.reserve_meta.insert(
            unit.unit_id.clone(),
            ReserveMeta {
                definition,
                allocation_key,
                sprite,
                original_index: reserve_index,
            },
        );
        unit.hex = hex;
        self.player_supply
            .mirror_insert(&unit.unit_id, &unit.type_key, class);
        self.player_units.insert(hex, unit);
        self.mark_dirty();
        Ok(())
    }

    /// Deploy a reserve by stable unit id or allocation key.
    pub fn deploy_unit_by_key(&mut self, hex: HexCoord, unit_key: &str) -> Result<(), EngineError> {
        self.phase_guard("deploy_unit_by_key", &[BattlePhase::Deployment])?;
        let index = self
            .reserves
            .iter()
            .position(|entry| {
                entry.unit.unit_id == unit_key
                    || entry.allocation_key.as_deref() == Some(unit_key)
            })
            .ok_or_else(|| EngineError::Input(format!("no reserve with key '{}'", unit_key)))?;
        self.deploy_unit(hex, index)
    }

    /// Undo a deployment: return the unit to the reserve queue with its
    /// allocation key and (when possible) its original position.
    pub fn recall_unit(&mut self, hex: HexCoord) -> Result<(), EngineError> {
        self.phase_guard("recall_unit", &[BattlePhase::Deployment])?;
        self.pull_back_to_reserves(hex, true)
    }

    /// Withdraw a deployed unit into the reserve queue. Unlike
    /// `recall_unit` this is also allowed mid-battle on the player turn.
    pub fn move_to_reserves(&mut self, hex: HexCoord) -> Result<(), EngineError> {
        self.phase_guard(
            "move_to_reserves",
            &[BattlePhase::Deployment, BattlePhase::PlayerTurn],
        )?;
        self.pull_back_to_reserves(hex, false)
    }

    fn pull_back_to_reserves(
        &mut self,
        hex: HexCoord,
        restore_position: bool,
    ) -> Result<(), EngineError> {
        let unit = self
            .player_units
            .remove(&hex)
            .ok_or_else(|| EngineError::Input(format!("no player unit at {}", hex.key())))?;
        self.player_supply.mirror_remove(&unit.unit_id);
        self.turn_flags.remove(&unit.unit_id);
        let meta = self.reserve_meta.remove(&unit.unit_id);
        let (definition, allocation_key, sprite, original_index) = match meta {
            Some(meta) => (
                meta.definition,
                meta.allocation_key,
                meta.sprite,
                meta.original_index,
            ),
            None => (unit.type_key.clone(), None, None, self.reserves.len()),
        };
        let entry = ReserveEntry {
            unit,
            definition,
            allocation_key,
            sprite,
        };
        if restore_position {
            let index = original_index.min(self.reserves.len());
            self.reserves.insert(index, entry);
        } else {
            self.reserves.push(entry);
        }
        self.mark_dirty();
        Ok(())
    }

    /// Lock in the deployment. Requires a base camp. Returns the units
    /// still waiting in reserve.
    pub fn finalize_deployment(&mut self) -> Result<Vec<ReserveEntry>, EngineError> {
        self.phase_guard("finalize_deployment", &[BattlePhase::Deployment])?;
        if self.base_camp.is_none() {
            return Err(EngineError::NoBaseCamp);
        }
        self.deployment_finalized = true;
        log::info!(
            "deployment finalized: {} deployed, {} in reserve",
            self.player_units.len(),
            self.reserves.len()
        );
        Ok(self.reserves.clone())
    }

    /// Open the first player turn. Requires a finalized deployment.
    pub fn start_player_turn_phase(&mut self) -> Result<(), EngineError> {
        self.phase_guard("start_player_turn_phase", &[BattlePhase::Deployment])?;
        if !self.deployment_finalized {
            return Err(EngineError::Input(
                "deployment has not been finalized".to_string(),
            ));
        }
        self.phase = BattlePhase::PlayerTurn;
        self.active_faction = Faction::Player;
        self.turn_flags.clear();
        self.mark_dirty();
        log::info!("player turn {} begins", self.turn_number);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Turn play
    // ------------------------------------------------------------------

    /// Toggle rush mode for the unit at `hex`; returns the new state.
    /// Rushing infantry gain a movement point but are easier to hit.
    pub fn toggle_rush_mode(&mut self, hex: HexCoord) -> Result<bool, EngineError> {
        self.phase_guard(
            "toggle_rush_mode",
            &[BattlePhase::PlayerTurn, BattlePhase::BotTurn],
        )?;
        let active = self.active_faction;
        let unit_id = self
            .units(active)
            .get(&hex)
            .map(|u| u.unit_id.clone())
            .ok_or(EngineError::NotYourTurn)?;
        let flags = self.flags_mut(&unit_id);
        flags.is_rushing = !flags.is_rushing;
        let rushing = flags.is_rushing;
        self.mark_dirty();
        Ok(rushing)
    }

    /// End the player turn: player air/refit/supply steps, the synchronous
    /// bot sub-phase with its own steps, then back to the player with the
    /// turn counter advanced. Returns the Player supply tick report.
    pub fn end_turn(&mut self) -> Result<Option<SupplyTickReport>, EngineError> {
        self.phase_guard("end_turn", &[BattlePhase::PlayerTurn])?;

        let player_refits = self.air_mission_step(Faction::Player);
        self.complete_refits(Faction::Player, &player_refits);
        let report = self.run_supply_tick(Faction::Player);

        self.phase = BattlePhase::BotTurn;
        self.active_faction = Faction::Bot;
        self.begin_faction_turn(Faction::Bot);

        self.run_bot_turn();

        let bot_refits = self.air_mission_step(Faction::Bot);
        self.complete_refits(Faction::Bot, &bot_refits);
        let _ = self.run_supply_tick(Faction::Bot);
        self.auto_rearm_bot_aircraft();

        self.phase = BattlePhase::PlayerTurn;
        self.active_faction = Faction::Player;
        self.turn_number += 1;
        self.rearm_player_base_camp_aircraft();
        self.begin_faction_turn(Faction::Player);

        self.mark_dirty();
        log::info!("turn {} begins", self.turn_number);
        Ok(Some(report))
    }

    /// Externally terminate the battle. No further mutations are allowed.
    pub fn complete_battle(&mut self) {
        self.phase = BattlePhase::Completed;
        self.mark_dirty();
        log::info!("battle completed at turn {}", self.turn_number);
    }

    /// Turn-start housekeeping for a faction: units that sat still last
    /// turn dig in a level, then action flags reset.
    fn begin_faction_turn(&mut self, faction: Faction) {
        let placements = self.sorted_placements(faction);
        for (hex, unit) in &placements {
            let flags = self.turn_flags_for(&unit.unit_id);
            let Ok(stats) = self.stats(&unit.type_key) else {
                continue;
            };
            if !stats.is_air()
                && flags.movement_points_used == 0
                && flags.attacks_used == 0
                && unit.entrench < 4
            {
                if let Some(entry) = self.units_mut(faction).get_mut(hex) {
                    entry.entrench += 1;
                }
            }
        }
        let ids: Vec<String> = placements
            .iter()
            .map(|(_, unit)| unit.unit_id.clone())
            .collect();
        for id in ids {
            self.turn_flags.remove(&id);
        }
    }

    // ------------------------------------------------------------------
    // Combat reports
    // ------------------------------------------------------------------

    pub(crate) fn push_combat_report(&mut self, mut entry: CombatReportEntry) {
        entry.id = format!("cr_{}", self.next_combat_report_seq);
        self.next_combat_report_seq += 1;
        self.combat_reports.push_back(entry);
        while self.combat_reports.len() > COMBAT_REPORT_LIMIT {
            self.combat_reports.pop_front();
        }
    }

    /// The combat report buffer, oldest first.
    pub fn get_combat_reports(&self) -> Vec<CombatReportEntry> {
        self.combat_reports.iter().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Supply queries
    // ------------------------------------------------------------------

    /// The rolling supply ledger for a faction.
    pub fn get_supply_history(&self, faction: Faction) -> Vec<supply::LedgerEntry> {
        self.supply(faction).ledger_entries()
    }
}
