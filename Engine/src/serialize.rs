//! The serialization contract: a flat, stringly-typed save state and the
//! hydration path that rebuilds an engine from it.
//!
//! Hydration clears every mirror and rebuilds the supply mirrors from
//! placements. Legacy saves may carry hex-form mission `unit_key`s from
//! the era when assignments were keyed by origin hex; those are upgraded
//! to stable squadron ids by lookup.

use crate::config::BattleConfig;
use crate::engine::BattleEngine;
use crate::error::EngineError;
use crate::phase::BattlePhase;
use airops::{AirMissionReportEntry, MissionKind, MissionStatus, RefitTimer, ScheduledMission};
use hexmap::HexCoord;
use serde::{Deserialize, Serialize};
use supply::SupplyState;
use units::{Faction, ReserveEntry, Unit};

/// Base camp as stored: the hex plus its canonical key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedBaseCamp {
    pub hex: HexCoord,
    pub key: String,
}

/// One air mission as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedAirMission {
    pub id: String,
    pub kind: String,
    pub faction: String,
    pub unit_key: String,
    pub origin_hex_key: String,
    pub unit_type: String,
    pub status: String,
    pub launch_turn: u32,
    pub turns_remaining: u32,
    pub target_hex: Option<HexCoord>,
    pub target_unit_key: Option<String>,
    pub escort_target_unit_key: Option<String>,
    pub interceptions: u32,
    pub outcome: Option<airops::MissionOutcome>,
}

/// One refit timer as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRefitTimer {
    pub mission_id: String,
    pub unit_key: String,
    pub faction: String,
    pub remaining: u32,
}

/// One squadron salvo pool as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedAmmoPool {
    pub unit_key: String,
    pub air: u32,
    pub ground: u32,
    pub needs_rearm: bool,
}

/// The complete save state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedBattleState {
    pub phase: String,
    pub active_faction: String,
    pub turn_number: u32,
    pub base_camp: Option<SerializedBaseCamp>,
    pub player_units: Vec<Unit>,
    pub bot_units: Vec<Unit>,
    pub reserve_units: Vec<ReserveEntry>,
    pub airborne_reserve_units: Vec<ReserveEntry>,
    pub air_missions: Vec<SerializedAirMission>,
    pub refit_timers: Vec<SerializedRefitTimer>,
    pub aircraft_ammo: Vec<SerializedAmmoPool>,
    pub air_mission_reports: Vec<AirMissionReportEntry>,
}

impl BattleEngine {
    /// Capture the battle state in its storable form.
    pub fn serialize(&self) -> SerializedBattleState {
        let units_of = |faction: Faction| -> Vec<Unit> {
            self.sorted_placements(faction)
                .into_iter()
                .map(|(_, unit)| unit)
                .collect()
        };
        let air_missions = self
            .air
            .missions()
            .iter()
            .map(|m| SerializedAirMission {
                id: m.id.clone(),
                kind: m.kind.as_str().to_string(),
                faction: m.faction.as_str().to_string(),
                unit_key: m.unit_key.clone(),
                origin_hex_key: m.origin_hex_key.clone(),
                unit_type: m.unit_type.clone(),
                status: m.status.as_str().to_string(),
                launch_turn: m.launch_turn,
                turns_remaining: m.turns_remaining,
                target_hex: m.target_hex,
                target_unit_key: m.target_unit_key.clone(),
                escort_target_unit_key: m.escort_target_unit_key.clone(),
                interceptions: m.interceptions,
                outcome: m.outcome.clone(),
            })
            .collect();
        let refit_timers = self
            .air
            .refits()
            .iter()
            .map(|timer| SerializedRefitTimer {
                mission_id: timer.mission_id.clone(),
                unit_key: timer.unit_key.clone(),
                faction: timer.faction.as_str().to_string(),
                remaining: timer.remaining_turns,
            })
            .collect();
        let aircraft_ammo = self
            .air
            .ammo_pools()
            .iter()
            .map(|(unit_key, pool)| SerializedAmmoPool {
                unit_key: unit_key.clone(),
                air: pool.air,
                ground: pool.ground,
                needs_rearm: pool.needs_rearm,
            })
            .collect();

        SerializedBattleState {
            phase: self.phase.as_str().to_string(),
            active_faction: self.active_faction.as_str().to_string(),
            turn_number: self.turn_number,
            base_camp: self.base_camp.map(|hex| SerializedBaseCamp {
                hex,
                key: hex.key(),
            }),
            player_units: units_of(Faction::Player),
            bot_units: units_of(Faction::Bot),
            reserve_units: self.reserves.clone(),
            airborne_reserve_units: self.airborne_reserves.clone(),
            air_missions,
            refit_timers,
            aircraft_ammo,
            air_mission_reports: self.air.reports(),
        }
    }

    /// Rebuild this engine's state from a stored form. All mirrors are
    /// cleared and rebuilt; snapshot caches are dropped.
    pub fn hydrate_from_serialized(
        &mut self,
        state: &SerializedBattleState,
    ) -> Result<(), EngineError> {
        let phase = BattlePhase::parse(&state.phase).map_err(EngineError::Input)?;
        let active_faction = Faction::parse(&state.active_faction).map_err(EngineError::Input)?;

        self.phase = phase;
        self.active_faction = active_faction;
        self.turn_number = state.turn_number;
        self.base_camp = state.base_camp.as_ref().map(|camp| camp.hex);
        self.deployment_finalized = phase != BattlePhase::Deployment;

        self.player_units.clear();
        self.bot_units.clear();
        self.reserves = state.reserve_units.clone();
        self.airborne_reserves = state.airborne_reserve_units.clone();
        self.reserve_meta.clear();
        self.turn_flags.clear();
        self.combat_reports.clear();
        self.player_supply = SupplyState::new(Faction::Player);
        self.bot_supply = SupplyState::new(Faction::Bot);
        self.air.reset();

        for (faction, stored) in [
            (Faction::Player, &state.player_units),
            (Faction::Bot, &state.bot_units),
        ] {
            for unit in stored {
                let stats = self.stats(&unit.type_key)?;
                if !self.config.map.in_bounds(unit.hex) {
                    return Err(EngineError::Input(format!(
                        "stored unit {} sits off-map at {}",
                        unit.unit_id,
                        unit.hex.key()
                    )));
                }
                if self.is_occupied(unit.hex) {
                    return Err(EngineError::Input(format!(
                        "stored units overlap at {}",
                        unit.hex.key()
                    )));
                }
                self.supply_mut(faction)
                    .mirror_insert(&unit.unit_id, &unit.type_key, stats.class);
                self.units_mut(faction).insert(unit.hex, unit.clone());
            }
        }
        for entry in self.reserves.iter().chain(self.airborne_reserves.iter()) {
            if !self.config.unit_types.contains(&entry.unit.type_key) {
                return Err(EngineError::UnknownUnitType(entry.unit.type_key.clone()));
            }
        }
        self.recompute_unit_seq();

        for stored in &state.air_missions {
            let kind = MissionKind::parse(&stored.kind).map_err(EngineError::Input)?;
            let faction = Faction::parse(&stored.faction).map_err(EngineError::Input)?;
            let status = MissionStatus::parse(&stored.status).map_err(EngineError::Input)?;
            let unit_key = self.upgrade_legacy_unit_key(faction, &stored.unit_key);
            self.air.restore_mission(ScheduledMission {
                id: stored.id.clone(),
                kind,
                faction,
                unit_key,
                origin_hex_key: stored.origin_hex_key.clone(),
                unit_type: stored.unit_type.clone(),
                status,
                launch_turn: stored.launch_turn,
                turns_remaining: stored.turns_remaining,
                target_hex: stored.target_hex,
                target_unit_key: stored.target_unit_key.clone(),
                escort_target_unit_key: stored.escort_target_unit_key.clone(),
                interceptions: stored.interceptions,
                outcome: stored.outcome.clone(),
            });
        }
        for stored in &state.refit_timers {
            let faction = Faction::parse(&stored.faction).map_err(EngineError::Input)?;
            self.air.start_refit(RefitTimer {
                mission_id: stored.mission_id.clone(),
                unit_key: stored.unit_key.clone(),
                faction,
                remaining_turns: stored.remaining,
            });
        }
        for stored in &state.aircraft_ammo {
            let pool = airops::AircraftAmmo {
                air: stored.air,
                ground: stored.ground,
                needs_rearm: stored.needs_rearm,
            };
            *self.air.ammo_entry(&stored.unit_key, pool) = pool;
        }
        for report in &state.air_mission_reports {
            self.air.restore_report(report.clone());
        }
        self.air.rebuild_assignments();
        self.mark_dirty();
        log::info!(
            "hydrated battle state: turn {}, phase {}",
            self.turn_number,
            self.phase.as_str()
        );
        Ok(())
    }

    /// Build a fresh engine over `config` and hydrate it from `state`.
    pub fn from_serialized(
        config: BattleConfig,
        state: &SerializedBattleState,
    ) -> Result<BattleEngine, EngineError> {
        let mut engine = BattleEngine::new(config);
        engine.hydrate_from_serialized(state)?;
        Ok(engine)
    }

    /// Render the save state as a JSON document.
    pub fn serialize_to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(&self.serialize())
            .map_err(|err| EngineError::Input(format!("serialization failed: {}", err)))
    }

    /// Parse a JSON save state produced by [`BattleEngine::serialize_to_json`].
    pub fn parse_serialized_json(data: &str) -> Result<SerializedBattleState, EngineError> {
        serde_json::from_str(data)
            .map_err(|err| EngineError::Input(format!("malformed save state: {}", err)))
    }

    /// Legacy saves keyed missions by origin hex. A key with a comma is a
    /// hex key; resolve it to the stable id of whatever squadron sits
    /// there now. Keys already in the `u_` shape pass through untouched.
    fn upgrade_legacy_unit_key(&self, faction: Faction, key: &str) -> String {
        if units::is_stable_unit_key(key) || !key.contains(',') {
            return key.to_string();
        }
        match HexCoord::parse_key(key) {
            Ok(hex) => {
                if let Some(unit) = self.units(faction).get(&hex) {
                    log::warn!(
                        "upgraded legacy mission key {} to squadron id {}",
                        key,
                        unit.unit_id
                    );
                    unit.unit_id.clone()
                } else {
                    log::warn!("legacy mission key {} has no squadron to resolve to", key);
                    key.to_string()
                }
            }
            Err(_) => key.to_string(),
        }
    }

    fn recompute_unit_seq(&mut self) {
        let mut max_seq = 0u64;
        let mut consider = |unit: &Unit| {
            if let Some(seq) = unit
                .unit_id
                .strip_prefix("u_")
                .and_then(|s| s.parse::<u64>().ok())
            {
                max_seq = max_seq.max(seq);
            }
        };
        for unit in self.player_units.values() {
            consider(unit);
        }
        for unit in self.bot_units.values() {
            consider(unit);
        }
        for entry in self.reserves.iter().chain(self.airborne_reserves.iter()) {
            consider(&entry.unit);
        }
        self.next_unit_seq = self.next_unit_seq.max(max_seq + 1);
    }
}
