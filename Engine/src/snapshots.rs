//! Read-only snapshot projections with single-hook cache invalidation.
//!
//! Snapshots are the only views the engine exposes outward. Each is built
//! lazily from the authoritative state, cached until any mutation calls
//! the invalidate hook, and returned as a defensive copy on every read.

use crate::engine::{BattleEngine, TurnFlags};
use airops::AircraftAmmo;
use hexmap::HexCoord;
use serde::{Deserialize, Serialize};
use supply::{Inventory, ProductionRates, Shipment};
use units::{Faction, ReserveEntry};

/// One fielded unit as the UI sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub unit_id: String,
    #[serde(rename = "type")]
    pub type_key: String,
    pub hex_key: String,
    pub strength: u32,
    pub experience: u32,
    pub ammo: u32,
    pub fuel: u32,
    pub entrench: u32,
    pub facing: units::Facing,
    pub flags: TurnFlags,
}

/// Both sides' fielded units plus the reserve queues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub player: Vec<RosterEntry>,
    pub bot: Vec<RosterEntry>,
    pub reserves: Vec<ReserveEntry>,
    pub airborne_reserves: Vec<ReserveEntry>,
}

/// One air squadron's support status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportAsset {
    pub unit_key: String,
    pub unit_type: String,
    pub faction: Faction,
    pub ammo: AircraftAmmo,
    pub assigned_mission: Option<String>,
    pub refit_remaining: Option<u32>,
}

/// Air support assets for both factions, sorted by squadron key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportSnapshot {
    pub assets: Vec<SupportAsset>,
}

/// One faction's depot state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplySnapshot {
    pub faction: Faction,
    pub inventory: Inventory,
    pub pending_shipments: Vec<Shipment>,
    pub production: ProductionRates,
}

/// One faction's supply connectivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsSide {
    pub sources: Vec<String>,
    pub connected_units: Vec<String>,
    pub disconnected_units: Vec<String>,
}

/// Supply-network connectivity for both factions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsSnapshot {
    pub player: LogisticsSide,
    pub bot: LogisticsSide,
}

/// Lazily rebuilt caches, all dropped by one invalidation hook.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    pub(crate) roster: Option<RosterSnapshot>,
    pub(crate) support: Option<SupportSnapshot>,
    pub(crate) supply_player: Option<SupplySnapshot>,
    pub(crate) supply_bot: Option<SupplySnapshot>,
    pub(crate) logistics: Option<LogisticsSnapshot>,
}

impl SnapshotCache {
    pub(crate) fn invalidate(&mut self) {
        self.roster = None;
        self.support = None;
        self.supply_player = None;
        self.supply_bot = None;
        self.logistics = None;
    }
}

impl BattleEngine {
    fn build_roster(&self) -> RosterSnapshot {
        let entries = |faction: Faction| -> Vec<RosterEntry> {
            self.sorted_placements(faction)
                .into_iter()
                .map(|(hex, unit)| RosterEntry {
                    unit_id: unit.unit_id.clone(),
                    type_key: unit.type_key.clone(),
                    hex_key: hex.key(),
                    strength: unit.strength,
                    experience: unit.experience,
                    ammo: unit.ammo,
                    fuel: unit.fuel,
                    entrench: unit.entrench,
                    facing: unit.facing,
                    flags: self.turn_flags_for(&unit.unit_id),
                })
                .collect()
        };
        RosterSnapshot {
            player: entries(Faction::Player),
            bot: entries(Faction::Bot),
            reserves: self.reserves.clone(),
            airborne_reserves: self.airborne_reserves.clone(),
        }
    }

    fn build_support(&self) -> SupportSnapshot {
        let mut assets = Vec::new();
        for faction in [Faction::Player, Faction::Bot] {
            for (_, unit) in self.sorted_placements(faction) {
                let Ok(stats) = self.stats(&unit.type_key) else {
                    continue;
                };
                if !stats.is_air() {
                    continue;
                }
                assets.push(self.support_asset(faction, &unit, &stats));
            }
        }
        for entry in self.reserves.iter().chain(self.airborne_reserves.iter()) {
            let Ok(stats) = self.stats(&entry.unit.type_key) else {
                continue;
            };
            if !stats.is_air() {
                continue;
            }
            assets.push(self.support_asset(Faction::Player, &entry.unit, &stats));
        }
        assets.sort_by(|a, b| a.unit_key.cmp(&b.unit_key));
        SupportSnapshot { assets }
    }

    fn support_asset(
        &self,
        faction: Faction,
        unit: &units::Unit,
        stats: &units::UnitTypeStats,
    ) -> SupportAsset {
        let ammo = self.air.ammo_for(&unit.unit_id).unwrap_or_else(|| {
            if stats.is_scout() {
                AircraftAmmo::scout()
            } else {
                AircraftAmmo::combat_default()
            }
        });
        SupportAsset {
            unit_key: unit.unit_id.clone(),
            unit_type: unit.type_key.clone(),
            faction,
            ammo,
            assigned_mission: self.air.assignment_for(&unit.unit_id).cloned(),
            refit_remaining: self.air.refit_remaining(&unit.unit_id),
        }
    }

    fn build_supply(&self, faction: Faction) -> SupplySnapshot {
        let state = self.supply(faction);
        SupplySnapshot {
            faction,
            inventory: state.inventory.clone(),
            pending_shipments: state.pending_shipments().to_vec(),
            production: state.production.clone(),
        }
    }

    fn build_logistics(&self) -> LogisticsSnapshot {
        let side = |faction: Faction| -> LogisticsSide {
            let sources = self.supply_sources(faction);
            let connected =
                supply::connected_hexes(&self.config.map, &self.config.terrain, &sources);
            let mut connected_units = Vec::new();
            let mut disconnected_units = Vec::new();
            for (hex, unit) in self.sorted_placements(faction) {
                if connected.contains(&hex) {
                    connected_units.push(unit.unit_id);
                } else {
                    disconnected_units.push(unit.unit_id);
                }
            }
            LogisticsSide {
                sources: sources.iter().map(|hex| hex.key()).collect(),
                connected_units,
                disconnected_units,
            }
        };
        LogisticsSnapshot {
            player: side(Faction::Player),
            bot: side(Faction::Bot),
        }
    }

    /// The roster projection (cached, defensive copy).
    pub fn get_roster_snapshot(&mut self) -> RosterSnapshot {
        if self.snapshots.roster.is_none() {
            self.snapshots.roster = Some(self.build_roster());
        }
        self.snapshots
            .roster
            .clone()
            .unwrap_or_else(|| self.build_roster())
    }

    /// The air-support projection (cached, defensive copy).
    pub fn get_support_snapshot(&mut self) -> SupportSnapshot {
        if self.snapshots.support.is_none() {
            self.snapshots.support = Some(self.build_support());
        }
        self.snapshots
            .support
            .clone()
            .unwrap_or_else(|| self.build_support())
    }

    /// One faction's depot projection (cached, defensive copy).
    pub fn get_supply_snapshot(&mut self, faction: Faction) -> SupplySnapshot {
        let needs_build = match faction {
            Faction::Player => self.snapshots.supply_player.is_none(),
            Faction::Bot => self.snapshots.supply_bot.is_none(),
        };
        if needs_build {
            let built = self.build_supply(faction);
            match faction {
                Faction::Player => self.snapshots.supply_player = Some(built),
                Faction::Bot => self.snapshots.supply_bot = Some(built),
            }
        }
        let cached = match faction {
            Faction::Player => self.snapshots.supply_player.clone(),
            Faction::Bot => self.snapshots.supply_bot.clone(),
        };
        cached.unwrap_or_else(|| self.build_supply(faction))
    }

    /// The connectivity projection (cached, defensive copy).
    pub fn get_logistics_snapshot(&mut self) -> LogisticsSnapshot {
        if self.snapshots.logistics.is_none() {
            self.snapshots.logistics = Some(self.build_logistics());
        }
        self.snapshots
            .logistics
            .clone()
            .unwrap_or_else(|| self.build_logistics())
    }
}
