//! The synchronous bot sub-phase.
//!
//! The bot consumes pure views and executes its plan through the same
//! engine primitives the player uses, so every rule (budgets, ranges,
//! line of fire, interception) binds both sides identically.

use crate::air::AirMissionRequest;
use crate::engine::BattleEngine;
use airops::{MissionKind, MissionStatus};
use bot::{plan_air_missions, plan_ground_actions, BotAction, BotAirPlan, BotUnitView, MapOracle, SquadronView};
use hexmap::{BattleMap, HexCoord, MoveType, TerrainCatalog, IMPASSABLE_COST};
use std::collections::HashSet;
use units::Faction;

struct TerrainOracle<'a> {
    map: &'a BattleMap,
    catalog: &'a TerrainCatalog,
}

impl MapOracle for TerrainOracle<'_> {
    fn in_bounds(&self, hex: HexCoord) -> bool {
        self.map.in_bounds(hex)
    }

    fn move_cost(&self, move_type: MoveType, hex: HexCoord) -> u32 {
        self.map
            .kind_at(hex)
            .map(|kind| self.catalog.move_cost(kind, move_type))
            .unwrap_or(IMPASSABLE_COST)
    }
}

impl BattleEngine {
    fn unit_views(&self, faction: Faction) -> Vec<BotUnitView> {
        self.sorted_placements(faction)
            .into_iter()
            .filter_map(|(hex, unit)| {
                let stats = self.stats(&unit.type_key).ok()?;
                Some(BotUnitView {
                    unit_id: unit.unit_id,
                    type_key: unit.type_key,
                    class: stats.class,
                    move_type: stats.move_type,
                    hex,
                    strength: unit.strength,
                    range_min: stats.range_min,
                    range_max: stats.range_max,
                })
            })
            .collect()
    }

    /// Run the whole bot turn: the ground sweep, then air tasking.
    pub(crate) fn run_bot_turn(&mut self) {
        let ground_actions = {
            let friendly = self.unit_views(Faction::Bot);
            let hostile = self.unit_views(Faction::Player);
            let occupied: HashSet<HexCoord> = self
                .sorted_placements(Faction::Player)
                .into_iter()
                .map(|(hex, _)| hex)
                .chain(
                    self.sorted_placements(Faction::Bot)
                        .into_iter()
                        .map(|(hex, _)| hex),
                )
                .collect();
            let oracle = TerrainOracle {
                map: &self.config.map,
                catalog: &self.config.terrain,
            };
            plan_ground_actions(&friendly, &hostile, &oracle, &occupied)
        };

        for action in ground_actions {
            match action {
                BotAction::Move { from, to, .. } => {
                    if let Err(err) = self.move_unit(from, to) {
                        log::debug!("bot move {} -> {} rejected: {}", from.key(), to.key(), err);
                    }
                }
                BotAction::Attack {
                    attacker_hex,
                    defender_hex,
                } => {
                    if let Err(err) = self.attack_unit(attacker_hex, defender_hex) {
                        log::debug!(
                            "bot attack {} -> {} rejected: {}",
                            attacker_hex.key(),
                            defender_hex.key(),
                            err
                        );
                    }
                }
            }
        }

        let air_plans = {
            let hostile = self.unit_views(Faction::Player);
            let squadrons: Vec<SquadronView> = self
                .sorted_placements(Faction::Bot)
                .into_iter()
                .filter_map(|(hex, unit)| {
                    let stats = self.stats(&unit.type_key).ok()?;
                    let profile = stats.air_support.as_ref()?;
                    Some(SquadronView {
                        unit_id: unit.unit_id.clone(),
                        hex,
                        roles: profile.roles.clone(),
                        available: !self.air.is_assigned(&unit.unit_id)
                            && !self.air.is_refitting(&unit.unit_id),
                    })
                })
                .collect();
            let queued_strikes: Vec<HexCoord> = self
                .air
                .missions_for(Some(Faction::Bot))
                .into_iter()
                .filter(|m| m.kind == MissionKind::Strike && m.status == MissionStatus::Queued)
                .filter_map(|m| HexCoord::parse_key(&m.origin_hex_key).ok())
                .collect();
            // Objectives with player pressure within two hexes are worth
            // standing patrols.
            let contested: Vec<HexCoord> = self
                .config
                .objectives
                .iter()
                .copied()
                .filter(|objective| {
                    self.sorted_placements(Faction::Player)
                        .iter()
                        .any(|(hex, _)| hex.distance(*objective) <= 2)
                })
                .collect();
            let home = self
                .config
                .bot_hq
                .or_else(|| squadrons.first().map(|s| s.hex))
                .unwrap_or(HexCoord::new(0, 0));
            plan_air_missions(&squadrons, &hostile, &queued_strikes, &contested, home)
        };

        for plan in air_plans {
            let request = match plan {
                BotAirPlan::Strike { origin, target } => AirMissionRequest {
                    kind: MissionKind::Strike,
                    faction: Faction::Bot,
                    unit_hex: origin,
                    target_hex: Some(target),
                    escort_target_hex: None,
                },
                BotAirPlan::Escort { origin, protect } => AirMissionRequest {
                    kind: MissionKind::Escort,
                    faction: Faction::Bot,
                    unit_hex: origin,
                    target_hex: None,
                    escort_target_hex: Some(protect),
                },
                BotAirPlan::Cap { origin, station } => AirMissionRequest {
                    kind: MissionKind::AirCover,
                    faction: Faction::Bot,
                    unit_hex: origin,
                    target_hex: Some(station),
                    escort_target_hex: None,
                },
            };
            match self.try_schedule_air_mission(&request) {
                Ok(mission_id) => log::debug!("bot queued air mission {}", mission_id),
                Err(denied) => log::debug!("bot air request rejected: {}", denied),
            }
        }
    }
}
