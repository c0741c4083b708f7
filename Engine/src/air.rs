//! Engine-side air operations: scheduling, the lifecycle step, layered
//! interception, transport drops, refits, and rearming.

use crate::attack::AttackOptions;
use crate::engine::{BattleEngine, UnitLocation};
use crate::error::EngineError;
use crate::reports::CombatReportEntry;
use airops::{
    AircraftAmmo, AirEngagementEvent, AirMissionArrival, AirMissionReportEntry, MissionKind,
    MissionOutcome, MissionStatus, MissionTemplate, RefitTimer, ReportEvent, ScheduleDenied,
    ScheduleErrorCode, ScheduledMission, CAP_PATROL_RADIUS, STRIKE_FOLLOW_DISTANCE,
};
use combat::{resolve_expected, AttackerContext, CombatantProfile, DefenderContext, Engagement};
use hexmap::HexCoord;
use rand::Rng;
use units::{Faction, Unit, UnitTypeStats};

/// A request to put a squadron on a mission.
#[derive(Debug, Clone, PartialEq)]
pub struct AirMissionRequest {
    pub kind: MissionKind,
    pub faction: Faction,
    pub unit_hex: HexCoord,
    pub target_hex: Option<HexCoord>,
    pub escort_target_hex: Option<HexCoord>,
}

/// What an interception pass did to a strike package.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InterceptionSummary {
    pub engaged: bool,
    pub bomber_destroyed: bool,
    pub bomber_attrition: f64,
    pub interceptors_committed: u32,
}

/// One schedulable squadron found at an origin hex.
struct AirCandidate {
    unit: Unit,
    stats: UnitTypeStats,
}

impl BattleEngine {
    fn distance_km(&self, a: HexCoord, b: HexCoord) -> f64 {
        f64::from(a.distance(b)) * self.config.km_per_hex
    }

    /// Baseline salvo pool for an airframe: scouts fly dry, everything
    /// else carries the combat loadout.
    pub(crate) fn default_pool(stats: &UnitTypeStats) -> AircraftAmmo {
        if stats.is_scout() {
            AircraftAmmo::scout()
        } else {
            AircraftAmmo::combat_default()
        }
    }

    /// Candidate squadrons for a mission from `hex`: the deployed unit
    /// first, then (for the Player) reserves staged at the base camp.
    fn air_candidates_at(&self, faction: Faction, hex: HexCoord) -> Vec<AirCandidate> {
        let mut candidates = Vec::new();
        if let Some(unit) = self.units(faction).get(&hex) {
            if let Ok(stats) = self.stats(&unit.type_key) {
                candidates.push(AirCandidate {
                    unit: unit.clone(),
                    stats,
                });
            }
        }
        if faction == Faction::Player && self.base_camp == Some(hex) {
            for entry in &self.reserves {
                if let Ok(stats) = self.stats(&entry.unit.type_key) {
                    candidates.push(AirCandidate {
                        unit: entry.unit.clone(),
                        stats,
                    });
                }
            }
        }
        candidates
    }

    /// Validate a scheduling request and queue the mission. Never panics
    /// or raises; every rejection is a code plus reason.
    pub fn try_schedule_air_mission(
        &mut self,
        request: &AirMissionRequest,
    ) -> Result<String, ScheduleDenied> {
        if !self.phase.allows_turn_play() {
            return Err(ScheduleDenied::new(
                ScheduleErrorCode::PhaseInvalid,
                format!("cannot schedule missions during {}", self.phase.as_str()),
            ));
        }
        if request.faction != self.active_faction {
            return Err(ScheduleDenied::new(
                ScheduleErrorCode::WrongFaction,
                format!("{} is not the active faction", request.faction.as_str()),
            ));
        }
        let template = match self.air.template_for(request.kind) {
            Some(template) => template.clone(),
            None => {
                return Err(ScheduleDenied::new(
                    ScheduleErrorCode::RoleNotEligible,
                    format!("no template for {}", request.kind.as_str()),
                ))
            }
        };

        let candidates = self.air_candidates_at(request.faction, request.unit_hex);
        if candidates.is_empty() {
            return Err(ScheduleDenied::new(
                ScheduleErrorCode::NoUnitAtHex,
                format!("no unit at {}", request.unit_hex.key()),
            ));
        }

        // Walk the candidates: remember why the first one failed the
        // static checks, and prefer an unassigned, combat-ready squadron
        // among those that pass.
        let mut static_failure: Option<ScheduleDenied> = None;
        let mut busy_refitting = false;
        let mut busy_assigned = false;
        let mut chosen: Option<&AirCandidate> = None;
        for candidate in &candidates {
            let denial = if !candidate.stats.is_air() {
                Some(ScheduleDenied::new(
                    ScheduleErrorCode::NotAircraft,
                    format!("{} is not an aircraft", candidate.unit.type_key),
                ))
            } else if candidate.stats.air_support.is_none() {
                Some(ScheduleDenied::new(
                    ScheduleErrorCode::NoAirSupportProfile,
                    format!("{} has no air-support profile", candidate.unit.type_key),
                ))
            } else if !template.roles_intersect(
                &candidate
                    .stats
                    .air_support
                    .as_ref()
                    .map(|p| p.roles.clone())
                    .unwrap_or_default(),
            ) {
                Some(ScheduleDenied::new(
                    ScheduleErrorCode::RoleNotEligible,
                    format!(
                        "{} cannot fly {} missions",
                        candidate.unit.type_key,
                        request.kind.as_str()
                    ),
                ))
            } else {
                None
            };
            if let Some(denial) = denial {
                if static_failure.is_none() {
                    static_failure = Some(denial);
                }
                continue;
            }
            if self.air.is_refitting(&candidate.unit.unit_id) {
                busy_refitting = true;
                continue;
            }
            if self.air.is_assigned(&candidate.unit.unit_id) {
                busy_assigned = true;
                continue;
            }
            chosen = Some(candidate);
            break;
        }
        let Some(candidate) = chosen else {
            if busy_refitting {
                return Err(ScheduleDenied::new(
                    ScheduleErrorCode::NeedsRefit,
                    "every eligible squadron is refitting".to_string(),
                ));
            }
            if busy_assigned {
                return Err(ScheduleDenied::new(
                    ScheduleErrorCode::AlreadyAssigned,
                    "every eligible squadron already has a mission".to_string(),
                ));
            }
            return Err(static_failure.unwrap_or_else(|| {
                ScheduleDenied::new(
                    ScheduleErrorCode::NoUnitAtHex,
                    format!("no eligible squadron at {}", request.unit_hex.key()),
                )
            }));
        };
        let profile = candidate
            .stats
            .air_support
            .as_ref()
            .cloned()
            .unwrap_or_else(|| units::AirSupportProfile {
                roles: Vec::new(),
                combat_radius_km: 0.0,
                refit_turns: 1,
            });

        if template.requires_target && request.target_hex.is_none() {
            return Err(ScheduleDenied::new(
                ScheduleErrorCode::TargetRequired,
                format!("{} missions need a target hex", request.kind.as_str()),
            ));
        }
        if template.requires_friendly_escort_target && request.escort_target_hex.is_none() {
            return Err(ScheduleDenied::new(
                ScheduleErrorCode::EscortTargetRequired,
                "escort missions need a squadron to protect".to_string(),
            ));
        }

        if let Some(target) = request.target_hex {
            let km = self.distance_km(request.unit_hex, target);
            if km > profile.combat_radius_km {
                return Err(ScheduleDenied::new(
                    ScheduleErrorCode::OutOfRange,
                    format!(
                        "target {:.0}km out, combat radius {:.0}km",
                        km, profile.combat_radius_km
                    ),
                ));
            }
        }

        // Resolve the escort target to the protected squadron's stable id.
        let mut escort_target_unit_key = None;
        if let Some(escort_hex) = request.escort_target_hex {
            let km = self.distance_km(request.unit_hex, escort_hex);
            if km > profile.combat_radius_km {
                return Err(ScheduleDenied::new(
                    ScheduleErrorCode::OutOfRange,
                    format!(
                        "escort station {:.0}km out, combat radius {:.0}km",
                        km, profile.combat_radius_km
                    ),
                ));
            }
            let escort_key = escort_hex.key();
            let mut queued_key: Option<String> = None;
            let mut in_flight_only = false;
            for mission in self.air.missions() {
                if mission.faction != request.faction || mission.origin_hex_key != escort_key {
                    continue;
                }
                match mission.status {
                    MissionStatus::Queued => {
                        queued_key = Some(mission.unit_key.clone());
                        break;
                    }
                    MissionStatus::InFlight | MissionStatus::Resolving => {
                        in_flight_only = true;
                    }
                    MissionStatus::Completed => {}
                }
            }
            match queued_key {
                Some(key) => escort_target_unit_key = Some(key),
                None if in_flight_only => {
                    return Err(ScheduleDenied::new(
                        ScheduleErrorCode::EscortTargetInFlight,
                        "the mission to protect is already airborne".to_string(),
                    ));
                }
                None => {
                    return Err(ScheduleDenied::new(
                        ScheduleErrorCode::EscortTargetMissing,
                        format!("no queued mission departs {}", escort_key),
                    ));
                }
            }
        }

        if let Some(&cap) = self.config.airbase_capacity.get(&request.unit_hex) {
            let queued = self
                .air
                .queued_departures_from(request.faction, &request.unit_hex.key());
            if queued as u32 >= cap {
                return Err(ScheduleDenied::new(
                    ScheduleErrorCode::AirbaseCapacityExceeded,
                    format!("airbase {} is at capacity {}", request.unit_hex.key(), cap),
                ));
            }
        }

        // Validation complete; commit the mission.
        let unit_key = candidate.unit.unit_id.clone();
        let unit_type = candidate.unit.type_key.clone();
        let stats = candidate.stats.clone();
        let target_unit_key = request.target_hex.and_then(|hex| {
            self.units(request.faction.opponent())
                .get(&hex)
                .map(|u| u.unit_id.clone())
        });

        let turn = self.turn_number;
        let mission_id = self.air.open_mission(
            request.kind,
            request.faction,
            &unit_key,
            &request.unit_hex.key(),
            &unit_type,
            turn,
        );
        if let Some(mission) = self.air.mission_mut(&mission_id) {
            mission.target_hex = request.target_hex;
            mission.target_unit_key = target_unit_key;
            mission.escort_target_unit_key = escort_target_unit_key;
        }
        self.air.assign(&unit_key, &mission_id);
        self.air.ammo_entry(&unit_key, Self::default_pool(&stats));
        self.mark_dirty();
        log::info!(
            "{} queued {} mission {} from {}",
            request.faction.as_str(),
            request.kind.as_str(),
            mission_id,
            request.unit_hex.key()
        );
        Ok(mission_id)
    }

    /// Convenience wrapper that surfaces the rejection as an engine error.
    pub fn schedule_air_mission(
        &mut self,
        request: &AirMissionRequest,
    ) -> Result<String, EngineError> {
        self.try_schedule_air_mission(request)
            .map_err(EngineError::AirScheduling)
    }

    /// Remove a still-queued mission. Returns `false` once it is airborne.
    pub fn cancel_queued_air_mission(&mut self, mission_id: &str) -> bool {
        let cancelled = self.air.cancel_queued(mission_id);
        if cancelled {
            self.mark_dirty();
        }
        cancelled
    }

    /// Mission templates available for scheduling.
    pub fn list_air_mission_templates(&self) -> Vec<MissionTemplate> {
        self.air.templates().to_vec()
    }

    /// Scheduled missions, optionally filtered by faction.
    pub fn get_scheduled_air_missions(&self, faction: Option<Faction>) -> Vec<ScheduledMission> {
        self.air.missions_for(faction)
    }

    /// The bounded air-mission report buffer.
    pub fn get_air_mission_reports(&self) -> Vec<AirMissionReportEntry> {
        self.air.reports()
    }

    /// Drain the arrival events buffered since the last call.
    pub fn consume_air_mission_arrivals(&mut self) -> Vec<AirMissionArrival> {
        self.air.consume_arrivals()
    }

    /// Drain the air-engagement events buffered since the last call.
    pub fn consume_air_engagements(&mut self) -> Vec<AirEngagementEvent> {
        self.air.consume_engagements()
    }

    /// Combat radius of the squadron at `origin`, in hexes.
    pub fn get_aircraft_combat_radius_hex(&self, origin: HexCoord) -> Option<u32> {
        let candidates = self.air_candidates_at(self.active_faction, origin);
        candidates.iter().find_map(|c| {
            c.stats
                .air_support
                .as_ref()
                .map(|p| (p.combat_radius_km / self.config.km_per_hex).floor() as u32)
        })
    }

    /// Refit duration of the squadron at `origin`, in turns.
    pub fn get_aircraft_refit_turns(&self, origin: HexCoord) -> Option<u32> {
        let candidates = self.air_candidates_at(self.active_faction, origin);
        candidates
            .iter()
            .find_map(|c| c.stats.air_support.as_ref().map(|p| p.refit_turns))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// One faction's air-mission step inside `end_turn`: promote, tick,
    /// resolve in kind order. Returns the squadrons whose refit began
    /// during this step.
    pub(crate) fn air_mission_step(&mut self, faction: Faction) -> Vec<String> {
        let mut refits_started = Vec::new();
        self.air.begin_resolution_cycle();
        let promoted = self.air.promote_queued(faction, self.turn_number);
        self.air.tick_in_flight(faction, &promoted);

        for mission_id in self.air.due_mission_ids(faction) {
            self.air.begin_resolving(&mission_id);
            let Some(mission) = self.air.mission(&mission_id).cloned() else {
                continue;
            };
            let outcome = match mission.kind {
                MissionKind::Strike => self.resolve_strike(&mission),
                MissionKind::Escort => self.resolve_support_mission(&mission),
                MissionKind::Transport => self.resolve_transport(&mission),
                MissionKind::AirCover => self.resolve_support_mission(&mission),
            };
            self.air.complete_mission(&mission_id, outcome.clone());
            let notes = outcome.notes.clone();
            let turn = self.turn_number;
            self.air
                .report_for_mission(&mission, turn, ReportEvent::Resolved, Some(&outcome), notes);
            if outcome.refit_required {
                let refit_turns = self
                    .stats(&mission.unit_type)
                    .ok()
                    .and_then(|s| s.air_support.map(|p| p.refit_turns))
                    .unwrap_or(1);
                self.air.start_refit(RefitTimer {
                    mission_id: mission_id.clone(),
                    unit_key: mission.unit_key.clone(),
                    faction,
                    remaining_turns: refit_turns,
                });
                refits_started.push(mission.unit_key.clone());
                self.air.report_for_mission(
                    &mission,
                    turn,
                    ReportEvent::RefitStarted,
                    Some(&outcome),
                    None,
                );
            }
        }
        self.mark_dirty();
        refits_started
    }

    /// Escort and air-cover missions complete on station; their outcome
    /// records how often they tangled with the enemy.
    fn resolve_support_mission(&mut self, mission: &ScheduledMission) -> MissionOutcome {
        let mut outcome = MissionOutcome::completed();
        outcome.interceptions = mission.interceptions;
        if self.locate_unit(mission.faction, &mission.unit_key).is_none() {
            outcome.result = "aborted".to_string();
            outcome.notes = Some("squadron lost on station".to_string());
            return outcome;
        }
        if let Some(pool) = self.air.ammo_for(&mission.unit_key) {
            outcome.refit_required = pool.needs_rearm;
        }
        outcome
    }

    fn resolve_strike(&mut self, mission: &ScheduledMission) -> MissionOutcome {
        let faction = mission.faction;
        let Some(location) = self.locate_unit(faction, &mission.unit_key) else {
            return MissionOutcome::aborted("squadron lost before the strike");
        };
        let Some(target_hex) = mission.target_hex else {
            return MissionOutcome::aborted("strike had no target hex");
        };
        let Some(bomber) = self.unit_clone_at(location) else {
            return MissionOutcome::aborted("squadron lost before the strike");
        };
        let Ok(stats) = self.stats(&bomber.type_key) else {
            return MissionOutcome::aborted("unknown airframe");
        };
        let radius_km = stats
            .air_support
            .as_ref()
            .map(|p| p.combat_radius_km)
            .unwrap_or(0.0);

        let bomber_hex = match location {
            UnitLocation::Deployed(_, hex) => hex,
            _ => HexCoord::parse_key(&mission.origin_hex_key).unwrap_or(target_hex),
        };

        // The target may have moved since the mission was cut; follow it a
        // short distance if the squadron can still reach it.
        let mut strike_hex = target_hex;
        if let Some(target_key) = &mission.target_unit_key {
            if let Some(UnitLocation::Deployed(_, current)) =
                self.locate_unit(faction.opponent(), target_key)
            {
                if current != target_hex
                    && current.distance(target_hex) <= STRIKE_FOLLOW_DISTANCE
                    && self.distance_km(bomber_hex, current) <= radius_km
                {
                    strike_hex = current;
                    if let Some(slot) = self.air.mission_mut(&mission.id) {
                        slot.target_hex = Some(current);
                    }
                }
            }
        }

        let summary = self.run_interception(faction, &mission.unit_key, strike_hex);
        let mut outcome = MissionOutcome::completed();
        outcome.interceptions = summary.interceptors_committed;
        outcome.bomber_attrition = summary.bomber_attrition;
        if summary.bomber_destroyed {
            outcome.result = "aborted".to_string();
            outcome.notes = Some("shot down by combat air patrol".to_string());
            return outcome;
        }

        // Bomb run.
        let enemy = faction.opponent();
        if self.units(enemy).get(&strike_hex).is_some() {
            match location {
                UnitLocation::Deployed(_, hex) => {
                    match self.execute_attack(faction, hex, strike_hex, AttackOptions::bomb_run()) {
                        Ok(resolution) => {
                            if resolution.defender_destroyed {
                                outcome.kills += 1;
                            }
                        }
                        Err(err) => {
                            outcome.notes = Some(format!("bomb run failed: {}", err));
                        }
                    }
                }
                _ => {
                    let killed = self.reserve_bomb_run(faction, &mission.unit_key, strike_hex);
                    if killed {
                        outcome.kills += 1;
                    }
                }
            }
        } else {
            outcome.notes = Some("no target remained at the strike hex".to_string());
        }

        if let Some(pool) = self.air.ammo_for(&mission.unit_key) {
            outcome.refit_required = pool.needs_rearm;
        }
        outcome
    }

    /// Bomb run flown by a squadron still in the reserve queue: the
    /// target takes the hit, but with no airframe on the map there is no
    /// retaliation exchange.
    fn reserve_bomb_run(&mut self, faction: Faction, unit_key: &str, strike_hex: HexCoord) -> bool {
        let Some(location) = self.locate_unit(faction, unit_key) else {
            return false;
        };
        let Some(bomber) = self.unit_clone_at(location) else {
            return false;
        };
        let Ok(bomber_stats) = self.stats(&bomber.type_key) else {
            return false;
        };
        let enemy = faction.opponent();
        let Some(target) = self.units(enemy).get(&strike_hex).cloned() else {
            return false;
        };
        let Ok(target_stats) = self.stats(&target.type_key) else {
            return false;
        };

        let bomber_profile = CombatantProfile::from_stats(&bomber_stats);
        let target_profile = CombatantProfile::from_stats(&target_stats);
        let attacker_ctx = self.attacker_context_for_air(faction, &bomber);
        let defender_ctx = self.defender_context(&target, &target_stats);
        let expectation = resolve_expected(
            &bomber_profile,
            &attacker_ctx,
            &target_profile,
            &defender_ctx,
        );
        let engagement = Engagement::classify(&bomber_profile, target_stats.is_air());
        let inflicted = engagement.apply(expectation.expected_damage);

        let mut destroyed = false;
        if let Some(unit) = self.units_mut(enemy).get_mut(&strike_hex) {
            unit.take_damage(inflicted);
            destroyed = !unit.is_alive();
        }
        if destroyed {
            self.destroy_unit(enemy, UnitLocation::Deployed(enemy, strike_hex));
        }
        {
            let pool = self.air.ammo_entry(unit_key, Self::default_pool(&bomber_stats));
            if target_stats.is_air() {
                pool.spend_air();
            } else {
                pool.spend_ground();
            }
        }
        let turn = self.turn_number;
        self.push_combat_report(CombatReportEntry {
            id: String::new(),
            turn,
            attacker_faction: faction,
            attacker_id: bomber.unit_id.clone(),
            attacker_type: bomber.type_key.clone(),
            attacker_hex: strike_hex.key(),
            defender_id: target.unit_id.clone(),
            defender_type: target.type_key.clone(),
            defender_hex: strike_hex.key(),
            inflicted,
            retaliation_inflicted: None,
            defender_destroyed: destroyed,
            attacker_destroyed: false,
            note: None,
        });
        destroyed
    }

    fn attacker_context_for_air(&self, faction: Faction, unit: &Unit) -> AttackerContext {
        let (accuracy_bonus_pct, damage_bonus_pct) = match faction {
            Faction::Player => (
                self.config.commander.accuracy_bonus_pct,
                self.config.commander.damage_bonus_pct,
            ),
            Faction::Bot => (0.0, self.config.difficulty.damage_bonus_pct),
        };
        AttackerContext {
            strength: unit.strength,
            experience: unit.experience,
            spotted_only: false,
            accuracy_bonus_pct,
            damage_bonus_pct,
            aspect: combat::FacingAspect::Front,
        }
    }

    fn resolve_transport(&mut self, mission: &ScheduledMission) -> MissionOutcome {
        let Some(target) = mission.target_hex else {
            return MissionOutcome::aborted("transport had no drop hex");
        };
        let Some(index) = self.airborne_reserves.iter().position(|entry| {
            entry.allocation_key.as_deref() == Some("airborneDetachment")
                || entry.unit.type_key == "Paratrooper"
        }) else {
            return MissionOutcome::aborted("no airborne detachment to drop");
        };

        let drop_hex = if self.config.map.in_bounds(target) && !self.is_occupied(target) {
            Some(target)
        } else {
            self.scatter_drop_hex(target)
        };
        let Some(drop_hex) = drop_hex else {
            return MissionOutcome::aborted("no clear drop zone near the target");
        };

        let mut entry = self.airborne_reserves.remove(index);
        entry.unit.hex = drop_hex;
        let unit_id = entry.unit.unit_id.clone();
        let type_key = entry.unit.type_key.clone();
        let class = self
            .stats(&type_key)
            .map(|s| s.class)
            .unwrap_or(units::UnitClass::Infantry);
        self.supply_mut(mission.faction)
            .mirror_insert(&unit_id, &type_key, class);
        self.units_mut(mission.faction).insert(drop_hex, entry.unit);
        self.mark_dirty();

        let mut outcome = MissionOutcome::completed();
        outcome.notes = Some(format!("detachment landed at {}", drop_hex.key()));
        outcome
    }

    /// Random unoccupied in-bounds hex within scatter range of the drop
    /// point. Deterministic for a given seed and state.
    fn scatter_drop_hex(&mut self, target: HexCoord) -> Option<HexCoord> {
        let candidates: Vec<HexCoord> = target
            .within_radius(3)
            .into_iter()
            .skip(1)
            .filter(|hex| self.config.map.in_bounds(*hex) && !self.is_occupied(*hex))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }

    // ------------------------------------------------------------------
    // Interception
    // ------------------------------------------------------------------

    /// Layered interception around a strike: escorts attrit the CAP, the
    /// surviving CAP works over the bomber.
    pub(crate) fn run_interception(
        &mut self,
        bomber_faction: Faction,
        bomber_key: &str,
        target_hex: HexCoord,
    ) -> InterceptionSummary {
        let enemy = bomber_faction.opponent();
        let mut summary = InterceptionSummary::default();

        // CAP flights able and cleared to commit.
        let mut cap: Vec<(String, String)> = Vec::new();
        for mission in self.air.missions_for(Some(enemy)) {
            if mission.kind != MissionKind::AirCover
                || mission.status != MissionStatus::InFlight
                || mission.interceptions >= 1
            {
                continue;
            }
            let Some(center) = mission.target_hex else {
                continue;
            };
            if center.distance(target_hex) > CAP_PATROL_RADIUS {
                continue;
            }
            let Some(location) = self.locate_unit(enemy, &mission.unit_key) else {
                continue;
            };
            let Some(squadron) = self.unit_clone_at(location) else {
                continue;
            };
            let Ok(stats) = self.stats(&squadron.type_key) else {
                continue;
            };
            let Some(profile) = stats.air_support.as_ref() else {
                continue;
            };
            let squadron_hex = match location {
                UnitLocation::Deployed(_, hex) => hex,
                _ => HexCoord::parse_key(&mission.origin_hex_key).unwrap_or(center),
            };
            if self.distance_km(squadron_hex, target_hex) > profile.combat_radius_km {
                continue;
            }
            cap.push((mission.id.clone(), mission.unit_key.clone()));
        }
        if cap.is_empty() {
            return summary;
        }
        summary.engaged = true;

        // Escorts riding shotgun for this squadron.
        let escorts: Vec<(String, String)> = self
            .air
            .missions_for(Some(bomber_faction))
            .into_iter()
            .filter(|m| {
                m.kind == MissionKind::Escort
                    && m.status == MissionStatus::InFlight
                    && m.interceptions < 1
                    && m.escort_target_unit_key.as_deref() == Some(bomber_key)
                    && self.locate_unit(bomber_faction, &m.unit_key).is_some()
            })
            .map(|m| (m.id, m.unit_key))
            .collect();

        self.air.push_engagement(AirEngagementEvent::air_to_air(
            target_hex.key(),
            bomber_key.to_string(),
            cap.iter().map(|(_, key)| key.clone()).collect(),
            escorts.iter().map(|(_, key)| key.clone()).collect(),
        ));
        log::info!(
            "air battle over {}: {} CAP vs {} escorts",
            target_hex.key(),
            cap.len(),
            escorts.len()
        );

        // Step 1: escorts attrit the CAP, one pair each.
        for (index, (cap_mission_id, cap_key)) in cap.iter().enumerate() {
            let Some((escort_mission_id, escort_key)) = escorts.get(index) else {
                break;
            };
            let destroyed = self.resolve_air_to_air(bomber_faction, escort_key, enemy, cap_key);
            if let Some(mission) = self.air.mission_mut(escort_mission_id) {
                mission.interceptions = 1;
            }
            if let Some(stats) = self
                .locate_unit(bomber_faction, escort_key)
                .and_then(|loc| self.unit_clone_at(loc))
                .and_then(|u| self.stats(&u.type_key).ok())
            {
                self.air
                    .ammo_entry(escort_key, Self::default_pool(&stats))
                    .spend_air();
            }
            if destroyed {
                // The patrol is gone; its interception is consumed anyway.
                if let Some(mission) = self.air.mission_mut(cap_mission_id) {
                    mission.interceptions = 1;
                }
            }
        }

        // Step 2: the surviving CAP engages the bomber.
        for (cap_mission_id, cap_key) in &cap {
            let already_used = self
                .air
                .mission(cap_mission_id)
                .map(|m| m.interceptions >= 1)
                .unwrap_or(true);
            if already_used {
                continue;
            }
            if self.locate_unit(enemy, cap_key).is_none() {
                continue;
            }
            let bomber_strength_before = self
                .locate_unit(bomber_faction, bomber_key)
                .and_then(|loc| self.unit_clone_at(loc))
                .map(|u| u.strength)
                .unwrap_or(0);
            let destroyed = self.resolve_air_to_air(enemy, cap_key, bomber_faction, bomber_key);
            let bomber_strength_after = self
                .locate_unit(bomber_faction, bomber_key)
                .and_then(|loc| self.unit_clone_at(loc))
                .map(|u| u.strength)
                .unwrap_or(0);
            summary.bomber_attrition +=
                f64::from(bomber_strength_before.saturating_sub(bomber_strength_after));
            summary.interceptors_committed += 1;
            if let Some(mission) = self.air.mission_mut(cap_mission_id) {
                mission.interceptions = 1;
            }
            if let Some(stats) = self
                .locate_unit(enemy, cap_key)
                .and_then(|loc| self.unit_clone_at(loc))
                .and_then(|u| self.stats(&u.type_key).ok())
            {
                self.air
                    .ammo_entry(cap_key, Self::default_pool(&stats))
                    .spend_air();
            }
            if destroyed {
                summary.bomber_destroyed = true;
                break;
            }
        }
        summary
    }

    /// One air-to-air exchange between squadrons, wherever they sit
    /// (deployed or reserve). Returns whether the defender was destroyed.
    fn resolve_air_to_air(
        &mut self,
        attacker_faction: Faction,
        attacker_key: &str,
        defender_faction: Faction,
        defender_key: &str,
    ) -> bool {
        let Some(attacker_loc) = self.locate_unit(attacker_faction, attacker_key) else {
            return false;
        };
        let Some(defender_loc) = self.locate_unit(defender_faction, defender_key) else {
            return false;
        };
        let Some(attacker) = self.unit_clone_at(attacker_loc) else {
            return false;
        };
        let Some(defender) = self.unit_clone_at(defender_loc) else {
            return false;
        };
        let Ok(attacker_stats) = self.stats(&attacker.type_key) else {
            return false;
        };
        let Ok(defender_stats) = self.stats(&defender.type_key) else {
            return false;
        };

        let attacker_profile = CombatantProfile::from_stats(&attacker_stats);
        let defender_profile = CombatantProfile::from_stats(&defender_stats);
        let attacker_ctx = self.attacker_context_for_air(attacker_faction, &attacker);
        let defender_ctx = DefenderContext {
            strength: defender.strength,
            experience: defender.experience,
            terrain_defense: 0,
            entrench: 0,
            is_rushing: false,
        };
        let expectation = resolve_expected(
            &attacker_profile,
            &attacker_ctx,
            &defender_profile,
            &defender_ctx,
        );
        let engagement = Engagement::classify(&attacker_profile, true);
        let inflicted = engagement.apply(expectation.expected_damage);

        let mut destroyed = false;
        self.with_unit_mut(defender_loc, |unit| {
            unit.take_damage(inflicted);
            destroyed = !unit.is_alive();
        });
        if destroyed {
            self.destroy_unit(defender_faction, defender_loc);
        }

        let turn = self.turn_number;
        self.push_combat_report(CombatReportEntry {
            id: String::new(),
            turn,
            attacker_faction,
            attacker_id: attacker.unit_id.clone(),
            attacker_type: attacker.type_key.clone(),
            attacker_hex: attacker.hex.key(),
            defender_id: defender.unit_id.clone(),
            defender_type: defender.type_key.clone(),
            defender_hex: defender.hex.key(),
            inflicted,
            retaliation_inflicted: None,
            defender_destroyed: destroyed,
            attacker_destroyed: false,
            note: None,
        });
        destroyed
    }

    // ------------------------------------------------------------------
    // Refits and rearming
    // ------------------------------------------------------------------

    /// Tick the faction's refit timers and apply completion effects.
    pub(crate) fn complete_refits(&mut self, faction: Faction, started_this_step: &[String]) {
        for timer in self.air.tick_refits(faction, started_this_step) {
            let location = self.locate_unit(faction, &timer.unit_key);
            if let Some(location) = location {
                if let Some(unit) = self.unit_clone_at(location) {
                    if let Ok(stats) = self.stats(&unit.type_key) {
                        let baseline = Self::default_pool(&stats);
                        self.air
                            .ammo_entry(&timer.unit_key, baseline)
                            .restore(baseline);
                        let onboard_ammo = stats.ammo;
                        let onboard_fuel = stats.fuel;
                        self.with_unit_mut(location, |unit| {
                            unit.ammo = onboard_ammo;
                            unit.fuel = onboard_fuel;
                            unit.strength =
                                ((f64::from(unit.strength) * 1.1).round() as u32).min(100);
                        });
                    }
                }
            }
            self.air.clear_assignment(&timer.unit_key);
            if let Some(mission) = self.air.mission(&timer.mission_id).cloned() {
                let turn = self.turn_number;
                self.air.report_for_mission(
                    &mission,
                    turn,
                    ReportEvent::RefitCompleted,
                    mission.outcome.as_ref(),
                    None,
                );
            }
            log::info!("squadron {} finished refitting", timer.unit_key);
        }
        self.mark_dirty();
    }

    /// Player aircraft parked on the base camp with no movement spent get
    /// their loadout back at turn start.
    pub(crate) fn rearm_player_base_camp_aircraft(&mut self) {
        let Some(base) = self.base_camp else {
            return;
        };
        let Some(unit) = self.player_units.get(&base).cloned() else {
            return;
        };
        let Ok(stats) = self.stats(&unit.type_key) else {
            return;
        };
        if !stats.is_air() {
            return;
        }
        if self.turn_flags_for(&unit.unit_id).movement_points_used > 0 {
            return;
        }
        if self.air.is_refitting(&unit.unit_id) {
            return;
        }
        let baseline = Self::default_pool(&stats);
        self.air.ammo_entry(&unit.unit_id, baseline).restore(baseline);
        let onboard_ammo = stats.ammo;
        let onboard_fuel = stats.fuel;
        if let Some(entry) = self.player_units.get_mut(&base) {
            entry.ammo = onboard_ammo;
            entry.fuel = onboard_fuel;
            entry.strength = ((f64::from(entry.strength) * 1.1).round() as u32).min(100);
        }
        log::debug!("{} rearmed at the base camp", unit.unit_id);
    }

    /// Bot aircraft rearm automatically between turns (no base-camp
    /// choreography on that side).
    pub(crate) fn auto_rearm_bot_aircraft(&mut self) {
        for (hex, unit) in self.sorted_placements(Faction::Bot) {
            let Ok(stats) = self.stats(&unit.type_key) else {
                continue;
            };
            if !stats.is_air() || self.air.is_refitting(&unit.unit_id) {
                continue;
            }
            let baseline = Self::default_pool(&stats);
            self.air.ammo_entry(&unit.unit_id, baseline).restore(baseline);
            let onboard_ammo = stats.ammo;
            if let Some(entry) = self.bot_units.get_mut(&hex) {
                entry.ammo = onboard_ammo;
            }
        }
    }
}
