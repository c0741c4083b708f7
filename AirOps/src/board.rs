//! The air-mission board: every piece of mutable air-war state.

use crate::ammo::AircraftAmmo;
use crate::catalog::{standard_templates, MissionKind, MissionTemplate};
use crate::events::{AirEngagementEvent, AirMissionArrival, AirMissionReportEntry, ReportEvent};
use crate::mission::{MissionOutcome, MissionStatus, RefitTimer, ScheduledMission};
use std::collections::{BTreeMap, VecDeque};
use std::mem;
use units::Faction;

/// The report buffer keeps at most this many entries.
pub const AIR_REPORT_LIMIT: usize = 50;

/// Owns missions, assignment locks, salvo pools, refit timers, reports,
/// and the one-shot event queues.
///
/// The board is pure bookkeeping: it enforces the lifecycle and its
/// invariants (one mission per squadron, bounded reports, drain-once
/// queues) while the engine supplies the geometry and combat effects.
///
/// # Examples
///
/// ```
/// use airops::{AirMissionBoard, MissionKind, MissionStatus};
/// use units::Faction;
///
/// let mut board = AirMissionBoard::new();
/// let id = board.open_mission(MissionKind::Strike, Faction::Player, "u_1", "0,0", "Ju_87", 1);
/// board.assign("u_1", &id);
/// assert!(board.is_assigned("u_1"));
///
/// let promoted = board.promote_queued(Faction::Player, 1);
/// assert_eq!(promoted, vec![id.clone()]);
/// assert_eq!(board.mission(&id).unwrap().status, MissionStatus::InFlight);
/// ```
#[derive(Debug, Clone)]
pub struct AirMissionBoard {
    templates: Vec<MissionTemplate>,
    missions: Vec<ScheduledMission>,
    /// Squadron key -> mission id. A squadron owns at most one queued or
    /// in-flight mission.
    assignments: BTreeMap<String, String>,
    /// Squadron key -> salvo pool.
    ammo: BTreeMap<String, AircraftAmmo>,
    refits: Vec<RefitTimer>,
    reports: VecDeque<AirMissionReportEntry>,
    pending_arrivals: Vec<AirMissionArrival>,
    pending_engagements: Vec<AirEngagementEvent>,
    next_mission_seq: u64,
    next_report_seq: u64,
}

impl AirMissionBoard {
    pub fn new() -> Self {
        Self {
            templates: standard_templates(),
            missions: Vec::new(),
            assignments: BTreeMap::new(),
            ammo: BTreeMap::new(),
            refits: Vec::new(),
            reports: VecDeque::new(),
            pending_arrivals: Vec::new(),
            pending_engagements: Vec::new(),
            next_mission_seq: 1,
            next_report_seq: 1,
        }
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    pub fn templates(&self) -> &[MissionTemplate] {
        &self.templates
    }

    pub fn template_for(&self, kind: MissionKind) -> Option<&MissionTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    // ------------------------------------------------------------------
    // Missions
    // ------------------------------------------------------------------

    /// Create a queued mission and return its id.
    pub fn open_mission(
        &mut self,
        kind: MissionKind,
        faction: Faction,
        unit_key: &str,
        origin_hex_key: &str,
        unit_type: &str,
        launch_turn: u32,
    ) -> String {
        let id = format!("m_{}", self.next_mission_seq);
        self.next_mission_seq += 1;
        self.missions.push(ScheduledMission {
            id: id.clone(),
            kind,
            faction,
            unit_key: unit_key.to_string(),
            origin_hex_key: origin_hex_key.to_string(),
            unit_type: unit_type.to_string(),
            status: MissionStatus::Queued,
            launch_turn,
            turns_remaining: 0,
            target_hex: None,
            target_unit_key: None,
            escort_target_unit_key: None,
            interceptions: 0,
            outcome: None,
        });
        id
    }

    /// Insert a fully-formed mission (hydration path).
    pub fn restore_mission(&mut self, mission: ScheduledMission) {
        self.missions.push(mission);
        self.recompute_mission_seq();
    }

    pub fn missions(&self) -> &[ScheduledMission] {
        &self.missions
    }

    pub fn mission(&self, id: &str) -> Option<&ScheduledMission> {
        self.missions.iter().find(|m| m.id == id)
    }

    pub fn mission_mut(&mut self, id: &str) -> Option<&mut ScheduledMission> {
        self.missions.iter_mut().find(|m| m.id == id)
    }

    /// Missions, optionally filtered by faction, in scheduling order.
    pub fn missions_for(&self, faction: Option<Faction>) -> Vec<ScheduledMission> {
        self.missions
            .iter()
            .filter(|m| faction.map(|f| m.faction == f).unwrap_or(true))
            .cloned()
            .collect()
    }

    /// Queued departures of one faction sharing an origin hex, for airbase
    /// capacity checks.
    pub fn queued_departures_from(&self, faction: Faction, origin_hex_key: &str) -> usize {
        self.missions
            .iter()
            .filter(|m| {
                m.faction == faction
                    && m.status == MissionStatus::Queued
                    && m.origin_hex_key == origin_hex_key
            })
            .count()
    }

    /// Remove a queued mission and clear its squadron lock. Returns
    /// `false` when the mission is missing or already in flight.
    pub fn cancel_queued(&mut self, id: &str) -> bool {
        let Some(index) = self
            .missions
            .iter()
            .position(|m| m.id == id && m.status == MissionStatus::Queued)
        else {
            return false;
        };
        let mission = self.missions.remove(index);
        self.assignments.remove(&mission.unit_key);
        log::info!("air mission {} cancelled before launch", id);
        true
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start a resolution cycle: interception counters reset for every
    /// in-flight mission so each CAP and escort can commit once this
    /// cycle.
    pub fn begin_resolution_cycle(&mut self) {
        for mission in &mut self.missions {
            if mission.status == MissionStatus::InFlight {
                mission.interceptions = 0;
            }
        }
    }

    /// Promote every queued mission of `faction` to in-flight, stamp its
    /// duration, and buffer an arrival event. Returns the promoted ids in
    /// scheduling order.
    pub fn promote_queued(&mut self, faction: Faction, _turn: u32) -> Vec<String> {
        let mut promoted = Vec::new();
        let durations: BTreeMap<&'static str, u32> = self
            .templates
            .iter()
            .map(|t| (t.kind.as_str(), t.duration_turns))
            .collect();
        for mission in &mut self.missions {
            if mission.faction != faction || mission.status != MissionStatus::Queued {
                continue;
            }
            mission.status = MissionStatus::InFlight;
            mission.turns_remaining = durations.get(mission.kind.as_str()).copied().unwrap_or(1);
            promoted.push(mission.id.clone());
            self.pending_arrivals.push(AirMissionArrival {
                mission_id: mission.id.clone(),
                faction: mission.faction,
                unit_key: mission.unit_key.clone(),
                origin_hex_key: Some(mission.origin_hex_key.clone()),
                unit_type: mission.unit_type.clone(),
                kind: mission.kind,
                target_hex: mission.target_hex,
                target_unit_key: mission.target_unit_key.clone(),
                escort_target_unit_key: mission.escort_target_unit_key.clone(),
            });
            log::info!(
                "air mission {} ({}) airborne for {}",
                mission.id,
                mission.kind.as_str(),
                mission.faction.as_str()
            );
        }
        promoted
    }

    /// Decrement the clock on missions that were already in flight before
    /// this step (everything in flight except `promoted_now`).
    pub fn tick_in_flight(&mut self, faction: Faction, promoted_now: &[String]) {
        for mission in &mut self.missions {
            if mission.faction == faction
                && mission.status == MissionStatus::InFlight
                && !promoted_now.contains(&mission.id)
            {
                mission.turns_remaining = mission.turns_remaining.saturating_sub(1);
            }
        }
    }

    /// Ids of in-flight missions whose clock has run out, in resolution
    /// kind order, scheduling order within a kind.
    pub fn due_mission_ids(&self, faction: Faction) -> Vec<String> {
        let mut due = Vec::new();
        for kind in MissionKind::RESOLUTION_ORDER {
            for mission in &self.missions {
                if mission.faction == faction
                    && mission.kind == kind
                    && mission.status == MissionStatus::InFlight
                    && mission.turns_remaining == 0
                {
                    due.push(mission.id.clone());
                }
            }
        }
        due
    }

    /// Move a due mission into `resolving`.
    pub fn begin_resolving(&mut self, id: &str) {
        if let Some(mission) = self.mission_mut(id) {
            mission.status = MissionStatus::Resolving;
        }
    }

    /// Complete a mission with its outcome. The squadron lock is released
    /// unless the outcome demands a refit (the lock then holds until the
    /// refit finishes).
    pub fn complete_mission(&mut self, id: &str, outcome: MissionOutcome) {
        let Some(mission) = self.missions.iter_mut().find(|m| m.id == id) else {
            return;
        };
        mission.status = MissionStatus::Completed;
        let unit_key = mission.unit_key.clone();
        let refit_required = outcome.refit_required;
        mission.outcome = Some(outcome);
        if !refit_required {
            self.assignments.remove(&unit_key);
        }
    }

    // ------------------------------------------------------------------
    // Assignment locks
    // ------------------------------------------------------------------

    pub fn assign(&mut self, unit_key: &str, mission_id: &str) {
        self.assignments
            .insert(unit_key.to_string(), mission_id.to_string());
    }

    pub fn assignment_for(&self, unit_key: &str) -> Option<&String> {
        self.assignments.get(unit_key)
    }

    pub fn is_assigned(&self, unit_key: &str) -> bool {
        self.assignments.contains_key(unit_key)
    }

    pub fn clear_assignment(&mut self, unit_key: &str) {
        self.assignments.remove(unit_key);
    }

    // ------------------------------------------------------------------
    // Salvo pools
    // ------------------------------------------------------------------

    /// The squadron's pool, creating it from `default` on first touch.
    pub fn ammo_entry(&mut self, unit_key: &str, default: AircraftAmmo) -> &mut AircraftAmmo {
        self.ammo.entry(unit_key.to_string()).or_insert(default)
    }

    /// A copy of the squadron's pool, if it has ever been initialized.
    pub fn ammo_for(&self, unit_key: &str) -> Option<AircraftAmmo> {
        self.ammo.get(unit_key).copied()
    }

    /// All pools in stable key order (snapshot support).
    pub fn ammo_pools(&self) -> &BTreeMap<String, AircraftAmmo> {
        &self.ammo
    }

    /// Drop pools for squadrons that no longer exist.
    pub fn clear_ammo(&mut self) {
        self.ammo.clear();
    }

    // ------------------------------------------------------------------
    // Refit timers
    // ------------------------------------------------------------------

    pub fn start_refit(&mut self, timer: RefitTimer) {
        log::info!(
            "squadron {} entering refit for {} turns",
            timer.unit_key,
            timer.remaining_turns
        );
        self.refits.push(timer);
    }

    pub fn refits(&self) -> &[RefitTimer] {
        &self.refits
    }

    pub fn is_refitting(&self, unit_key: &str) -> bool {
        self.refits.iter().any(|r| r.unit_key == unit_key)
    }

    /// Tick down the faction's refit timers; completed timers are removed
    /// and returned. Squadrons in `started_this_step` keep their full
    /// clock (their refit began during the current turn end).
    pub fn tick_refits(&mut self, faction: Faction, started_this_step: &[String]) -> Vec<RefitTimer> {
        for timer in &mut self.refits {
            if timer.faction == faction && !started_this_step.contains(&timer.unit_key) {
                timer.remaining_turns = timer.remaining_turns.saturating_sub(1);
            }
        }
        let mut completed = Vec::new();
        let mut index = 0;
        while index < self.refits.len() {
            if self.refits[index].faction == faction && self.refits[index].remaining_turns == 0 {
                completed.push(self.refits.remove(index));
            } else {
                index += 1;
            }
        }
        completed
    }

    /// Remaining refit turns for a squadron, if it is refitting.
    pub fn refit_remaining(&self, unit_key: &str) -> Option<u32> {
        self.refits
            .iter()
            .find(|r| r.unit_key == unit_key)
            .map(|r| r.remaining_turns)
    }

    pub fn clear_refits(&mut self) {
        self.refits.clear();
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    /// Append a report entry, assigning it the next report id and trimming
    /// the buffer.
    pub fn push_report(&mut self, mut entry: AirMissionReportEntry) {
        entry.id = format!("ar_{}", self.next_report_seq);
        self.next_report_seq += 1;
        self.reports.push_back(entry);
        while self.reports.len() > AIR_REPORT_LIMIT {
            self.reports.pop_front();
        }
    }

    /// Restore a report entry verbatim (hydration path).
    pub fn restore_report(&mut self, entry: AirMissionReportEntry) {
        self.reports.push_back(entry);
        while self.reports.len() > AIR_REPORT_LIMIT {
            self.reports.pop_front();
        }
        self.recompute_report_seq();
    }

    pub fn reports(&self) -> Vec<AirMissionReportEntry> {
        self.reports.iter().cloned().collect()
    }

    /// Convenience: build-and-push a resolution report for a mission.
    pub fn report_for_mission(
        &mut self,
        mission: &ScheduledMission,
        turn: u32,
        event: ReportEvent,
        outcome: Option<&MissionOutcome>,
        notes: Option<String>,
    ) {
        self.push_report(AirMissionReportEntry {
            id: String::new(),
            mission_id: mission.id.clone(),
            turn_resolved: turn,
            faction: mission.faction,
            unit_type: mission.unit_type.clone(),
            unit_key: mission.unit_key.clone(),
            kind: mission.kind,
            outcome: outcome.map(|o| o.result.clone()),
            event,
            interceptions: outcome.map(|o| o.interceptions),
            kills: outcome.map(|o| o.kills),
            bomber_attrition: outcome.map(|o| o.bomber_attrition),
            notes,
        });
    }

    // ------------------------------------------------------------------
    // One-shot event queues
    // ------------------------------------------------------------------

    pub fn push_engagement(&mut self, event: AirEngagementEvent) {
        self.pending_engagements.push(event);
    }

    /// Drain the buffered arrival events. A second call returns empty.
    pub fn consume_arrivals(&mut self) -> Vec<AirMissionArrival> {
        mem::take(&mut self.pending_arrivals)
    }

    /// Drain the buffered engagement events. A second call returns empty.
    pub fn consume_engagements(&mut self) -> Vec<AirEngagementEvent> {
        mem::take(&mut self.pending_engagements)
    }

    // ------------------------------------------------------------------
    // Hydration support
    // ------------------------------------------------------------------

    /// Reset the board to empty (hydration clears all mirrors first).
    pub fn reset(&mut self) {
        self.missions.clear();
        self.assignments.clear();
        self.ammo.clear();
        self.refits.clear();
        self.reports.clear();
        self.pending_arrivals.clear();
        self.pending_engagements.clear();
        self.next_mission_seq = 1;
        self.next_report_seq = 1;
    }

    /// Rebuild assignment locks from live (queued or in-flight) missions.
    pub fn rebuild_assignments(&mut self) {
        self.assignments.clear();
        let locks: Vec<(String, String)> = self
            .missions
            .iter()
            .filter(|m| {
                matches!(
                    m.status,
                    MissionStatus::Queued | MissionStatus::InFlight | MissionStatus::Resolving
                )
            })
            .map(|m| (m.unit_key.clone(), m.id.clone()))
            .collect();
        for (unit_key, mission_id) in locks {
            self.assignments.insert(unit_key, mission_id);
        }
        // Refitting squadrons keep their lock until the refit completes.
        let refit_locks: Vec<(String, String)> = self
            .refits
            .iter()
            .map(|r| (r.unit_key.clone(), r.mission_id.clone()))
            .collect();
        for (unit_key, mission_id) in refit_locks {
            self.assignments.insert(unit_key, mission_id);
        }
    }

    fn recompute_mission_seq(&mut self) {
        let max = self
            .missions
            .iter()
            .filter_map(|m| m.id.strip_prefix("m_").and_then(|s| s.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        self.next_mission_seq = self.next_mission_seq.max(max + 1);
    }

    fn recompute_report_seq(&mut self) {
        let max = self
            .reports
            .iter()
            .filter_map(|r| r.id.strip_prefix("ar_").and_then(|s| s.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        self.next_report_seq = self.next_report_seq.max(max + 1);
    }
}

impl Default for AirMissionBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(board: &mut AirMissionBoard, faction: Faction, key: &str) -> String {
        let id = board.open_mission(MissionKind::Strike, faction, key, "0,0", "Ju_87", 1);
        board.assign(key, &id);
        id
    }

    #[test]
    fn test_promotion_sets_duration_and_buffers_arrival() {
        let mut board = AirMissionBoard::new();
        let id = strike(&mut board, Faction::Player, "u_1");
        let promoted = board.promote_queued(Faction::Player, 1);
        assert_eq!(promoted, vec![id.clone()]);
        let mission = board.mission(&id).unwrap();
        assert_eq!(mission.status, MissionStatus::InFlight);
        assert_eq!(mission.turns_remaining, 1);

        let arrivals = board.consume_arrivals();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].mission_id, id);
        // Drain-once: the second consume is empty.
        assert!(board.consume_arrivals().is_empty());
    }

    #[test]
    fn test_tick_skips_missions_promoted_this_step() {
        let mut board = AirMissionBoard::new();
        let early = strike(&mut board, Faction::Player, "u_1");
        let promoted = board.promote_queued(Faction::Player, 1);
        board.tick_in_flight(Faction::Player, &promoted);
        assert_eq!(board.mission(&early).unwrap().turns_remaining, 1);

        // Next turn: nothing newly promoted, the clock runs down.
        let promoted = board.promote_queued(Faction::Player, 2);
        assert!(promoted.is_empty());
        board.tick_in_flight(Faction::Player, &promoted);
        assert_eq!(board.mission(&early).unwrap().turns_remaining, 0);
        assert_eq!(board.due_mission_ids(Faction::Player), vec![early]);
    }

    #[test]
    fn test_due_missions_follow_kind_order() {
        let mut board = AirMissionBoard::new();
        let cap = board.open_mission(MissionKind::AirCover, Faction::Bot, "u_c", "0,0", "Bf_109", 1);
        let escort = board.open_mission(MissionKind::Escort, Faction::Bot, "u_e", "0,0", "Bf_109", 1);
        let strike = board.open_mission(MissionKind::Strike, Faction::Bot, "u_s", "0,0", "Ju_87", 1);
        for id in [&cap, &escort, &strike] {
            let mission = board.mission_mut(id).unwrap();
            mission.status = MissionStatus::InFlight;
            mission.turns_remaining = 0;
        }
        assert_eq!(board.due_mission_ids(Faction::Bot), vec![strike, escort, cap]);
    }

    #[test]
    fn test_completion_releases_lock_unless_refitting() {
        let mut board = AirMissionBoard::new();
        let id = strike(&mut board, Faction::Player, "u_1");
        board.complete_mission(&id, MissionOutcome::completed());
        assert!(!board.is_assigned("u_1"));

        let id2 = strike(&mut board, Faction::Player, "u_2");
        let mut outcome = MissionOutcome::completed();
        outcome.refit_required = true;
        board.complete_mission(&id2, outcome);
        assert!(board.is_assigned("u_2"));
    }

    #[test]
    fn test_refit_timers_tick_per_faction() {
        let mut board = AirMissionBoard::new();
        board.start_refit(RefitTimer {
            mission_id: "m_9".to_string(),
            unit_key: "u_p".to_string(),
            faction: Faction::Player,
            remaining_turns: 2,
        });
        board.start_refit(RefitTimer {
            mission_id: "m_10".to_string(),
            unit_key: "u_b".to_string(),
            faction: Faction::Bot,
            remaining_turns: 1,
        });
        assert!(board.tick_refits(Faction::Player, &[]).is_empty());
        assert_eq!(board.refit_remaining("u_p"), Some(1));
        // Bot timers untouched by the player tick.
        assert_eq!(board.refit_remaining("u_b"), Some(1));
        let done = board.tick_refits(Faction::Player, &[]);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].unit_key, "u_p");
        assert!(!board.is_refitting("u_p"));

        // A refit started this very step keeps its full clock.
        board.start_refit(RefitTimer {
            mission_id: "m_11".to_string(),
            unit_key: "u_q".to_string(),
            faction: Faction::Player,
            remaining_turns: 1,
        });
        let fresh = vec!["u_q".to_string()];
        assert!(board.tick_refits(Faction::Player, &fresh).is_empty());
        assert_eq!(board.refit_remaining("u_q"), Some(1));
    }

    #[test]
    fn test_report_buffer_is_bounded() {
        let mut board = AirMissionBoard::new();
        let id = strike(&mut board, Faction::Player, "u_1");
        let mission = board.mission(&id).unwrap().clone();
        for turn in 0..(AIR_REPORT_LIMIT as u32 + 7) {
            board.report_for_mission(&mission, turn, ReportEvent::Resolved, None, None);
        }
        let reports = board.reports();
        assert_eq!(reports.len(), AIR_REPORT_LIMIT);
        assert_eq!(reports.first().unwrap().turn_resolved, 7);
    }

    #[test]
    fn test_cancel_queued_only() {
        let mut board = AirMissionBoard::new();
        let id = strike(&mut board, Faction::Player, "u_1");
        board.promote_queued(Faction::Player, 1);
        assert!(!board.cancel_queued(&id));

        let id2 = strike(&mut board, Faction::Player, "u_2");
        assert!(board.cancel_queued(&id2));
        assert!(board.mission(&id2).is_none());
        assert!(!board.is_assigned("u_2"));
    }

    #[test]
    fn test_resolution_cycle_resets_interception_counters() {
        let mut board = AirMissionBoard::new();
        let id = board.open_mission(MissionKind::AirCover, Faction::Bot, "u_c", "0,0", "Bf_109", 1);
        {
            let mission = board.mission_mut(&id).unwrap();
            mission.status = MissionStatus::InFlight;
            mission.interceptions = 1;
        }
        board.begin_resolution_cycle();
        assert_eq!(board.mission(&id).unwrap().interceptions, 0);
    }
}
