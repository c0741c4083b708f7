//! Scheduled missions, outcomes, refit timers, and scheduling errors.

use crate::catalog::MissionKind;
use hexmap::HexCoord;
use serde::{Deserialize, Serialize};
use std::fmt;
use units::Faction;

/// Lifecycle state of a scheduled mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Queued,
    InFlight,
    Resolving,
    Completed,
}

impl MissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MissionStatus::Queued => "queued",
            MissionStatus::InFlight => "in_flight",
            MissionStatus::Resolving => "resolving",
            MissionStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Result<MissionStatus, String> {
        match value {
            "queued" => Ok(MissionStatus::Queued),
            "in_flight" => Ok(MissionStatus::InFlight),
            "resolving" => Ok(MissionStatus::Resolving),
            "completed" => Ok(MissionStatus::Completed),
            other => Err(format!("unknown mission status '{}'", other)),
        }
    }
}

/// How a completed mission ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionOutcome {
    /// `"completed"`, `"aborted"`, or `"failed"`.
    pub result: String,
    /// Whether the squadron must refit before taking another mission.
    pub refit_required: bool,
    /// Interception engagements this mission was part of.
    pub interceptions: u32,
    /// Enemy units destroyed during resolution.
    pub kills: u32,
    /// Strength the striking squadron lost to interceptors.
    pub bomber_attrition: f64,
    pub notes: Option<String>,
}

impl MissionOutcome {
    pub fn completed() -> Self {
        Self {
            result: "completed".to_string(),
            refit_required: false,
            interceptions: 0,
            kills: 0,
            bomber_attrition: 0.0,
            notes: None,
        }
    }

    pub fn aborted(notes: &str) -> Self {
        Self {
            result: "aborted".to_string(),
            refit_required: false,
            interceptions: 0,
            kills: 0,
            bomber_attrition: 0.0,
            notes: Some(notes.to_string()),
        }
    }
}

/// One scheduled air mission.
///
/// `unit_key` is the squadron's stable unit id. Legacy saves may carry a
/// hex key here; hydration upgrades those by lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMission {
    pub id: String,
    pub kind: MissionKind,
    pub faction: Faction,
    pub unit_key: String,
    pub origin_hex_key: String,
    #[serde(rename = "unit_type")]
    pub unit_type: String,
    pub status: MissionStatus,
    pub launch_turn: u32,
    pub turns_remaining: u32,
    pub target_hex: Option<HexCoord>,
    pub target_unit_key: Option<String>,
    pub escort_target_unit_key: Option<String>,
    /// Interception counter consumed during the current resolution cycle.
    pub interceptions: u32,
    pub outcome: Option<MissionOutcome>,
}

/// A squadron rebuilding its loadout after running dry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefitTimer {
    pub mission_id: String,
    pub unit_key: String,
    pub faction: Faction,
    pub remaining_turns: u32,
}

/// The exhaustive scheduling rejection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleErrorCode {
    PhaseInvalid,
    WrongFaction,
    NoUnitAtHex,
    NotAircraft,
    NoAirSupportProfile,
    RoleNotEligible,
    AlreadyAssigned,
    NeedsRefit,
    TargetRequired,
    EscortTargetRequired,
    OutOfRange,
    EscortTargetMissing,
    EscortTargetInFlight,
    AirbaseCapacityExceeded,
}

impl ScheduleErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleErrorCode::PhaseInvalid => "PhaseInvalid",
            ScheduleErrorCode::WrongFaction => "WrongFaction",
            ScheduleErrorCode::NoUnitAtHex => "NoUnitAtHex",
            ScheduleErrorCode::NotAircraft => "NotAircraft",
            ScheduleErrorCode::NoAirSupportProfile => "NoAirSupportProfile",
            ScheduleErrorCode::RoleNotEligible => "RoleNotEligible",
            ScheduleErrorCode::AlreadyAssigned => "AlreadyAssigned",
            ScheduleErrorCode::NeedsRefit => "NeedsRefit",
            ScheduleErrorCode::TargetRequired => "TargetRequired",
            ScheduleErrorCode::EscortTargetRequired => "EscortTargetRequired",
            ScheduleErrorCode::OutOfRange => "OutOfRange",
            ScheduleErrorCode::EscortTargetMissing => "EscortTargetMissing",
            ScheduleErrorCode::EscortTargetInFlight => "EscortTargetInFlight",
            ScheduleErrorCode::AirbaseCapacityExceeded => "AirbaseCapacityExceeded",
        }
    }
}

/// A rejected scheduling request: machine code plus human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDenied {
    pub code: ScheduleErrorCode,
    pub reason: String,
}

impl ScheduleDenied {
    pub fn new(code: ScheduleErrorCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ScheduleDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.reason)
    }
}

impl std::error::Error for ScheduleDenied {}
