//! One-shot air events and the mission report entry.
//!
//! Arrival and engagement events are buffered, not derived: "just
//! transitioned" and "just fought" are one-shot facts a consumer drains
//! exactly once. Re-deriving them from mission state would lose that
//! semantic.

use crate::catalog::MissionKind;
use hexmap::HexCoord;
use serde::{Deserialize, Serialize};
use units::Faction;

/// Emitted when a queued mission is promoted to in-flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirMissionArrival {
    pub mission_id: String,
    pub faction: Faction,
    pub unit_key: String,
    pub origin_hex_key: Option<String>,
    pub unit_type: String,
    pub kind: MissionKind,
    pub target_hex: Option<HexCoord>,
    pub target_unit_key: Option<String>,
    pub escort_target_unit_key: Option<String>,
}

/// Emitted when interceptors meet a strike package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirEngagementEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// Hex key of the engagement location (the strike target).
    pub location: String,
    /// Squadron key of the striking aircraft.
    pub bomber: String,
    /// Squadron keys of the CAP flights that committed.
    pub interceptors: Vec<String>,
    /// Squadron keys of the escorts that met them.
    pub escorts: Vec<String>,
}

impl AirEngagementEvent {
    pub fn air_to_air(
        location: String,
        bomber: String,
        interceptors: Vec<String>,
        escorts: Vec<String>,
    ) -> Self {
        Self {
            event_type: "airToAir".to_string(),
            location,
            bomber,
            interceptors,
            escorts,
        }
    }
}

/// What a report entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportEvent {
    #[serde(rename = "resolved")]
    Resolved,
    #[serde(rename = "refitStarted")]
    RefitStarted,
    #[serde(rename = "refitCompleted")]
    RefitCompleted,
}

/// One bounded-buffer air-mission report entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirMissionReportEntry {
    pub id: String,
    pub mission_id: String,
    pub turn_resolved: u32,
    pub faction: Faction,
    pub unit_type: String,
    pub unit_key: String,
    pub kind: MissionKind,
    pub outcome: Option<String>,
    pub event: ReportEvent,
    pub interceptions: Option<u32>,
    pub kills: Option<u32>,
    pub bomber_attrition: Option<f64>,
    pub notes: Option<String>,
}
