//! # AirOps Crate
//!
//! The `airops` crate owns the air-mission subsystem's bookkeeping: the
//! mission template catalog, scheduled missions and their lifecycle
//! states, squadron assignment locks, aircraft salvo pools, refit timers,
//! bounded mission reports, and the one-shot arrival/engagement event
//! queues.
//!
//! ## Mission Lifecycle
//!
//! ```text
//! queued -> in_flight -> resolving -> completed
//! ```
//!
//! Each faction's turn end promotes its queued missions, decrements the
//! already-in-flight ones, and resolves everything whose clock reached
//! zero in the fixed kind order strike, escort, transport, air_cover. The
//! geometric side of interception (patrol radii, combat ranges, damage)
//! lives in the engine; this crate guarantees the bookkeeping invariants:
//! one mission per squadron, at most one interception per mission per
//! resolution cycle, drain-once event queues, and bounded reports.

pub mod ammo;
pub mod board;
pub mod catalog;
pub mod events;
pub mod mission;

pub use ammo::AircraftAmmo;
pub use board::{AirMissionBoard, AIR_REPORT_LIMIT};
pub use catalog::{
    standard_templates, MissionKind, MissionTemplate, CAP_PATROL_RADIUS, STRIKE_FOLLOW_DISTANCE,
};
pub use events::{AirEngagementEvent, AirMissionArrival, AirMissionReportEntry, ReportEvent};
pub use mission::{
    MissionOutcome, MissionStatus, RefitTimer, ScheduleDenied, ScheduleErrorCode, ScheduledMission,
};
