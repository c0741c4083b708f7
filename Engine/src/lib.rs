//! # Engine Crate
//!
//! The `engine` crate is the deterministic battle state machine at the
//! heart of Hexfront. It coordinates the phase/turn cycle, deployment and
//! reserves, hex movement with terrain-cost budgets, attack resolution
//! with line-of-sight and retaliation, the per-faction supply ledgers,
//! the air-mission lifecycle with layered interception, the synchronous
//! bot sub-phase, snapshot projections, and the serialization contract.
//!
//! ## Architecture
//!
//! `BattleEngine` is the single source of truth: it exclusively owns all
//! mutable state and delegates specialized math to the leaf crates:
//! `hexmap` for geometry and LOS, `combat` for the expectation resolver,
//! `supply` for the ledgers and connectivity, `airops` for mission
//! bookkeeping, and `bot` for the planning heuristics. Snapshots are the
//! only outward-facing views; every mutation invalidates them through a
//! single hook.
//!
//! ## Determinism
//!
//! Engine behavior is a pure function of the configuration (including the
//! PRNG seed) and the operation sequence: placements iterate in sorted
//! hex order, missions resolve in a fixed kind order, and the combat
//! resolver is expectation-based. The seeded PRNG is consulted only by
//! paratrooper scatter.

mod air;
mod attack;
mod bot_turn;
mod config;
mod engine;
mod error;
mod movement;
mod phase;
mod reports;
mod serialize;
mod snapshots;
mod supply_tick;

pub use air::AirMissionRequest;
pub use config::{BattleConfig, DEFAULT_KM_PER_HEX};
pub use engine::{BattleEngine, TurnFlags};
pub use error::EngineError;
pub use phase::BattlePhase;
pub use reports::{
    AttackResolution, CombatPreview, CombatReportEntry, MoveResolution, MovementBudget,
    SupplyTickReport, UnitAttritionReport, COMBAT_REPORT_LIMIT,
};
pub use serialize::{
    SerializedAirMission, SerializedAmmoPool, SerializedBaseCamp, SerializedBattleState,
    SerializedRefitTimer,
};
pub use snapshots::{
    LogisticsSide, LogisticsSnapshot, RosterEntry, RosterSnapshot, SupplySnapshot, SupportAsset,
    SupportSnapshot,
};
