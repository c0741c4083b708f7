//! # Hexfront: Turn-Based Tactical Wargame Engine
//!
//! A deterministic battle state machine for hex-grid tactical wargames:
//! phase/turn orchestration, deployment and reserves, terrain-cost
//! movement, expectation-based combat with retaliation, per-faction
//! supply ledgers with attrition, and a multi-stage air-mission pipeline
//! with layered interception.
//!
//! ## Quick Start
//!
//! ```bash
//! # Build the workspace
//! cargo build --workspace
//!
//! # Run the demo battle
//! cargo run --bin example
//!
//! # Run all tests
//! cargo test --workspace
//! ```
//!
//! ## Workspace Overview
//!
//! Hexfront is organized as a Cargo workspace with specialized crates:
//!
//! - **[`engine`]** - The `BattleEngine` state machine: phases, movement,
//!   attacks, supply ticks, the air lifecycle, the bot sub-phase,
//!   snapshots, and the serialization contract
//! - **[`hexmap`]** - Axial hex geometry, terrain catalog, line of sight
//! - **[`units`]** - Factions, unit classes, the type catalog, instances,
//!   commander profiles
//! - **[`combat`]** - The expectation-based combat resolver
//! - **[`supply`]** - Depot inventories, shipments, upkeep, connectivity
//! - **[`airops`]** - Mission templates, the air-mission board, salvo
//!   pools, refit timers, event queues
//! - **[`bot`]** - Pure planning heuristics for the machine side
//!
//! ## System Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     External driver                       │
//! │   (UI, scenario runner, campaign layer: out of scope)     │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │ operations + snapshots
//! ┌──────────────────────────▼───────────────────────────────┐
//! │                      BattleEngine                         │
//! │  placements · flags · ledgers · air board · reports · rng │
//! └───┬──────────┬──────────┬──────────┬──────────┬──────────┘
//!     │          │          │          │          │
//! ┌───▼───┐  ┌───▼───┐  ┌───▼────┐  ┌──▼────┐  ┌──▼──┐
//! │hexmap │  │combat │  │ supply │  │airops │  │ bot │
//! └───────┘  └───────┘  └────────┘  └───────┘  └─────┘
//! ```
//!
//! The engine owns every piece of mutable state; the leaf crates are pure
//! math and bookkeeping. Snapshots are the only outward views and are
//! defensively copied on every read.

pub mod architecture;

pub use airops;
pub use bot;
pub use combat;
pub use engine;
pub use hexmap;
pub use supply;
pub use units;

// Re-export the types an external driver touches most.
pub use engine::{
    AirMissionRequest, AttackResolution, BattleConfig, BattleEngine, BattlePhase, CombatPreview,
    EngineError, MoveResolution, SerializedBattleState, SupplyTickReport,
};
pub use hexmap::HexCoord;
pub use units::Faction;
