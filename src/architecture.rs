//! # Architecture Documentation
//!
//! This module documents how the Hexfront workspace fits together.
//!
//! # Crate Organization
//!
//! ## Engine Crate: Battle State Machine
//!
//! **Purpose:** Single source of truth for battle state
//!
//! **Responsibilities:**
//! - Phase/turn orchestration (deployment → player turn → bot turn)
//! - Deployment and reserve bookkeeping
//! - Movement validation with terrain-cost budgets
//! - Attack resolution with LOS, spotting, and retaliation
//! - Supply ticks, air-mission lifecycle, refits
//! - Snapshot projections and the serialization contract
//!
//! **Key Types:**
//! - `BattleEngine`: central state container
//! - `BattleConfig`: read-only inputs (map, catalogs, commander, seed)
//! - `SerializedBattleState`: the save contract
//!
//! ## Hexmap Crate: Geometry and Terrain
//!
//! **Purpose:** Pure hex math and the terrain oracle
//!
//! **Key Types:**
//! - `HexCoord`: axial coordinates with `"q,r"` keys
//! - `TerrainCatalog`: move costs, cover, LOS blockers, roads
//! - `BattleMap`: the bounded tile store
//! - `line_of_sight()`: sight-line tracing with the airborne bypass
//!
//! ## Combat Crate: Expectation Resolver
//!
//! **Purpose:** Deterministic combat math, isolated from state
//!
//! **Key Types:**
//! - `CombatantProfile` / `AttackerContext` / `DefenderContext`
//! - `CombatExpectation`: damage per hit, expected damage/suppression,
//!   accuracy
//! - `Engagement`: bomber x10 / fighter x4 / standard post-multipliers
//!
//! ## Supply Crate: Logistics Ledger
//!
//! **Purpose:** Per-faction depot state and connectivity
//!
//! **Key Types:**
//! - `SupplyState`: inventory, shipments, production, bounded ledger,
//!   unit mirror
//! - `connected_hexes()`: road-first flood from the supply sources
//!
//! ## AirOps Crate: Mission Bookkeeping
//!
//! **Purpose:** The air war's mutable records, minus the geometry
//!
//! **Key Types:**
//! - `AirMissionBoard`: missions, locks, salvo pools, refit timers,
//!   bounded reports, drain-once event queues
//! - `MissionTemplate` / `ScheduledMission` / `MissionOutcome`
//! - `ScheduleDenied`: the exhaustive rejection codes
//!
//! ## Bot Crate: Planning Heuristics
//!
//! **Purpose:** Pure decisions over read-only views
//!
//! **Key Types:**
//! - `BotUnitView` / `SquadronView` / `MapOracle`
//! - `plan_ground_actions()` / `plan_air_missions()`
//! - `Difficulty`: a damage scalar per level
//!
//! # Data Flow
//!
//! 1. A driver calls an engine operation (`move_unit`, `attack_unit`,
//!    `try_schedule_air_mission`, `end_turn`, ...)
//! 2. The engine validates first and mutates second; a failed validation
//!    leaves no partial writes
//! 3. Mutations update placements, flags, pools, ledgers, and the event
//!    queues, then invalidate the snapshot caches through one hook
//! 4. The driver reads snapshots (defensive copies) and drains the
//!    one-shot event queues
//!
//! # Ordering Guarantees
//!
//! Inside one `end_turn`:
//!
//! 1. Player air-mission step (promote → tick → resolve by kind)
//! 2. Player refit ticks
//! 3. Player supply tick (shipments → production → upkeep)
//! 4. Flip to the bot; the bot sub-phase runs synchronously
//! 5. Bot air step, refits, supply tick, auto-rearm
//! 6. Flip back to the player; turn number increments
//!
//! Within a strike resolution: escorts attrit CAP, surviving CAP engages
//! the bomber, then the bomb run.
//!
//! # Determinism
//!
//! Given the same configuration (seed included) and operation sequence,
//! every state in the run is identical: placements iterate in sorted hex
//! order, squadron walks sort by stable id, missions resolve in a fixed
//! kind order, and the resolver never samples. The PRNG only feeds
//! paratrooper scatter.
