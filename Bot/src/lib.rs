//! # Bot Crate
//!
//! Pure planning primitives for the machine-controlled faction. The crate
//! consumes read-only views of both sides plus a map oracle and produces
//! action lists; the engine executes those actions through the same
//! primitives the player uses (`move_unit`, `attack_unit`,
//! `try_schedule_air_mission`).
//!
//! ## Heuristics
//!
//! - **Ground**: each unit steps along axial neighbors toward the nearest
//!   hostile and attacks once it is inside its weapon envelope
//! - **Air**: one strike against the nearest non-air hostile, an escort
//!   paired to the earliest queued strike, then combat air patrol over a
//!   contested objective (or the home station when none is threatened)
//! - **Difficulty**: a single damage scalar applied to bot attacks
//!
//! Everything here is deterministic: candidate lists are sorted before
//! selection, ties resolve by unit id.

pub mod plan;

pub use plan::{
    nearest_hostile, plan_air_missions, plan_ground_actions, step_toward, BotAction, BotAirPlan,
    BotUnitView, Difficulty, MapOracle, SquadronView,
};
