//! # Combat Crate
//!
//! The `combat` crate provides the expectation-based combat resolver for
//! Hexfront. It consumes attacker and defender profiles plus their combat
//! contexts (facing, terrain cover, entrenchment, spotting, commander
//! bonuses) and returns an expectation record: damage per hit, expected
//! damage, expected suppression, and accuracy. No dice are rolled: the
//! resolver is a pure deterministic function, which keeps the whole engine
//! replayable from its inputs.
//!
//! ## Resolution Flow
//!
//! 1. Build [`CombatantProfile`]s from catalog stats
//! 2. Build the attacker and defender contexts from engine state
//! 3. Call [`resolve_expected`] for the expectation record
//! 4. The engine applies the engagement post-multiplier ([`Engagement`])
//!    and rounds into inflicted strength damage

mod combat_resolver;
mod combat_result;
mod combat_stats;

pub use combat_resolver::resolve_expected;
pub use combat_result::{retaliation_multiplier, CombatExpectation, Engagement};
pub use combat_stats::{facing_aspect, AttackerContext, CombatantProfile, DefenderContext, FacingAspect};
