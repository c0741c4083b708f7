//! Engine error kinds.
//!
//! Structural operations fail by returning these values; the engine never
//! panics on bad input. Mid-turn failures leave state untouched: every
//! operation validates first and mutates second.

use crate::phase::BattlePhase;
use airops::ScheduleDenied;
use std::fmt;

/// Why an engine operation was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Operation invoked in a phase that forbids it.
    Phase {
        operation: String,
        phase: BattlePhase,
    },
    /// Malformed or unknown input (bad key, unknown id, bad index).
    Input(String),
    /// Deployment cannot finalize without a base camp.
    NoBaseCamp,
    /// Reserve index past the end of the queue.
    ReserveIndexOutOfRange(usize),
    /// Unit type key missing from the catalog.
    UnknownUnitType(String),
    /// Target coordinate is off the map.
    OutOfBounds,
    /// Destination hex already holds a unit.
    Occupied,
    /// The unit does not belong to the active faction.
    NotYourTurn,
    /// No path within the remaining movement budget.
    NotReachable,
    /// Artillery cannot move after firing.
    PostAttackRestriction,
    /// Non-air units that spent more than half their budget cannot attack.
    MovedTooFarToAttack,
    /// Target outside the weapon's range envelope.
    RangeRestriction,
    /// Ground units without anti-air capability cannot engage aircraft.
    CannotTargetAir,
    /// Neither direct line of sight nor a qualifying spotter.
    NoLineOfFire,
    /// No ammunition or salvo left for this attack.
    AmmoExhausted,
    /// An air-mission scheduling rejection, carrying its code and reason.
    AirScheduling(ScheduleDenied),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Phase { operation, phase } => {
                write!(f, "{} is not allowed during {}", operation, phase.as_str())
            }
            EngineError::Input(reason) => write!(f, "invalid input: {}", reason),
            EngineError::NoBaseCamp => write!(f, "no base camp has been set"),
            EngineError::ReserveIndexOutOfRange(index) => {
                write!(f, "reserve index {} out of range", index)
            }
            EngineError::UnknownUnitType(key) => write!(f, "unknown unit type '{}'", key),
            EngineError::OutOfBounds => write!(f, "hex is out of bounds"),
            EngineError::Occupied => write!(f, "hex is occupied"),
            EngineError::NotYourTurn => write!(f, "unit does not belong to the active faction"),
            EngineError::NotReachable => write!(f, "destination not reachable with current budget"),
            EngineError::PostAttackRestriction => {
                write!(f, "artillery cannot move after attacking")
            }
            EngineError::MovedTooFarToAttack => {
                write!(f, "unit moved too far this turn to attack")
            }
            EngineError::RangeRestriction => write!(f, "target outside weapon range"),
            EngineError::CannotTargetAir => write!(f, "unit cannot engage aircraft"),
            EngineError::NoLineOfFire => write!(f, "no line of fire to the target"),
            EngineError::AmmoExhausted => write!(f, "no ammunition remaining"),
            EngineError::AirScheduling(denied) => write!(f, "air scheduling rejected: {}", denied),
        }
    }
}

impl std::error::Error for EngineError {}
