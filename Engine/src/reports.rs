//! Result records returned by engine operations and kept in the bounded
//! report buffers.

use combat::{CombatExpectation, Engagement};
use hexmap::HexCoord;
use serde::{Deserialize, Serialize};
use supply::{Resource, Shipment};
use units::Faction;

/// The combat report buffer keeps at most this many entries.
pub const COMBAT_REPORT_LIMIT: usize = 50;

/// One entry in the combat report buffer, appended in the order damage was
/// applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatReportEntry {
    pub id: String,
    pub turn: u32,
    pub attacker_faction: Faction,
    pub attacker_id: String,
    pub attacker_type: String,
    pub attacker_hex: String,
    pub defender_id: String,
    pub defender_type: String,
    pub defender_hex: String,
    pub inflicted: u32,
    pub retaliation_inflicted: Option<u32>,
    pub defender_destroyed: bool,
    pub attacker_destroyed: bool,
    pub note: Option<String>,
}

/// Outcome of a successful `move_unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResolution {
    pub from: HexCoord,
    pub to: HexCoord,
    pub cost: u32,
    pub remaining_budget: u32,
}

/// Breakdown of a unit's movement budget this turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementBudget {
    /// Budget before post-attack penalties.
    pub base: u32,
    /// Budget after post-attack penalties.
    pub effective: u32,
    pub used: u32,
    pub remaining: u32,
}

/// Full outcome of one attack exchange, retaliation included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackResolution {
    pub attacker_id: String,
    pub defender_id: String,
    /// Absent when interceptors shot the attack down before delivery.
    pub expectation: Option<CombatExpectation>,
    pub engagement: Engagement,
    pub inflicted: u32,
    pub defender_destroyed: bool,
    pub retaliation_inflicted: Option<u32>,
    pub attacker_destroyed: bool,
    /// Why retaliation did not (fully) happen, when it did not.
    pub retaliation_note: Option<String>,
    /// Whether opposing CAP engaged before the attack was delivered.
    pub intercepted: bool,
    /// The attack never reached the target (attacker destroyed en route).
    pub aborted: bool,
}

/// Non-mutating projection of an attack, for UI confirmation dialogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatPreview {
    pub expectation: CombatExpectation,
    pub engagement: Engagement,
    pub projected_damage: u32,
    pub defender_can_retaliate: bool,
}

/// What one unit cost (or lost) during a supply tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitAttritionReport {
    pub unit_id: String,
    pub strength_lost: f64,
    pub ammo_lost: f64,
    pub fuel_lost: f64,
    pub destroyed: bool,
}

/// Outcome of one faction's supply tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyTickReport {
    pub faction: Faction,
    pub turn: u32,
    pub delivered: Vec<Shipment>,
    pub produced: Vec<(Resource, f64)>,
    /// Total depot draw per resource across all connected units.
    pub upkeep_drawn: Vec<(Resource, f64)>,
    /// Unit ids that were cut off from every supply source.
    pub out_of_supply: Vec<String>,
    pub attrition: Vec<UnitAttritionReport>,
}
