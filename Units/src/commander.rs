//! Commander bonus profiles.
//!
//! Bonuses are independent scalars applied at fixed points: the move
//! scalar at budget computation, the supply bonus at upkeep scaling, and
//! the accuracy/damage bonuses as resolver inputs. They are never applied
//! as global mutators.

use serde::{Deserialize, Serialize};

/// Per-commander bonus scalars. A default profile is neutral everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommanderProfile {
    /// Multiplier on base movement before the budget floor.
    pub move_scalar: f64,
    /// Percentage reduction of upkeep and attrition costs.
    pub supply_bonus_pct: f64,
    /// Percentage added to resolver accuracy.
    pub accuracy_bonus_pct: f64,
    /// Percentage added to resolver expected damage.
    pub damage_bonus_pct: f64,
}

impl CommanderProfile {
    /// The scalar applied to supply draws and attrition:
    /// `max(0, 1 - supply_bonus_pct / 100)`.
    pub fn supply_scalar(&self) -> f64 {
        (1.0 - self.supply_bonus_pct / 100.0).max(0.0)
    }
}

impl Default for CommanderProfile {
    fn default() -> Self {
        Self {
            move_scalar: 1.0,
            supply_bonus_pct: 0.0,
            accuracy_bonus_pct: 0.0,
            damage_bonus_pct: 0.0,
        }
    }
}
