//! Faction affiliation for units and engine state.

use serde::{Deserialize, Serialize};

/// The two sides of a battle.
///
/// Determines friend-or-foe relationships for combat, movement blocking,
/// supply ledgers, and air-mission ownership.
///
/// # Examples
///
/// ```
/// use units::Faction;
///
/// assert_eq!(Faction::Player.opponent(), Faction::Bot);
/// assert_eq!(Faction::Bot.opponent(), Faction::Player);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The human-controlled side.
    Player,
    /// The machine-controlled side, driven synchronously inside `end_turn`.
    Bot,
}

impl Faction {
    /// The opposing faction.
    pub fn opponent(self) -> Faction {
        match self {
            Faction::Player => Faction::Bot,
            Faction::Bot => Faction::Player,
        }
    }

    /// Stable lowercase name used in serialized state and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Faction::Player => "player",
            Faction::Bot => "bot",
        }
    }

    /// Parse the serialized faction name.
    pub fn parse(value: &str) -> Result<Faction, String> {
        match value {
            "player" | "Player" => Ok(Faction::Player),
            "bot" | "Bot" => Ok(Faction::Bot),
            other => Err(format!("unknown faction '{}'", other)),
        }
    }
}
