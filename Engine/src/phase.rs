//! The battle phase machine.
//!
//! ```text
//! deployment -> player_turn -> bot_turn -> player_turn (turn + 1)
//! any        -> completed (external termination)
//! ```
//!
//! The bot turn is a synchronous sub-phase driven inside `end_turn`; no
//! external tick ever observes the engine waiting in it.

use serde::{Deserialize, Serialize};

/// The engine's coarse phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Deployment,
    PlayerTurn,
    BotTurn,
    Completed,
}

impl BattlePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            BattlePhase::Deployment => "deployment",
            BattlePhase::PlayerTurn => "player_turn",
            BattlePhase::BotTurn => "bot_turn",
            BattlePhase::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Result<BattlePhase, String> {
        match value {
            "deployment" => Ok(BattlePhase::Deployment),
            "player_turn" => Ok(BattlePhase::PlayerTurn),
            "bot_turn" => Ok(BattlePhase::BotTurn),
            "completed" => Ok(BattlePhase::Completed),
            other => Err(format!("unknown phase '{}'", other)),
        }
    }

    /// Whether units can move and fight in this phase.
    pub fn allows_turn_play(self) -> bool {
        matches!(self, BattlePhase::PlayerTurn | BattlePhase::BotTurn)
    }
}
