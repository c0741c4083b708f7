//! Mission kinds and the template catalog.

use serde::{Deserialize, Serialize};
use units::AirRole;

/// How far (in hexes) from a strike target a CAP patrol can reach to
/// intercept.
pub const CAP_PATROL_RADIUS: i32 = 12;

/// A strike keeps tracking a moved target while it stays within this many
/// hexes of the originally designated hex.
pub const STRIKE_FOLLOW_DISTANCE: i32 = 3;

/// The four mission kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    Strike,
    Escort,
    Transport,
    AirCover,
}

impl MissionKind {
    /// Deterministic resolution order. Escorts and CAP are still
    /// first-class in-flight missions when strikes resolve, which is what
    /// makes layered interception work.
    pub const RESOLUTION_ORDER: [MissionKind; 4] = [
        MissionKind::Strike,
        MissionKind::Escort,
        MissionKind::Transport,
        MissionKind::AirCover,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MissionKind::Strike => "strike",
            MissionKind::Escort => "escort",
            MissionKind::Transport => "transport",
            MissionKind::AirCover => "air_cover",
        }
    }

    pub fn parse(value: &str) -> Result<MissionKind, String> {
        match value {
            "strike" => Ok(MissionKind::Strike),
            "escort" => Ok(MissionKind::Escort),
            "transport" => Ok(MissionKind::Transport),
            "air_cover" => Ok(MissionKind::AirCover),
            other => Err(format!("unknown mission kind '{}'", other)),
        }
    }
}

/// Static description of one mission kind's scheduling contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionTemplate {
    pub kind: MissionKind,
    /// Roles an airframe must cover to fly this mission.
    pub allowed_roles: Vec<AirRole>,
    pub requires_target: bool,
    pub requires_friendly_escort_target: bool,
    /// Turns between launch and resolution.
    pub duration_turns: u32,
}

impl MissionTemplate {
    /// Whether an airframe with the given roles can fly this mission.
    pub fn roles_intersect(&self, roles: &[AirRole]) -> bool {
        self.allowed_roles.iter().any(|role| roles.contains(role))
    }
}

/// The standard template catalog.
pub fn standard_templates() -> Vec<MissionTemplate> {
    vec![
        MissionTemplate {
            kind: MissionKind::Strike,
            allowed_roles: vec![AirRole::Strike],
            requires_target: true,
            requires_friendly_escort_target: false,
            duration_turns: 1,
        },
        MissionTemplate {
            kind: MissionKind::Escort,
            allowed_roles: vec![AirRole::Escort],
            requires_target: false,
            requires_friendly_escort_target: true,
            duration_turns: 1,
        },
        MissionTemplate {
            kind: MissionKind::Transport,
            allowed_roles: vec![AirRole::Transport],
            requires_target: true,
            requires_friendly_escort_target: false,
            duration_turns: 1,
        },
        MissionTemplate {
            kind: MissionKind::AirCover,
            allowed_roles: vec![AirRole::Cap],
            requires_target: true,
            requires_friendly_escort_target: false,
            duration_turns: 2,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order_is_fixed() {
        assert_eq!(
            MissionKind::RESOLUTION_ORDER,
            [
                MissionKind::Strike,
                MissionKind::Escort,
                MissionKind::Transport,
                MissionKind::AirCover,
            ]
        );
    }

    #[test]
    fn test_kind_string_round_trip() {
        for kind in MissionKind::RESOLUTION_ORDER {
            assert_eq!(MissionKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(MissionKind::parse("bombardment").is_err());
    }

    #[test]
    fn test_standard_templates_cover_all_kinds() {
        let templates = standard_templates();
        for kind in MissionKind::RESOLUTION_ORDER {
            let template = templates.iter().find(|t| t.kind == kind).unwrap();
            assert!(template.duration_turns >= 1);
        }
        let escort = templates
            .iter()
            .find(|t| t.kind == MissionKind::Escort)
            .unwrap();
        assert!(escort.requires_friendly_escort_target);
        assert!(!escort.requires_target);
    }

    #[test]
    fn test_roles_intersect() {
        let strike = standard_templates()
            .into_iter()
            .find(|t| t.kind == MissionKind::Strike)
            .unwrap();
        assert!(strike.roles_intersect(&[AirRole::Strike, AirRole::Cap]));
        assert!(!strike.roles_intersect(&[AirRole::Transport]));
        assert!(!strike.roles_intersect(&[]));
    }
}
