//! Bot turn planning: views, oracles, and the heuristic planners.

use hexmap::{HexCoord, MoveType, IMPASSABLE_COST};
use std::collections::HashSet;
use units::{AirRole, UnitClass};

/// Read-only view of one unit, extracted from engine placements.
#[derive(Debug, Clone)]
pub struct BotUnitView {
    pub unit_id: String,
    pub type_key: String,
    pub class: UnitClass,
    pub move_type: MoveType,
    pub hex: HexCoord,
    pub strength: u32,
    pub range_min: u32,
    pub range_max: u32,
}

impl BotUnitView {
    pub fn is_air(&self) -> bool {
        self.class.is_air()
    }

    /// Whether `target` sits inside this unit's weapon envelope.
    pub fn in_range(&self, target: HexCoord) -> bool {
        let distance = self.hex.distance(target);
        distance >= self.range_min as i32 && distance <= self.range_max as i32
    }
}

/// Read-only view of a friendly squadron for air planning.
#[derive(Debug, Clone)]
pub struct SquadronView {
    pub unit_id: String,
    pub hex: HexCoord,
    pub roles: Vec<AirRole>,
    /// False when the squadron is already assigned or refitting.
    pub available: bool,
}

/// Terrain queries the planner needs, answered by the engine.
pub trait MapOracle {
    fn in_bounds(&self, hex: HexCoord) -> bool;
    fn move_cost(&self, move_type: MoveType, hex: HexCoord) -> u32;
}

/// Difficulty is a single scalar on bot attack damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub damage_bonus_pct: f64,
}

impl Difficulty {
    pub fn easy() -> Self {
        Self {
            damage_bonus_pct: -25.0,
        }
    }

    pub fn normal() -> Self {
        Self {
            damage_bonus_pct: 0.0,
        }
    }

    pub fn hard() -> Self {
        Self {
            damage_bonus_pct: 25.0,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::normal()
    }
}

/// One planned ground action.
#[derive(Debug, Clone, PartialEq)]
pub enum BotAction {
    Move {
        unit_id: String,
        from: HexCoord,
        to: HexCoord,
    },
    Attack {
        attacker_hex: HexCoord,
        defender_hex: HexCoord,
    },
}

/// One planned air-mission request, translated into a schedule call by the
/// engine.
#[derive(Debug, Clone, PartialEq)]
pub enum BotAirPlan {
    Strike { origin: HexCoord, target: HexCoord },
    Escort { origin: HexCoord, protect: HexCoord },
    Cap { origin: HexCoord, station: HexCoord },
}

/// The hostile closest to `unit`, ties broken by unit id.
pub fn nearest_hostile<'a>(
    unit: &BotUnitView,
    hostiles: &'a [BotUnitView],
) -> Option<&'a BotUnitView> {
    hostiles
        .iter()
        .min_by_key(|h| (unit.hex.distance(h.hex), h.unit_id.clone()))
}

/// One step along axial neighbors toward `target`.
///
/// Picks the passable, unoccupied, in-bounds neighbor that strictly
/// shortens the distance; among equals the lowest `(q, r)` wins. Returns
/// `None` when no neighbor improves the position.
pub fn step_toward(
    unit: &BotUnitView,
    target: HexCoord,
    oracle: &dyn MapOracle,
    occupied: &HashSet<HexCoord>,
) -> Option<HexCoord> {
    let current = unit.hex.distance(target);
    let mut candidates: Vec<HexCoord> = unit
        .hex
        .neighbors()
        .into_iter()
        .filter(|n| {
            oracle.in_bounds(*n)
                && oracle.move_cost(unit.move_type, *n) < IMPASSABLE_COST
                && !occupied.contains(n)
                && n.distance(target) < current
        })
        .collect();
    candidates.sort_by_key(|n| (n.distance(target), n.q, n.r));
    candidates.first().copied()
}

/// Plan the ground sweep: every bot ground unit closes on its nearest
/// hostile and attacks when in range.
///
/// Moves are reflected into the occupancy set as they are planned so later
/// units do not path into hexes claimed earlier in the same sweep.
pub fn plan_ground_actions(
    friendly: &[BotUnitView],
    hostiles: &[BotUnitView],
    oracle: &dyn MapOracle,
    occupied: &HashSet<HexCoord>,
) -> Vec<BotAction> {
    let mut actions = Vec::new();
    let mut occupied = occupied.clone();

    let mut ordered: Vec<&BotUnitView> = friendly.iter().filter(|u| !u.is_air()).collect();
    ordered.sort_by(|a, b| a.unit_id.cmp(&b.unit_id));

    for unit in ordered {
        let Some(enemy) = nearest_hostile(unit, hostiles) else {
            continue;
        };
        // Ground units leave aircraft to the flak and fighters.
        if enemy.is_air() {
            continue;
        }
        if unit.in_range(enemy.hex) {
            actions.push(BotAction::Attack {
                attacker_hex: unit.hex,
                defender_hex: enemy.hex,
            });
            continue;
        }
        if let Some(step) = step_toward(unit, enemy.hex, oracle, &occupied) {
            occupied.remove(&unit.hex);
            occupied.insert(step);
            actions.push(BotAction::Move {
                unit_id: unit.unit_id.clone(),
                from: unit.hex,
                to: step,
            });
            let moved = BotUnitView {
                hex: step,
                ..unit.clone()
            };
            if moved.in_range(enemy.hex) {
                actions.push(BotAction::Attack {
                    attacker_hex: step,
                    defender_hex: enemy.hex,
                });
            }
        }
    }

    actions
}

/// Plan the air tasking: strike, escort pairing, then CAP.
pub fn plan_air_missions(
    squadrons: &[SquadronView],
    hostiles: &[BotUnitView],
    queued_strike_origins: &[HexCoord],
    contested_objectives: &[HexCoord],
    home_station: HexCoord,
) -> Vec<BotAirPlan> {
    let mut plans = Vec::new();
    let mut used: HashSet<String> = HashSet::new();

    let mut ordered: Vec<&SquadronView> = squadrons.iter().filter(|s| s.available).collect();
    ordered.sort_by(|a, b| a.unit_id.cmp(&b.unit_id));

    // One strike against the nearest surface hostile.
    let mut strike_origin: Option<HexCoord> = None;
    if let Some(squadron) = ordered
        .iter()
        .find(|s| s.roles.contains(&AirRole::Strike) && !used.contains(&s.unit_id))
    {
        let mut surface: Vec<&BotUnitView> = hostiles.iter().filter(|h| !h.is_air()).collect();
        surface.sort_by_key(|h| (squadron.hex.distance(h.hex), h.unit_id.clone()));
        if let Some(target) = surface.first() {
            plans.push(BotAirPlan::Strike {
                origin: squadron.hex,
                target: target.hex,
            });
            strike_origin = Some(squadron.hex);
            used.insert(squadron.unit_id.clone());
        }
    }

    // Pair an escort with the earliest queued strike (or the one planned
    // just now).
    let protect = queued_strike_origins.first().copied().or(strike_origin);
    if let Some(protect) = protect {
        if let Some(squadron) = ordered
            .iter()
            .find(|s| s.roles.contains(&AirRole::Escort) && !used.contains(&s.unit_id))
        {
            plans.push(BotAirPlan::Escort {
                origin: squadron.hex,
                protect,
            });
            used.insert(squadron.unit_id.clone());
        }
    }

    // CAP over a contested objective, else a local patrol.
    if let Some(squadron) = ordered
        .iter()
        .find(|s| s.roles.contains(&AirRole::Cap) && !used.contains(&s.unit_id))
    {
        let station = contested_objectives.first().copied().unwrap_or(home_station);
        plans.push(BotAirPlan::Cap {
            origin: squadron.hex,
            station,
        });
        used.insert(squadron.unit_id.clone());
    }

    plans
}
