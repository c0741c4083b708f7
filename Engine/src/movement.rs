//! Movement budgets, reachability, and `move_unit`.

use crate::engine::BattleEngine;
use crate::error::EngineError;
use crate::reports::{MoveResolution, MovementBudget};
use hexmap::{HexCoord, MoveType, IMPASSABLE_COST};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use units::{Facing, Faction, UnitClass};

impl BattleEngine {
    /// The movement budget of the unit at `origin`, if the active faction
    /// has one there.
    ///
    /// Base budget is `max(1, ceil(movement x commander move scalar))`
    /// plus the rush bonus for infantry. After an attack the budget halves
    /// for everything except artillery, whose budget drops to zero.
    pub fn get_movement_budget(&self, origin: HexCoord) -> Option<MovementBudget> {
        let unit = self.units(self.active_faction).get(&origin)?;
        let stats = self.stats(&unit.type_key).ok()?;
        let flags = self.turn_flags_for(&unit.unit_id);

        let scalar = if self.active_faction == Faction::Player {
            self.config.commander.move_scalar
        } else {
            1.0
        };
        let mut base = ((f64::from(stats.movement) * scalar).ceil() as u32).max(1);
        if flags.is_rushing && stats.class == UnitClass::Infantry {
            base += 1;
        }
        let effective = if flags.attacks_used > 0 {
            if stats.class == UnitClass::Artillery {
                0
            } else {
                base / 2
            }
        } else {
            base
        };
        let used = flags.movement_points_used;
        Some(MovementBudget {
            base,
            effective,
            used,
            remaining: effective.saturating_sub(used),
        })
    }

    /// Cheapest path costs from `origin` within the remaining budget.
    ///
    /// Ground units may not route through occupied hexes; air units overfly
    /// anything but cannot end on an occupied hex. The result never
    /// contains the origin itself or any occupied destination.
    pub(crate) fn reachable_costs(&self, origin: HexCoord) -> HashMap<HexCoord, u32> {
        let Some(unit) = self.units(self.active_faction).get(&origin) else {
            return HashMap::new();
        };
        let Ok(stats) = self.stats(&unit.type_key) else {
            return HashMap::new();
        };
        let Some(budget) = self.get_movement_budget(origin) else {
            return HashMap::new();
        };
        let remaining = budget.remaining;
        if remaining == 0 {
            return HashMap::new();
        }
        let airborne = stats.move_type == MoveType::Air;

        let mut dist: HashMap<HexCoord, u32> = HashMap::new();
        let mut heap: BinaryHeap<(Reverse<u32>, (i32, i32))> = BinaryHeap::new();
        dist.insert(origin, 0);
        heap.push((Reverse(0), (origin.q, origin.r)));

        while let Some((Reverse(cost), (q, r))) = heap.pop() {
            let coord = HexCoord::new(q, r);
            if let Some(&best) = dist.get(&coord) {
                if cost > best {
                    continue;
                }
            }
            for neighbor in coord.neighbors() {
                let Some(kind) = self.config.map.kind_at(neighbor) else {
                    continue;
                };
                let step_cost = self.config.terrain.move_cost(kind, stats.move_type);
                if step_cost >= IMPASSABLE_COST {
                    continue;
                }
                // Ground movement cannot pass through occupied hexes.
                if !airborne && self.is_occupied(neighbor) {
                    continue;
                }
                let next_cost = cost + step_cost;
                if next_cost > remaining {
                    continue;
                }
                let improved = dist.get(&neighbor).map(|&c| next_cost < c).unwrap_or(true);
                if improved {
                    dist.insert(neighbor, next_cost);
                    heap.push((Reverse(next_cost), (neighbor.q, neighbor.r)));
                }
            }
        }

        dist.remove(&origin);
        // Air units traverse occupied hexes but cannot land on them.
        if airborne {
            let occupied: Vec<HexCoord> = dist
                .keys()
                .copied()
                .filter(|hex| self.is_occupied(*hex))
                .collect();
            for hex in occupied {
                dist.remove(&hex);
            }
        }
        dist
    }

    /// All destinations reachable this turn, sorted by `(q, r)`.
    pub fn get_reachable_hexes(&self, origin: HexCoord) -> Vec<HexCoord> {
        let mut hexes: Vec<HexCoord> = self.reachable_costs(origin).keys().copied().collect();
        hexes.sort();
        hexes
    }

    /// Move the active faction's unit from one hex to another.
    pub fn move_unit(
        &mut self,
        from: HexCoord,
        to: HexCoord,
    ) -> Result<MoveResolution, EngineError> {
        self.phase_guard("move_unit", &[crate::BattlePhase::PlayerTurn, crate::BattlePhase::BotTurn])?;
        let active = self.active_faction;
        let Some(unit) = self.units(active).get(&from) else {
            // A unit belonging to the other side is "not your turn"; an
            // empty hex is simply bad input.
            return if self.unit_at(from).is_some() {
                Err(EngineError::NotYourTurn)
            } else {
                Err(EngineError::Input(format!("no unit at {}", from.key())))
            };
        };
        let unit_id = unit.unit_id.clone();
        let stats = self.stats(&unit.type_key)?;

        if !self.config.map.in_bounds(to) {
            return Err(EngineError::OutOfBounds);
        }
        if self.is_occupied(to) {
            return Err(EngineError::Occupied);
        }
        let flags = self.turn_flags_for(&unit_id);
        if flags.attacks_used > 0 && stats.class == UnitClass::Artillery {
            return Err(EngineError::PostAttackRestriction);
        }

        let costs = self.reachable_costs(from);
        let Some(&cost) = costs.get(&to) else {
            return Err(EngineError::NotReachable);
        };

        // Validation done; apply the move.
        let Some(mut unit) = self.units_mut(active).remove(&from) else {
            return Err(EngineError::Input(format!("no unit at {}", from.key())));
        };
        unit.hex = to;
        unit.entrench = 0;
        unit.facing = Facing::from_sector(from.bearing_sector(to));
        self.units_mut(active).insert(to, unit);

        let flags = self.flags_mut(&unit_id);
        flags.movement_points_used += cost;
        self.mark_dirty();

        let remaining = self
            .get_movement_budget(to)
            .map(|b| b.remaining)
            .unwrap_or(0);
        log::debug!(
            "{} moved {} -> {} (cost {}, {} left)",
            unit_id,
            from.key(),
            to.key(),
            cost,
            remaining
        );
        Ok(MoveResolution {
            from,
            to,
            cost,
            remaining_budget: remaining,
        })
    }
}
