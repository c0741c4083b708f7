//! Terrain kinds, movement cost tables, and the bounded battle map.
//!
//! The terrain catalog is a read-only table queried by the engine for
//! movement costs (per move type), defensive cover, LOS blocking, and road
//! status. Movement costs at or above [`IMPASSABLE_COST`] mean the tile
//! cannot be entered by that move type at all.

use crate::coords::HexCoord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Any movement cost at or above this value is impassable.
pub const IMPASSABLE_COST: u32 = 999;

/// How a unit moves across terrain. Air movement ignores the terrain cost
/// table entirely and pays a flat 1 per hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveType {
    Leg,
    Wheel,
    Track,
    Air,
}

/// Terrain classification for a battlefield hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    Plains,
    Road,
    Forest,
    Hills,
    Mountains,
    Urban,
    River,
    Swamp,
}

impl TerrainKind {
    /// All terrain kinds, in catalog order.
    pub fn all() -> &'static [TerrainKind] {
        &[
            TerrainKind::Plains,
            TerrainKind::Road,
            TerrainKind::Forest,
            TerrainKind::Hills,
            TerrainKind::Mountains,
            TerrainKind::Urban,
            TerrainKind::River,
            TerrainKind::Swamp,
        ]
    }
}

/// Static properties of one terrain kind.
#[derive(Clone, Debug, Serialize)]
pub struct TerrainProfile {
    pub name: &'static str,
    /// Defensive cover granted to an occupant, as a percentage (0-100).
    pub defense: u8,
    /// Whether the tile blocks line of sight through it.
    pub blocks_los: bool,
    /// Road tiles are preferred by the supply network search.
    pub is_road: bool,
    /// Entry costs for Leg / Wheel / Track movement, in that order.
    costs: [u32; 3],
}

impl TerrainProfile {
    /// Movement cost for entering this terrain with the given move type.
    pub fn move_cost(&self, move_type: MoveType) -> u32 {
        match move_type {
            MoveType::Leg => self.costs[0],
            MoveType::Wheel => self.costs[1],
            MoveType::Track => self.costs[2],
            MoveType::Air => 1,
        }
    }

    /// Whether any ground move type can enter this terrain.
    pub fn ground_passable(&self) -> bool {
        self.costs.iter().any(|&c| c < IMPASSABLE_COST)
    }

    /// Whether supply convoys (wheeled or tracked) can cross this terrain.
    pub fn supply_passable(&self) -> bool {
        self.move_cost(MoveType::Wheel) < IMPASSABLE_COST
            || self.move_cost(MoveType::Track) < IMPASSABLE_COST
    }
}

/// Read-only catalog of terrain profiles.
///
/// # Examples
///
/// ```
/// use hexmap::{MoveType, TerrainCatalog, TerrainKind};
///
/// let catalog = TerrainCatalog::standard();
/// assert_eq!(catalog.move_cost(TerrainKind::Road, MoveType::Wheel), 1);
/// assert!(catalog.move_cost(TerrainKind::Mountains, MoveType::Wheel) >= 999);
/// ```
#[derive(Clone, Debug)]
pub struct TerrainCatalog {
    profiles: HashMap<TerrainKind, TerrainProfile>,
}

impl TerrainCatalog {
    /// Build the standard terrain table.
    pub fn standard() -> Self {
        let mut profiles = HashMap::new();
        let mut add = |kind: TerrainKind, profile: TerrainProfile| {
            profiles.insert(kind, profile);
        };
        add(
            TerrainKind::Plains,
            TerrainProfile {
                name: "Plains",
                defense: 0,
                blocks_los: false,
                is_road: false,
                costs: [1, 2, 1],
            },
        );
        add(
            TerrainKind::Road,
            TerrainProfile {
                name: "Road",
                defense: 0,
                blocks_los: false,
                is_road: true,
                costs: [1, 1, 1],
            },
        );
        add(
            TerrainKind::Forest,
            TerrainProfile {
                name: "Forest",
                defense: 20,
                blocks_los: true,
                is_road: false,
                costs: [2, 3, 2],
            },
        );
        add(
            TerrainKind::Hills,
            TerrainProfile {
                name: "Hills",
                defense: 15,
                blocks_los: false,
                is_road: false,
                costs: [2, 2, 2],
            },
        );
        add(
            TerrainKind::Mountains,
            TerrainProfile {
                name: "Mountains",
                defense: 30,
                blocks_los: true,
                is_road: false,
                costs: [3, IMPASSABLE_COST, IMPASSABLE_COST],
            },
        );
        add(
            TerrainKind::Urban,
            TerrainProfile {
                name: "Urban",
                defense: 25,
                blocks_los: true,
                is_road: false,
                costs: [1, 1, 2],
            },
        );
        add(
            TerrainKind::River,
            TerrainProfile {
                name: "River",
                defense: 0,
                blocks_los: false,
                is_road: false,
                costs: [2, IMPASSABLE_COST, IMPASSABLE_COST],
            },
        );
        add(
            TerrainKind::Swamp,
            TerrainProfile {
                name: "Swamp",
                defense: 5,
                blocks_los: false,
                is_road: false,
                costs: [2, IMPASSABLE_COST, 3],
            },
        );
        Self { profiles }
    }

    /// Profile for a terrain kind.
    pub fn profile(&self, kind: TerrainKind) -> &TerrainProfile {
        // The standard catalog covers every kind; a missing entry would be a
        // construction bug, so fall back to Plains-equivalent defaults.
        self.profiles
            .get(&kind)
            .unwrap_or_else(|| &self.profiles[&TerrainKind::Plains])
    }

    /// Movement cost for entering `kind` with `move_type`.
    pub fn move_cost(&self, kind: TerrainKind, move_type: MoveType) -> u32 {
        self.profile(kind).move_cost(move_type)
    }

    /// Defensive cover percentage for `kind`.
    pub fn defense(&self, kind: TerrainKind) -> u8 {
        self.profile(kind).defense
    }

    /// Whether `kind` blocks line of sight.
    pub fn blocks_los(&self, kind: TerrainKind) -> bool {
        self.profile(kind).blocks_los
    }

    /// Whether `kind` counts as a road for the supply network.
    pub fn is_road(&self, kind: TerrainKind) -> bool {
        self.profile(kind).is_road
    }
}

impl Default for TerrainCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// The bounded battlefield: a fixed set of hexes with a terrain kind each.
///
/// Bounds are defined by tile existence; a coordinate with no tile is out
/// of bounds for every purpose.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BattleMap {
    tiles: HashMap<HexCoord, TerrainKind>,
}

impl BattleMap {
    /// Build an open map: a hex disc of the given radius around the origin,
    /// every tile set to `kind`.
    pub fn open(radius: i32, kind: TerrainKind) -> Self {
        let origin = HexCoord::new(0, 0);
        let mut tiles = HashMap::new();
        for q in -radius..=radius {
            for r in -radius..=radius {
                let coord = HexCoord::new(q, r);
                if coord.distance(origin) <= radius {
                    tiles.insert(coord, kind);
                }
            }
        }
        Self { tiles }
    }

    /// Build a map from explicit tiles.
    pub fn from_tiles(tiles: HashMap<HexCoord, TerrainKind>) -> Self {
        Self { tiles }
    }

    /// Whether the coordinate is on the map.
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Terrain kind at a coordinate, if in bounds.
    pub fn kind_at(&self, coord: HexCoord) -> Option<TerrainKind> {
        self.tiles.get(&coord).copied()
    }

    /// Overwrite the terrain of an existing tile. Returns `false` when the
    /// coordinate is out of bounds.
    pub fn set_kind(&mut self, coord: HexCoord, kind: TerrainKind) -> bool {
        match self.tiles.get_mut(&coord) {
            Some(slot) => {
                *slot = kind;
                true
            }
            None => false,
        }
    }

    /// Number of tiles on the map.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the map has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All map hexes in sorted `(q, r)` order. Iteration through this
    /// accessor keeps behavior independent of hash order.
    pub fn sorted_hexes(&self) -> Vec<HexCoord> {
        let mut hexes: Vec<HexCoord> = self.tiles.keys().copied().collect();
        hexes.sort();
        hexes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_cost_is_flat() {
        let catalog = TerrainCatalog::standard();
        for &kind in TerrainKind::all() {
            assert_eq!(catalog.move_cost(kind, MoveType::Air), 1);
        }
    }

    #[test]
    fn test_mountains_block_vehicles() {
        let catalog = TerrainCatalog::standard();
        assert!(catalog.move_cost(TerrainKind::Mountains, MoveType::Wheel) >= IMPASSABLE_COST);
        assert!(catalog.move_cost(TerrainKind::Mountains, MoveType::Track) >= IMPASSABLE_COST);
        assert!(catalog.move_cost(TerrainKind::Mountains, MoveType::Leg) < IMPASSABLE_COST);
    }

    #[test]
    fn test_open_map_disc() {
        let map = BattleMap::open(2, TerrainKind::Plains);
        assert_eq!(map.len(), 19);
        assert!(map.in_bounds(HexCoord::new(0, -2)));
        assert!(!map.in_bounds(HexCoord::new(3, 0)));
    }

    #[test]
    fn test_set_kind_requires_bounds() {
        let mut map = BattleMap::open(1, TerrainKind::Plains);
        assert!(map.set_kind(HexCoord::new(0, 1), TerrainKind::Forest));
        assert_eq!(map.kind_at(HexCoord::new(0, 1)), Some(TerrainKind::Forest));
        assert!(!map.set_kind(HexCoord::new(9, 9), TerrainKind::Forest));
    }
}
