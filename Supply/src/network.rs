//! Supply network connectivity.
//!
//! A hex is in supply when it is reachable from any of the faction's
//! supply sources (HQ and base camp) across convoy-passable terrain
//! (anything a wheeled or tracked vehicle can cross). The search is a
//! breadth-first flood that explores road tiles before anything else,
//! mirroring how convoys actually route.

use hexmap::{BattleMap, HexCoord, TerrainCatalog};
use std::collections::{HashSet, VecDeque};

/// Every hex connected to at least one source.
///
/// Sources that are out of bounds are ignored. The returned set includes
/// the sources themselves.
pub fn connected_hexes(
    map: &BattleMap,
    catalog: &TerrainCatalog,
    sources: &[HexCoord],
) -> HashSet<HexCoord> {
    let mut seen: HashSet<HexCoord> = HashSet::new();
    let mut frontier: VecDeque<HexCoord> = VecDeque::new();

    for &source in sources {
        if map.in_bounds(source) && seen.insert(source) {
            frontier.push_back(source);
        }
    }

    while let Some(current) = frontier.pop_front() {
        for neighbor in current.neighbors() {
            if seen.contains(&neighbor) {
                continue;
            }
            let Some(kind) = map.kind_at(neighbor) else {
                continue;
            };
            let profile = catalog.profile(kind);
            if !profile.supply_passable() {
                continue;
            }
            seen.insert(neighbor);
            // Roads carry the network outward first.
            if profile.is_road {
                frontier.push_front(neighbor);
            } else {
                frontier.push_back(neighbor);
            }
        }
    }

    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmap::TerrainKind;

    #[test]
    fn test_flood_covers_open_map() {
        let map = BattleMap::open(3, TerrainKind::Plains);
        let catalog = TerrainCatalog::standard();
        let connected = connected_hexes(&map, &catalog, &[HexCoord::new(0, 0)]);
        assert_eq!(connected.len(), map.len());
    }

    #[test]
    fn test_mountain_wall_cuts_the_network() {
        let mut map = BattleMap::open(3, TerrainKind::Plains);
        let catalog = TerrainCatalog::standard();
        // Wall off the eastern half along q == 1.
        for hex in map.sorted_hexes() {
            if hex.q == 1 {
                map.set_kind(hex, TerrainKind::Mountains);
            }
        }
        let connected = connected_hexes(&map, &catalog, &[HexCoord::new(-3, 0)]);
        assert!(connected.contains(&HexCoord::new(0, 0)));
        assert!(!connected.contains(&HexCoord::new(2, 0)));
        assert!(!connected.contains(&HexCoord::new(1, 0)));
    }

    #[test]
    fn test_out_of_bounds_sources_are_ignored() {
        let map = BattleMap::open(2, TerrainKind::Plains);
        let catalog = TerrainCatalog::standard();
        let connected = connected_hexes(&map, &catalog, &[HexCoord::new(9, 9)]);
        assert!(connected.is_empty());
    }

    #[test]
    fn test_multiple_sources_union() {
        let mut map = BattleMap::open(3, TerrainKind::Plains);
        let catalog = TerrainCatalog::standard();
        for hex in map.sorted_hexes() {
            if hex.q == 0 {
                map.set_kind(hex, TerrainKind::Mountains);
            }
        }
        let west = HexCoord::new(-2, 0);
        let east = HexCoord::new(2, 0);
        let connected = connected_hexes(&map, &catalog, &[west, east]);
        assert!(connected.contains(&HexCoord::new(-1, 0)));
        assert!(connected.contains(&HexCoord::new(1, 0)));
        assert!(!connected.contains(&HexCoord::new(0, 0)));
    }
}
