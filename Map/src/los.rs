//! Line-of-sight queries against the terrain catalog.
//!
//! Sight lines are traced with cube-space interpolation between hex
//! centers. A tiny epsilon nudge keeps ties off hex edges so the traced
//! line is deterministic for every pair of coordinates.

use crate::coords::HexCoord;
use crate::terrain::{BattleMap, TerrainCatalog};

/// Trace the hex line from `a` to `b`, inclusive of both endpoints.
pub fn hex_line(a: HexCoord, b: HexCoord) -> Vec<HexCoord> {
    let n = a.distance(b);
    if n == 0 {
        return vec![a];
    }
    let mut out = Vec::with_capacity((n + 1) as usize);
    let ax = a.q as f64;
    let az = a.r as f64;
    let ay = -ax - az;
    let bx = b.q as f64;
    let bz = b.r as f64;
    let by = -bx - bz;
    for i in 0..=n {
        let t = i as f64 / n as f64;
        // Epsilon nudge breaks exact edge ties the same way every time.
        let x = ax + (bx - ax) * t + 1e-6;
        let y = ay + (by - ay) * t + 2e-6;
        let z = az + (bz - az) * t - 3e-6;
        out.push(cube_round(x, y, z));
    }
    out
}

/// Round fractional cube coordinates to the nearest hex.
fn cube_round(x: f64, y: f64, z: f64) -> HexCoord {
    let mut rx = x.round();
    let mut ry = y.round();
    let mut rz = z.round();

    let x_diff = (rx - x).abs();
    let y_diff = (ry - y).abs();
    let z_diff = (rz - z).abs();

    if x_diff > y_diff && x_diff > z_diff {
        rx = -ry - rz;
    } else if y_diff > z_diff {
        ry = -rx - rz;
    } else {
        rz = -rx - ry;
    }
    let _ = ry;

    HexCoord::new(rx as i32, rz as i32)
}

/// Whether `from` has a clear line of sight to `to`.
///
/// Interior hexes whose terrain is flagged `blocks_los` interrupt the
/// line; the endpoints themselves never block. In advanced mode an
/// airborne attacker sees over every blocker; in the basic mode the
/// blocker rule applies to all attackers alike.
pub fn line_of_sight(
    map: &BattleMap,
    catalog: &TerrainCatalog,
    from: HexCoord,
    to: HexCoord,
    attacker_airborne: bool,
    advanced: bool,
) -> bool {
    if advanced && attacker_airborne {
        return true;
    }
    let line = hex_line(from, to);
    for step in line.iter().skip(1).take(line.len().saturating_sub(2)) {
        if let Some(kind) = map.kind_at(*step) {
            if catalog.blocks_los(kind) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainKind;

    #[test]
    fn test_line_endpoints_and_length() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(3, -1);
        let line = hex_line(a, b);
        assert_eq!(line.first().copied(), Some(a));
        assert_eq!(line.last().copied(), Some(b));
        assert_eq!(line.len() as i32, a.distance(b) + 1);
    }

    #[test]
    fn test_forest_blocks_sight() {
        let mut map = BattleMap::open(4, TerrainKind::Plains);
        let catalog = TerrainCatalog::standard();
        let from = HexCoord::new(-2, 0);
        let to = HexCoord::new(2, 0);
        assert!(line_of_sight(&map, &catalog, from, to, false, true));

        map.set_kind(HexCoord::new(0, 0), TerrainKind::Forest);
        assert!(!line_of_sight(&map, &catalog, from, to, false, true));
    }

    #[test]
    fn test_air_sees_over_blockers_in_advanced_mode() {
        let mut map = BattleMap::open(4, TerrainKind::Plains);
        map.set_kind(HexCoord::new(0, 0), TerrainKind::Mountains);
        let catalog = TerrainCatalog::standard();
        let from = HexCoord::new(-2, 0);
        let to = HexCoord::new(2, 0);
        assert!(line_of_sight(&map, &catalog, from, to, true, true));
        assert!(!line_of_sight(&map, &catalog, from, to, true, false));
    }

    #[test]
    fn test_endpoints_never_block() {
        let mut map = BattleMap::open(3, TerrainKind::Plains);
        map.set_kind(HexCoord::new(0, 0), TerrainKind::Forest);
        map.set_kind(HexCoord::new(1, 0), TerrainKind::Forest);
        let catalog = TerrainCatalog::standard();
        // Adjacent hexes: no interior hexes to block.
        assert!(line_of_sight(
            &map,
            &catalog,
            HexCoord::new(0, 0),
            HexCoord::new(1, 0),
            false,
            true
        ));
    }
}
