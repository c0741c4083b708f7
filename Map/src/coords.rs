//! Axial hex coordinates and the geometry helpers built on them.
//!
//! All internal battlefield positions are axial `(q, r)` pairs on a flat-top
//! grid. Offset `(col, row)` coordinates exist only for external boundaries
//! (scenario files, UI) and are converted at the edge.

use serde::{Deserialize, Serialize};

/// The six neighbor directions of a flat-top hex, in facing order
/// N, NE, SE, S, SW, NW. Index positions match `units::Facing`.
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Axial hex coordinate.
///
/// The canonical string form is `"q,r"` (signed integers, no spaces), used
/// wherever a position crosses a serialization boundary.
///
/// # Examples
///
/// ```
/// use hexmap::HexCoord;
///
/// let a = HexCoord::new(0, 0);
/// let b = HexCoord::new(2, -1);
/// assert_eq!(a.distance(b), 2);
/// assert_eq!(b.key(), "2,-1");
/// assert_eq!(HexCoord::parse_key("2,-1").unwrap(), b);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    /// Create a new axial coordinate.
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Render the canonical `"q,r"` key for this coordinate.
    pub fn key(self) -> String {
        format!("{},{}", self.q, self.r)
    }

    /// Parse a canonical `"q,r"` key.
    ///
    /// Accepts exactly two comma-separated signed integers and rejects any
    /// other shape (whitespace, missing parts, trailing fields).
    pub fn parse_key(key: &str) -> Result<Self, String> {
        let mut parts = key.split(',');
        let q = parts
            .next()
            .ok_or_else(|| format!("malformed hex key '{}'", key))?;
        let r = parts
            .next()
            .ok_or_else(|| format!("malformed hex key '{}'", key))?;
        if parts.next().is_some() {
            return Err(format!("malformed hex key '{}'", key));
        }
        let q = q
            .parse::<i32>()
            .map_err(|_| format!("malformed hex key '{}'", key))?;
        let r = r
            .parse::<i32>()
            .map_err(|_| format!("malformed hex key '{}'", key))?;
        Ok(Self::new(q, r))
    }

    /// Convert to offset coordinates (odd-q vertical layout).
    pub fn to_offset(self) -> (i32, i32) {
        let col = self.q;
        let row = self.r + (self.q - (self.q & 1)) / 2;
        (col, row)
    }

    /// Convert from offset coordinates (odd-q vertical layout).
    pub fn from_offset(col: i32, row: i32) -> Self {
        let q = col;
        let r = row - (col - (col & 1)) / 2;
        Self::new(q, r)
    }

    /// The six neighboring hexes in facing order (N, NE, SE, S, SW, NW).
    pub fn neighbors(self) -> [HexCoord; 6] {
        let mut out = [self; 6];
        for (i, (dq, dr)) in DIRECTIONS.iter().enumerate() {
            out[i] = HexCoord::new(self.q + dq, self.r + dr);
        }
        out
    }

    /// The neighbor in the given direction sector (0..6).
    pub fn neighbor(self, sector: usize) -> HexCoord {
        let (dq, dr) = DIRECTIONS[sector % 6];
        HexCoord::new(self.q + dq, self.r + dr)
    }

    /// Hex distance between two coordinates.
    pub fn distance(self, other: Self) -> i32 {
        ((self.q - other.q).abs()
            + (self.q + self.r - other.q - other.r).abs()
            + (self.r - other.r).abs())
            / 2
    }

    /// Check whether this coordinate lies within `radius` of `center`.
    pub fn is_within_radius(self, center: Self, radius: i32) -> bool {
        self.distance(center) <= radius
    }

    /// Enumerate the ring of hexes at exactly `radius` from this coordinate.
    ///
    /// Returns `[self]` for radius 0. The enumeration order is fixed:
    /// starting south-west of the center and walking the six sides in
    /// direction order.
    pub fn ring(self, radius: i32) -> Vec<HexCoord> {
        if radius <= 0 {
            return vec![self];
        }
        let mut out = Vec::with_capacity((radius * 6) as usize);
        // Start at the SW corner of the ring, then walk each side.
        let (dq, dr) = DIRECTIONS[4];
        let mut cursor = HexCoord::new(self.q + dq * radius, self.r + dr * radius);
        for sector in 0..6 {
            for _ in 0..radius {
                out.push(cursor);
                cursor = cursor.neighbor(sector);
            }
        }
        out
    }

    /// Enumerate every hex within `radius` of this coordinate, center first,
    /// rings in increasing radius.
    pub fn within_radius(self, radius: i32) -> Vec<HexCoord> {
        let mut out = vec![self];
        for r in 1..=radius {
            out.extend(self.ring(r));
        }
        out
    }

    /// The direction sector (0..6, facing order) that best matches the
    /// vector from this hex toward `other`.
    ///
    /// Uses integer cube-space dot products; ties resolve to the lowest
    /// sector so the result is deterministic. Returns 0 when the hexes are
    /// equal.
    pub fn bearing_sector(self, other: Self) -> usize {
        let dq = other.q - self.q;
        let dr = other.r - self.r;
        let ds = -dq - dr;
        let mut best = 0usize;
        let mut best_dot = i64::MIN;
        for (i, (vq, vr)) in DIRECTIONS.iter().enumerate() {
            let vs = -vq - vr;
            let dot =
                i64::from(dq) * i64::from(*vq) + i64::from(dr) * i64::from(*vr)
                    + i64::from(ds) * i64::from(vs);
            if dot > best_dot {
                best_dot = dot;
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for coord in [
            HexCoord::new(0, 0),
            HexCoord::new(3, -7),
            HexCoord::new(-12, 5),
        ] {
            assert_eq!(HexCoord::parse_key(&coord.key()).unwrap(), coord);
        }
    }

    #[test]
    fn test_parse_key_rejects_malformed_shapes() {
        for bad in ["", "1", "1,2,3", "1, 2", "a,b", "1.5,2", " 1,2"] {
            assert!(HexCoord::parse_key(bad).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_neighbors_are_distance_one() {
        let origin = HexCoord::new(2, -3);
        for n in origin.neighbors() {
            assert_eq!(origin.distance(n), 1);
        }
    }

    #[test]
    fn test_offset_round_trip() {
        for q in -4..=4 {
            for r in -4..=4 {
                let coord = HexCoord::new(q, r);
                let (col, row) = coord.to_offset();
                assert_eq!(HexCoord::from_offset(col, row), coord);
            }
        }
    }

    #[test]
    fn test_ring_sizes() {
        let center = HexCoord::new(0, 0);
        assert_eq!(center.ring(0), vec![center]);
        assert_eq!(center.ring(1).len(), 6);
        assert_eq!(center.ring(3).len(), 18);
        for hex in center.ring(3) {
            assert_eq!(center.distance(hex), 3);
        }
    }

    #[test]
    fn test_within_radius_counts() {
        let center = HexCoord::new(1, 1);
        // 1 + 6 + 12 = 19 hexes within radius 2.
        assert_eq!(center.within_radius(2).len(), 19);
    }

    #[test]
    fn test_bearing_sector_matches_direction() {
        let origin = HexCoord::new(0, 0);
        for (i, (dq, dr)) in DIRECTIONS.iter().enumerate() {
            let target = HexCoord::new(dq * 3, dr * 3);
            assert_eq!(origin.bearing_sector(target), i);
        }
    }
}
