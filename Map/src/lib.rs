//! # Hexmap Crate
//!
//! The `hexmap` crate provides the hexagonal battlefield foundation for
//! Hexfront: axial coordinates, offset conversion for external boundaries,
//! terrain kinds with per-move-type cost tables, and line-of-sight queries.
//!
//! ## Features
//!
//! - **Axial Coordinates**: Integer `(q, r)` pairs with `"q,r"` key format
//! - **Geometry**: Neighbors, distance, rings, bearing sectors
//! - **Terrain Catalog**: Movement costs, defense values, LOS blockers, roads
//! - **Line of Sight**: Hex-line tracing with an advanced mode for air units
//!
//! All geometry is pure and deterministic; the crate owns no mutable game
//! state.

pub mod coords;
pub mod los;
pub mod terrain;

pub use coords::HexCoord;
pub use los::{hex_line, line_of_sight};
pub use terrain::{BattleMap, MoveType, TerrainCatalog, TerrainKind, TerrainProfile, IMPASSABLE_COST};
