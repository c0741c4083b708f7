//! # Units Crate
//!
//! The `units` crate defines the force structure of Hexfront: factions,
//! unit classes and movement types, the read-only unit-type catalog with
//! air-support profiles, on-map unit instances with stable identifiers,
//! reserve bookkeeping, and commander bonus profiles.
//!
//! ## Features
//!
//! - **Factions**: Player and Bot sides with turn ownership semantics
//! - **Unit Catalog**: Stat dictionary keyed by type name, queried by class,
//!   move type, ranges, and air-support profile
//! - **Unit Instances**: Stable `u_`-prefixed ids, strength, ammo, fuel,
//!   entrenchment, and facing
//! - **Commander Profiles**: Independent move/supply/accuracy/damage scalars
//!
//! The catalog is shared read-only; all mutable unit state lives in the
//! engine's placements.

pub mod commander;
pub mod faction;
pub mod unit;
pub mod unit_class;
pub mod unit_type;

pub use commander::CommanderProfile;
pub use faction::Faction;
pub use unit::{is_stable_unit_key, new_unit_id, ReserveEntry, Unit};
pub use unit_class::{Facing, UnitClass};
pub use unit_type::{AirRole, AirSupportProfile, UnitTypeCatalog, UnitTypeStats, STANDARD_CATALOG};
