//! # Supply Crate
//!
//! The `supply` crate keeps the per-faction logistics ledger for Hexfront:
//! depot inventories with current/baseline/bonus stocks, pending shipments
//! ordered by ETA, production rates, a bounded rolling entry log, and the
//! per-unit supply mirror the upkeep pass walks.
//!
//! ## Turn-Start Order
//!
//! For the active faction, each supply tick runs in a fixed order:
//!
//! 1. Deliver pending shipments whose ETA has arrived
//! 2. Credit production for the turns elapsed since the last update
//! 3. Draw per-unit upkeep (depot first, onboard stores second) for
//!    connected units; apply the out-of-supply attrition profile to
//!    disconnected ones
//!
//! Connectivity comes from [`network::connected_hexes`], a breadth-first
//! search from the faction's supply sources that explores road tiles first.

pub mod network;
pub mod state;
pub mod upkeep;

pub use network::connected_hexes;
pub use state::{
    Inventory, LedgerEntry, LedgerEvent, MirrorEntry, ProductionRates, Resource, Shipment, Stock,
    SupplyState, LEDGER_LIMIT,
};
pub use upkeep::{out_of_supply_attrition, round2, upkeep_for_class, AttritionProfile, UpkeepProfile};
