//! Per-faction supply state: inventory, shipments, production, ledger,
//! and the unit supply mirror.

use crate::upkeep::round2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use units::{Faction, UnitClass};

/// The ledger keeps at most this many entries; older entries trim first.
pub const LEDGER_LIMIT: usize = 50;

/// Depot resource categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Ammo,
    Fuel,
    Rations,
    Parts,
}

impl Resource {
    /// All resources in ledger order.
    pub fn all() -> &'static [Resource] {
        &[Resource::Ammo, Resource::Fuel, Resource::Rations, Resource::Parts]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Ammo => "ammo",
            Resource::Fuel => "fuel",
            Resource::Rations => "rations",
            Resource::Parts => "parts",
        }
    }
}

/// One depot stock: the live amount plus its baseline and any standing
/// bonus from scenario modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub current: f64,
    pub baseline: f64,
    pub bonus: f64,
}

impl Stock {
    pub fn new(baseline: f64) -> Self {
        Self {
            current: baseline,
            baseline,
            bonus: 0.0,
        }
    }
}

/// Depot inventory across the four resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub ammo: Stock,
    pub fuel: Stock,
    pub rations: Stock,
    pub parts: Stock,
}

impl Inventory {
    pub fn new(ammo: f64, fuel: f64, rations: f64, parts: f64) -> Self {
        Self {
            ammo: Stock::new(ammo),
            fuel: Stock::new(fuel),
            rations: Stock::new(rations),
            parts: Stock::new(parts),
        }
    }

    pub fn stock(&self, resource: Resource) -> &Stock {
        match resource {
            Resource::Ammo => &self.ammo,
            Resource::Fuel => &self.fuel,
            Resource::Rations => &self.rations,
            Resource::Parts => &self.parts,
        }
    }

    pub fn stock_mut(&mut self, resource: Resource) -> &mut Stock {
        match resource {
            Resource::Ammo => &mut self.ammo,
            Resource::Fuel => &mut self.fuel,
            Resource::Rations => &mut self.rations,
            Resource::Parts => &mut self.parts,
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(100.0, 100.0, 100.0, 50.0)
    }
}

/// A shipment en route to the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub resource: Resource,
    pub amount: f64,
    pub eta_turn: u32,
}

/// Per-turn production rates credited at the start of the faction's turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRates {
    pub ammo: f64,
    pub fuel: f64,
    pub rations: f64,
    pub parts: f64,
}

impl ProductionRates {
    pub fn rate(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Ammo => self.ammo,
            Resource::Fuel => self.fuel,
            Resource::Rations => self.rations,
            Resource::Parts => self.parts,
        }
    }
}

impl Default for ProductionRates {
    fn default() -> Self {
        Self {
            ammo: 4.0,
            fuel: 4.0,
            rations: 6.0,
            parts: 2.0,
        }
    }
}

/// What a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    ShipmentDelivered,
    Production,
    UpkeepDraw,
    OnboardDraw,
    Attrition,
}

/// One rolling-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub turn: u32,
    pub event: LedgerEvent,
    pub resource: Option<Resource>,
    pub amount: f64,
    pub note: String,
}

/// Supply mirror record for one fielded unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorEntry {
    pub type_key: String,
    pub class: UnitClass,
}

/// The complete supply state of one faction.
///
/// The engine owns one per faction; snapshots copy out of it. The unit
/// mirror is keyed by stable unit id in a `BTreeMap` so every upkeep walk
/// visits units in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyState {
    pub faction: Faction,
    pub inventory: Inventory,
    pending_shipments: Vec<Shipment>,
    pub production: ProductionRates,
    last_updated_turn: u32,
    ledger: VecDeque<LedgerEntry>,
    unit_mirror: BTreeMap<String, MirrorEntry>,
}

impl SupplyState {
    pub fn new(faction: Faction) -> Self {
        Self {
            faction,
            inventory: Inventory::default(),
            pending_shipments: Vec::new(),
            production: ProductionRates::default(),
            last_updated_turn: 1,
            ledger: VecDeque::new(),
            unit_mirror: BTreeMap::new(),
        }
    }

    /// Queue a shipment, keeping the pending list ETA-sorted.
    pub fn add_shipment(&mut self, shipment: Shipment) {
        let index = self
            .pending_shipments
            .partition_point(|s| s.eta_turn <= shipment.eta_turn);
        self.pending_shipments.insert(index, shipment);
    }

    /// Pending shipments, ETA order.
    pub fn pending_shipments(&self) -> &[Shipment] {
        &self.pending_shipments
    }

    /// Deliver every shipment due by `turn` into the inventory, logging
    /// each delivery. Returns the delivered shipments.
    pub fn deliver_due_shipments(&mut self, turn: u32) -> Vec<Shipment> {
        let due = self
            .pending_shipments
            .partition_point(|s| s.eta_turn <= turn);
        let delivered: Vec<Shipment> = self.pending_shipments.drain(..due).collect();
        for shipment in &delivered {
            self.inventory.stock_mut(shipment.resource).current += shipment.amount;
            let entry = LedgerEntry {
                turn,
                event: LedgerEvent::ShipmentDelivered,
                resource: Some(shipment.resource),
                amount: shipment.amount,
                note: format!(
                    "convoy delivered {} {}",
                    shipment.amount,
                    shipment.resource.as_str()
                ),
            };
            self.log(entry);
        }
        delivered
    }

    /// Credit production for the turns elapsed since the last update.
    /// Returns the credited `(resource, amount)` pairs.
    pub fn accrue_production(&mut self, turn: u32) -> Vec<(Resource, f64)> {
        let elapsed = turn.saturating_sub(self.last_updated_turn);
        self.last_updated_turn = turn;
        if elapsed == 0 {
            return Vec::new();
        }
        let mut credited = Vec::new();
        for &resource in Resource::all() {
            let amount = round2(self.production.rate(resource) * f64::from(elapsed));
            if amount <= 0.0 {
                continue;
            }
            self.inventory.stock_mut(resource).current += amount;
            credited.push((resource, amount));
            let entry = LedgerEntry {
                turn,
                event: LedgerEvent::Production,
                resource: Some(resource),
                amount,
                note: format!("production credited {} {}", amount, resource.as_str()),
            };
            self.log(entry);
        }
        credited
    }

    /// Draw up to `amount` of a resource from the depot. Returns how much
    /// was actually drawn.
    pub fn draw(&mut self, resource: Resource, amount: f64) -> f64 {
        let stock = self.inventory.stock_mut(resource);
        let drawn = stock.current.min(amount).max(0.0);
        stock.current = round2(stock.current - drawn);
        round2(drawn)
    }

    /// Append a ledger entry, trimming the oldest past [`LEDGER_LIMIT`].
    pub fn log(&mut self, entry: LedgerEntry) {
        log::debug!(
            "supply[{}] t{} {:?} {} {}",
            self.faction.as_str(),
            entry.turn,
            entry.event,
            entry.amount,
            entry.note
        );
        self.ledger.push_back(entry);
        while self.ledger.len() > LEDGER_LIMIT {
            self.ledger.pop_front();
        }
    }

    /// The rolling log, oldest first.
    pub fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.ledger.iter().cloned().collect()
    }

    /// Register (or refresh) a fielded unit in the supply mirror.
    pub fn mirror_insert(&mut self, unit_id: &str, type_key: &str, class: UnitClass) {
        self.unit_mirror.insert(
            unit_id.to_string(),
            MirrorEntry {
                type_key: type_key.to_string(),
                class,
            },
        );
    }

    /// Drop a unit from the supply mirror (unit destroyed or recalled).
    pub fn mirror_remove(&mut self, unit_id: &str) -> Option<MirrorEntry> {
        self.unit_mirror.remove(unit_id)
    }

    /// Clear the whole mirror (used before a hydration rebuild).
    pub fn clear_mirror(&mut self) {
        self.unit_mirror.clear();
    }

    /// The mirror, in stable unit-id order.
    pub fn mirror(&self) -> &BTreeMap<String, MirrorEntry> {
        &self.unit_mirror
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipments_stay_eta_sorted_and_deliver_in_order() {
        let mut state = SupplyState::new(Faction::Player);
        state.add_shipment(Shipment {
            resource: Resource::Fuel,
            amount: 10.0,
            eta_turn: 3,
        });
        state.add_shipment(Shipment {
            resource: Resource::Ammo,
            amount: 5.0,
            eta_turn: 1,
        });
        state.add_shipment(Shipment {
            resource: Resource::Parts,
            amount: 2.0,
            eta_turn: 2,
        });
        let etas: Vec<u32> = state.pending_shipments().iter().map(|s| s.eta_turn).collect();
        assert_eq!(etas, vec![1, 2, 3]);

        let delivered = state.deliver_due_shipments(2);
        assert_eq!(delivered.len(), 2);
        assert_eq!(state.pending_shipments().len(), 1);
        assert!((state.inventory.ammo.current - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_production_scales_with_elapsed_turns() {
        let mut state = SupplyState::new(Faction::Player);
        // Turn 1 is the baseline; nothing accrues yet.
        assert!(state.accrue_production(1).is_empty());
        let credited = state.accrue_production(3);
        assert_eq!(credited.len(), 4);
        // Two turns of ammo production at the default rate of 4.
        assert!((state.inventory.ammo.current - 108.0).abs() < 1e-9);
    }

    #[test]
    fn test_draw_never_overdraws() {
        let mut state = SupplyState::new(Faction::Bot);
        state.inventory.ammo.current = 1.5;
        assert!((state.draw(Resource::Ammo, 4.0) - 1.5).abs() < 1e-9);
        assert!(state.inventory.ammo.current.abs() < 1e-9);
        assert!(state.draw(Resource::Ammo, 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_ledger_is_bounded_fifo() {
        let mut state = SupplyState::new(Faction::Player);
        for i in 0..(LEDGER_LIMIT + 10) {
            state.log(LedgerEntry {
                turn: i as u32,
                event: LedgerEvent::Production,
                resource: Some(Resource::Ammo),
                amount: 1.0,
                note: format!("entry {}", i),
            });
        }
        let entries = state.ledger_entries();
        assert_eq!(entries.len(), LEDGER_LIMIT);
        assert_eq!(entries.first().unwrap().turn, 10);
    }

    #[test]
    fn test_mirror_insert_and_remove() {
        let mut state = SupplyState::new(Faction::Player);
        state.mirror_insert("u_b", "Panzer_IV", UnitClass::Tank);
        state.mirror_insert("u_a", "Rifle_Infantry", UnitClass::Infantry);
        let ids: Vec<&String> = state.mirror().keys().collect();
        assert_eq!(ids, vec!["u_a", "u_b"]);
        assert!(state.mirror_remove("u_a").is_some());
        assert!(state.mirror_remove("u_a").is_none());
    }
}
