//! The per-faction supply tick: shipments, production, upkeep, attrition.

use crate::engine::{BattleEngine, UnitLocation};
use crate::reports::{SupplyTickReport, UnitAttritionReport};
use hexmap::HexCoord;
use supply::{
    connected_hexes, out_of_supply_attrition, round2, upkeep_for_class, LedgerEntry, LedgerEvent,
    Resource,
};
use units::Faction;

impl BattleEngine {
    /// Supply sources for a faction: HQ plus (for the Player) the base
    /// camp.
    pub(crate) fn supply_sources(&self, faction: Faction) -> Vec<HexCoord> {
        let mut sources = Vec::new();
        match faction {
            Faction::Player => {
                if let Some(hq) = self.config.player_hq {
                    sources.push(hq);
                }
                if let Some(base) = self.base_camp {
                    sources.push(base);
                }
            }
            Faction::Bot => {
                if let Some(hq) = self.config.bot_hq {
                    sources.push(hq);
                }
            }
        }
        sources
    }

    /// Run one faction's supply tick: deliver shipments, credit
    /// production, then walk every fielded unit for upkeep or attrition.
    pub(crate) fn run_supply_tick(&mut self, faction: Faction) -> SupplyTickReport {
        let turn = self.turn_number;
        let delivered = self.supply_mut(faction).deliver_due_shipments(turn);
        let produced = self.supply_mut(faction).accrue_production(turn);

        let sources = self.supply_sources(faction);
        let connected = connected_hexes(&self.config.map, &self.config.terrain, &sources);
        let scalar = match faction {
            Faction::Player => self.config.commander.supply_scalar(),
            Faction::Bot => 1.0,
        };

        let mut upkeep_totals: Vec<(Resource, f64)> = Resource::all()
            .iter()
            .map(|&resource| (resource, 0.0))
            .collect();
        let mut out_of_supply = Vec::new();
        let mut attrition_reports = Vec::new();
        let attrition_profile = out_of_supply_attrition();

        for (hex, unit) in self.sorted_placements(faction) {
            let Ok(stats) = self.stats(&unit.type_key) else {
                continue;
            };
            if connected.contains(&hex) {
                let upkeep = upkeep_for_class(stats.class);
                let needs = [
                    (Resource::Ammo, upkeep.ammo),
                    (Resource::Fuel, upkeep.fuel),
                    (Resource::Rations, upkeep.rations),
                    (Resource::Parts, upkeep.parts),
                ];
                for (resource, amount) in needs {
                    let need = round2(amount * scalar);
                    if need <= 0.0 {
                        continue;
                    }
                    let drawn = self.supply_mut(faction).draw(resource, need);
                    for slot in upkeep_totals.iter_mut() {
                        if slot.0 == resource {
                            slot.1 = round2(slot.1 + drawn);
                        }
                    }
                    let unmet = round2(need - drawn);
                    if unmet > 0.0 {
                        // The depot ran dry; the shortfall comes out of
                        // the unit's own stores.
                        let onboard = unmet.ceil() as u32;
                        if let Some(entry) = self.units_mut(faction).get_mut(&hex) {
                            match resource {
                                Resource::Ammo => entry.ammo = entry.ammo.saturating_sub(onboard),
                                Resource::Fuel => entry.fuel = entry.fuel.saturating_sub(onboard),
                                Resource::Rations | Resource::Parts => {}
                            }
                        }
                        self.supply_mut(faction).log(LedgerEntry {
                            turn,
                            event: LedgerEvent::OnboardDraw,
                            resource: Some(resource),
                            amount: unmet,
                            note: format!(
                                "{} covered {} {} from onboard stores",
                                unit.unit_id,
                                unmet,
                                resource.as_str()
                            ),
                        });
                    }
                }
            } else {
                out_of_supply.push(unit.unit_id.clone());
                let ammo_loss = round2(attrition_profile.ammo * scalar);
                let fuel_loss = round2(attrition_profile.fuel * scalar);
                let strength_loss = round2(attrition_profile.strength * scalar);
                let entrench_loss = attrition_profile.entrench;

                let mut destroyed = false;
                if let Some(entry) = self.units_mut(faction).get_mut(&hex) {
                    entry.ammo = entry.ammo.saturating_sub(ammo_loss.round() as u32);
                    entry.fuel = entry.fuel.saturating_sub(fuel_loss.round() as u32);
                    entry.entrench = entry.entrench.saturating_sub(entrench_loss);
                    entry.take_damage(strength_loss.round() as u32);
                    destroyed = !entry.is_alive();
                }
                if destroyed {
                    self.destroy_unit(faction, UnitLocation::Deployed(faction, hex));
                }
                self.supply_mut(faction).log(LedgerEntry {
                    turn,
                    event: LedgerEvent::Attrition,
                    resource: None,
                    amount: strength_loss,
                    note: format!("{} out of supply at {}", unit.unit_id, hex.key()),
                });
                attrition_reports.push(UnitAttritionReport {
                    unit_id: unit.unit_id.clone(),
                    strength_lost: strength_loss,
                    ammo_lost: ammo_loss,
                    fuel_lost: fuel_loss,
                    destroyed,
                });
            }
        }

        let drawn_totals: Vec<(Resource, f64)> = upkeep_totals
            .iter()
            .copied()
            .filter(|(_, amount)| *amount > 0.0)
            .collect();
        for (resource, amount) in &drawn_totals {
            self.supply_mut(faction).log(LedgerEntry {
                turn,
                event: LedgerEvent::UpkeepDraw,
                resource: Some(*resource),
                amount: *amount,
                note: format!("upkeep drew {} {}", amount, resource.as_str()),
            });
        }

        self.mark_dirty();
        SupplyTickReport {
            faction,
            turn,
            delivered,
            produced,
            upkeep_drawn: drawn_totals,
            out_of_supply,
            attrition: attrition_reports,
        }
    }

    /// Queue a supply shipment for a faction (scenario scripting and
    /// tests).
    pub fn add_supply_shipment(&mut self, faction: Faction, shipment: supply::Shipment) {
        self.supply_mut(faction).add_shipment(shipment);
        self.mark_dirty();
    }
}
