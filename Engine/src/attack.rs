//! Attack resolution: validation, line of fire, damage application, and
//! retaliation.

use crate::engine::BattleEngine;
use crate::error::EngineError;
use crate::phase::BattlePhase;
use crate::reports::{AttackResolution, CombatPreview, CombatReportEntry};
use airops::AircraftAmmo;
use combat::{
    facing_aspect, resolve_expected, retaliation_multiplier, AttackerContext, CombatantProfile,
    DefenderContext, Engagement,
};
use hexmap::{line_of_sight, HexCoord};
use units::{Facing, Faction, UnitTypeStats};

/// Knobs for the shared attack pipeline. Standard attacks use the
/// defaults; mission bomb runs relax range/LOS and allow bomber-vs-air.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AttackOptions {
    pub allow_bomber_vs_air: bool,
    pub ignore_range: bool,
    pub ignore_los: bool,
    pub with_interception: bool,
}

impl AttackOptions {
    pub(crate) fn standard() -> Self {
        Self {
            allow_bomber_vs_air: false,
            ignore_range: false,
            ignore_los: false,
            with_interception: true,
        }
    }

    pub(crate) fn bomb_run() -> Self {
        Self {
            allow_bomber_vs_air: true,
            ignore_range: true,
            ignore_los: true,
            with_interception: false,
        }
    }
}

/// Everything validation learned, handed to the mutation half.
struct ValidatedAttack {
    attacker_id: String,
    attacker_stats: UnitTypeStats,
    defender_id: String,
    defender_stats: UnitTypeStats,
    defender_faction: Faction,
    spotted_only: bool,
}

impl BattleEngine {
    /// Direct line of sight, else a friendly spotter with eyes on the
    /// target. `Some(false)` = direct, `Some(true)` = spotted-only.
    pub(crate) fn line_of_fire(
        &self,
        faction: Faction,
        shooter_hex: HexCoord,
        shooter_airborne: bool,
        target_hex: HexCoord,
    ) -> Option<bool> {
        if line_of_sight(
            &self.config.map,
            &self.config.terrain,
            shooter_hex,
            target_hex,
            shooter_airborne,
            true,
        ) {
            return Some(false);
        }
        for (hex, unit) in self.sorted_placements(faction) {
            if hex == shooter_hex {
                continue;
            }
            let Ok(stats) = self.stats(&unit.type_key) else {
                continue;
            };
            let spotter_airborne = stats.is_air();
            if !line_of_sight(
                &self.config.map,
                &self.config.terrain,
                hex,
                target_hex,
                spotter_airborne,
                true,
            ) {
                continue;
            }
            // Ground spotters also need the target inside their vision
            // radius; aircraft report anything they can see.
            if !spotter_airborne && hex.distance(target_hex) > stats.vision as i32 {
                continue;
            }
            return Some(true);
        }
        None
    }

    fn validate_attack(
        &self,
        attacker_faction: Faction,
        attacker_hex: HexCoord,
        defender_hex: HexCoord,
        options: AttackOptions,
    ) -> Result<ValidatedAttack, EngineError> {
        let Some(attacker) = self.units(attacker_faction).get(&attacker_hex) else {
            return if self.unit_at(attacker_hex).is_some() {
                Err(EngineError::NotYourTurn)
            } else {
                Err(EngineError::Input(format!(
                    "no attacker at {}",
                    attacker_hex.key()
                )))
            };
        };
        let defender_faction = attacker_faction.opponent();
        let Some(defender) = self.units(defender_faction).get(&defender_hex) else {
            return Err(EngineError::Input(format!(
                "no target at {}",
                defender_hex.key()
            )));
        };

        let attacker_stats = self.stats(&attacker.type_key)?;
        let defender_stats = self.stats(&defender.type_key)?;
        let distance = attacker_hex.distance(defender_hex);

        if !options.ignore_range
            && (distance < attacker_stats.range_min as i32
                || distance > attacker_stats.range_max as i32)
        {
            return Err(EngineError::RangeRestriction);
        }

        let flags = self.turn_flags_for(&attacker.unit_id);
        if !attacker_stats.is_air() {
            // Half of the full turn budget (commander scalar and rush
            // bonus included), not of the raw catalog stat.
            let half_budget = self
                .get_movement_budget(attacker_hex)
                .map(|budget| budget.base / 2)
                .unwrap_or(attacker_stats.movement / 2);
            if flags.movement_points_used > half_budget {
                return Err(EngineError::MovedTooFarToAttack);
            }
        }

        if defender_stats.is_air() {
            if !attacker_stats.can_target_air() {
                return Err(EngineError::CannotTargetAir);
            }
            // Bombers only engage aircraft when retaliating (or on a bomb
            // run explicitly cleared for it).
            if attacker_stats.is_bomber() && !options.allow_bomber_vs_air {
                return Err(EngineError::CannotTargetAir);
            }
        }

        if attacker_stats.is_air() {
            let pool = self
                .air
                .ammo_for(&attacker.unit_id)
                .unwrap_or_else(|| Self::default_pool(&attacker_stats));
            let salvos = if defender_stats.is_air() {
                pool.air
            } else {
                pool.ground
            };
            if salvos == 0 {
                return Err(EngineError::AmmoExhausted);
            }
        } else if attacker.ammo == 0 {
            return Err(EngineError::AmmoExhausted);
        }

        let spotted_only = if options.ignore_los {
            false
        } else {
            match self.line_of_fire(
                attacker_faction,
                attacker_hex,
                attacker_stats.is_air(),
                defender_hex,
            ) {
                Some(spotted) => spotted,
                None => return Err(EngineError::NoLineOfFire),
            }
        };

        Ok(ValidatedAttack {
            attacker_id: attacker.unit_id.clone(),
            attacker_stats,
            defender_id: defender.unit_id.clone(),
            defender_stats,
            defender_faction,
            spotted_only,
        })
    }

    fn attacker_context(
        &self,
        faction: Faction,
        unit: &units::Unit,
        spotted_only: bool,
        aspect: combat::FacingAspect,
    ) -> AttackerContext {
        let (accuracy_bonus_pct, damage_bonus_pct) = match faction {
            Faction::Player => (
                self.config.commander.accuracy_bonus_pct,
                self.config.commander.damage_bonus_pct,
            ),
            Faction::Bot => (0.0, self.config.difficulty.damage_bonus_pct),
        };
        AttackerContext {
            strength: unit.strength,
            experience: unit.experience,
            spotted_only,
            accuracy_bonus_pct,
            damage_bonus_pct,
            aspect,
        }
    }

    pub(crate) fn defender_context(&self, unit: &units::Unit, stats: &UnitTypeStats) -> DefenderContext {
        let terrain_defense = if stats.is_air() {
            0
        } else {
            self.config
                .map
                .kind_at(unit.hex)
                .map(|kind| self.config.terrain.defense(kind))
                .unwrap_or(0)
        };
        let entrench = if stats.is_air() { 0 } else { unit.entrench };
        DefenderContext {
            strength: unit.strength,
            experience: unit.experience,
            terrain_defense,
            entrench,
            is_rushing: self.turn_flags_for(&unit.unit_id).is_rushing,
        }
    }

    /// Spend the attacker's ammunition for one shot at the given target
    /// domain.
    fn spend_attack_ammo(
        &mut self,
        faction: Faction,
        hex: HexCoord,
        stats: &UnitTypeStats,
        unit_id: &str,
        target_is_air: bool,
    ) {
        if stats.is_air() {
            let default = Self::default_pool(stats);
            let pool = self.air.ammo_entry(unit_id, default);
            if target_is_air {
                pool.spend_air();
            } else {
                pool.spend_ground();
            }
        } else if let Some(unit) = self.units_mut(faction).get_mut(&hex) {
            unit.ammo = unit.ammo.saturating_sub(1);
        }
    }

    /// The shared attack pipeline: validate, optionally fight through CAP,
    /// deliver the blow, let the defender answer, book the report.
    pub(crate) fn execute_attack(
        &mut self,
        attacker_faction: Faction,
        attacker_hex: HexCoord,
        defender_hex: HexCoord,
        options: AttackOptions,
    ) -> Result<AttackResolution, EngineError> {
        let validated =
            self.validate_attack(attacker_faction, attacker_hex, defender_hex, options)?;
        let ValidatedAttack {
            attacker_id,
            attacker_stats,
            defender_id,
            defender_stats,
            defender_faction,
            spotted_only,
        } = validated;

        // Opposing CAP gets its say before an air attack is delivered.
        let mut intercepted = false;
        let mut attacker_hex = attacker_hex;
        if options.with_interception && attacker_stats.is_air() {
            let summary = self.run_interception(attacker_faction, &attacker_id, defender_hex);
            intercepted = summary.engaged;
            if summary.bomber_destroyed {
                return Ok(AttackResolution {
                    attacker_id,
                    defender_id,
                    expectation: None,
                    engagement: Engagement::Standard,
                    inflicted: 0,
                    defender_destroyed: false,
                    retaliation_inflicted: None,
                    attacker_destroyed: true,
                    retaliation_note: None,
                    intercepted: true,
                    aborted: true,
                });
            }
            // Interception may not move the attacker, but re-read its hex
            // in case future rules do.
            if let Some(crate::engine::UnitLocation::Deployed(_, hex)) =
                self.locate_unit(attacker_faction, &attacker_id)
            {
                attacker_hex = hex;
            }
        }

        let Some(attacker) = self.units(attacker_faction).get(&attacker_hex).cloned() else {
            return Err(EngineError::Input("attacker lost before the attack".into()));
        };
        let Some(defender) = self.units(defender_faction).get(&defender_hex).cloned() else {
            return Err(EngineError::Input("target lost before the attack".into()));
        };

        let attacker_profile = CombatantProfile::from_stats(&attacker_stats);
        let defender_profile = CombatantProfile::from_stats(&defender_stats);
        let aspect = facing_aspect(attacker_hex, defender_hex, defender.facing);
        let attacker_ctx =
            self.attacker_context(attacker_faction, &attacker, spotted_only, aspect);
        let defender_ctx = self.defender_context(&defender, &defender_stats);

        let expectation = resolve_expected(
            &attacker_profile,
            &attacker_ctx,
            &defender_profile,
            &defender_ctx,
        );
        let engagement = Engagement::classify(&attacker_profile, defender_stats.is_air());
        let inflicted = engagement.apply(expectation.expected_damage);

        // Primary damage.
        let mut defender_destroyed = false;
        if let Some(unit) = self.units_mut(defender_faction).get_mut(&defender_hex) {
            unit.take_damage(inflicted);
            if !unit.is_alive() {
                defender_destroyed = true;
            }
        }
        if defender_destroyed {
            self.destroy_unit(
                defender_faction,
                crate::engine::UnitLocation::Deployed(defender_faction, defender_hex),
            );
        }

        self.spend_attack_ammo(
            attacker_faction,
            attacker_hex,
            &attacker_stats,
            &attacker_id,
            defender_stats.is_air(),
        );

        // Retaliation.
        let mut retaliation_inflicted = None;
        let mut retaliation_note = None;
        let mut attacker_destroyed = false;
        if !defender_destroyed {
            // Retaliation fires at the defender's surviving strength.
            let defender_now = self
                .units(defender_faction)
                .get(&defender_hex)
                .cloned()
                .unwrap_or_else(|| defender.clone());
            match self.check_retaliation(
                &attacker_stats,
                attacker_hex,
                &defender_now,
                &defender_stats,
                defender_hex,
            ) {
                Ok(reverse_spotted) => {
                    let defender_flags_id = defender_now.unit_id.clone();
                    let reverse_aspect =
                        facing_aspect(defender_hex, attacker_hex, attacker.facing);
                    let reverse_ctx = self.attacker_context(
                        defender_faction,
                        &defender_now,
                        reverse_spotted,
                        reverse_aspect,
                    );
                    let reverse_def_ctx = self.defender_context(&attacker, &attacker_stats);
                    let reverse = resolve_expected(
                        &defender_profile,
                        &reverse_ctx,
                        &attacker_profile,
                        &reverse_def_ctx,
                    );
                    let multiplier =
                        retaliation_multiplier(&defender_profile, &attacker_profile);
                    let answered = (reverse.expected_damage * multiplier).round().max(0.0) as u32;
                    retaliation_inflicted = Some(answered);

                    if let Some(unit) = self.units_mut(attacker_faction).get_mut(&attacker_hex) {
                        unit.take_damage(answered);
                        if !unit.is_alive() {
                            attacker_destroyed = true;
                        }
                    }
                    if attacker_destroyed {
                        self.destroy_unit(
                            attacker_faction,
                            crate::engine::UnitLocation::Deployed(
                                attacker_faction,
                                attacker_hex,
                            ),
                        );
                    }
                    self.spend_attack_ammo(
                        defender_faction,
                        defender_hex,
                        &defender_stats,
                        &defender.unit_id,
                        attacker_stats.is_air(),
                    );
                    self.flags_mut(&defender_flags_id).retaliations_used += 1;
                }
                Err(note) => {
                    retaliation_note = Some(note);
                }
            }
        }

        // Attacker turn flags and facing.
        if !attacker_destroyed {
            if let Some(unit) = self.units_mut(attacker_faction).get_mut(&attacker_hex) {
                unit.facing = Facing::from_sector(attacker_hex.bearing_sector(defender_hex));
            }
            let movement_charge = if attacker_stats.is_air() {
                if defender_stats.is_air() {
                    2
                } else {
                    1
                }
            } else {
                0
            };
            let flags = self.flags_mut(&attacker_id);
            flags.attacks_used += 1;
            flags.movement_points_used += movement_charge;
        } else {
            self.flags_mut(&attacker_id).attacks_used += 1;
        }

        let turn = self.turn_number;
        self.push_combat_report(CombatReportEntry {
            id: String::new(),
            turn,
            attacker_faction,
            attacker_id: attacker_id.clone(),
            attacker_type: attacker.type_key.clone(),
            attacker_hex: attacker_hex.key(),
            defender_id: defender_id.clone(),
            defender_type: defender.type_key.clone(),
            defender_hex: defender_hex.key(),
            inflicted,
            retaliation_inflicted,
            defender_destroyed,
            attacker_destroyed,
            note: retaliation_note.clone(),
        });
        self.mark_dirty();

        Ok(AttackResolution {
            attacker_id,
            defender_id,
            expectation: Some(expectation),
            engagement,
            inflicted,
            defender_destroyed,
            retaliation_inflicted,
            attacker_destroyed,
            retaliation_note,
            intercepted,
            aborted: false,
        })
    }

    /// Whether the defender may answer, and with what sight picture.
    /// Returns the human-readable reason when it may not.
    fn check_retaliation(
        &self,
        attacker_stats: &UnitTypeStats,
        attacker_hex: HexCoord,
        defender: &units::Unit,
        defender_stats: &UnitTypeStats,
        defender_hex: HexCoord,
    ) -> Result<bool, String> {
        // Aircraft working over ground targets fly above the reply.
        if attacker_stats.is_air() && !defender_stats.is_air() {
            return Err("ground units cannot return fire at aircraft".to_string());
        }
        let distance = defender_hex.distance(attacker_hex);
        let range_bonus = if defender_stats.is_bomber() && attacker_stats.is_air() {
            1
        } else {
            0
        };
        let max_range = defender_stats.range_max as i32 + range_bonus;
        if distance < defender_stats.range_min as i32 || distance > max_range {
            return Err("attacker out of retaliation range".to_string());
        }
        if self.turn_flags_for(&defender.unit_id).retaliations_used > 0 {
            return Err("already retaliated this turn".to_string());
        }
        if defender_stats.is_air() {
            let pool = self
                .air
                .ammo_for(&defender.unit_id)
                .unwrap_or_else(|| Self::default_pool(defender_stats));
            let salvos = if attacker_stats.is_air() {
                pool.air
            } else {
                pool.ground
            };
            if salvos == 0 {
                return Err("no salvos left to return fire".to_string());
            }
        } else if defender.ammo == 0 {
            return Err("no ammunition to return fire".to_string());
        }
        let defender_faction = if self.player_units.contains_key(&defender_hex) {
            Faction::Player
        } else {
            Faction::Bot
        };
        match self.line_of_fire(
            defender_faction,
            defender_hex,
            defender_stats.is_air(),
            attacker_hex,
        ) {
            Some(spotted) => Ok(spotted),
            None => Err("no line of fire for retaliation".to_string()),
        }
    }

    // ------------------------------------------------------------------
    // Public attack API
    // ------------------------------------------------------------------

    /// Resolve an attack by the active faction's unit, retaliation
    /// included.
    pub fn attack_unit(
        &mut self,
        attacker_hex: HexCoord,
        defender_hex: HexCoord,
    ) -> Result<AttackResolution, EngineError> {
        self.phase_guard(
            "attack_unit",
            &[BattlePhase::PlayerTurn, BattlePhase::BotTurn],
        )?;
        self.execute_attack(
            self.active_faction,
            attacker_hex,
            defender_hex,
            AttackOptions::standard(),
        )
    }

    /// Project an attack without touching state. `None` when the attack
    /// would be rejected.
    pub fn preview_attack(
        &self,
        attacker_hex: HexCoord,
        defender_hex: HexCoord,
    ) -> Option<CombatPreview> {
        if !self.phase.allows_turn_play() {
            return None;
        }
        let validated = self
            .validate_attack(
                self.active_faction,
                attacker_hex,
                defender_hex,
                AttackOptions::standard(),
            )
            .ok()?;
        let attacker = self.units(self.active_faction).get(&attacker_hex)?.clone();
        let defender = self
            .units(validated.defender_faction)
            .get(&defender_hex)?
            .clone();
        let attacker_profile = CombatantProfile::from_stats(&validated.attacker_stats);
        let defender_profile = CombatantProfile::from_stats(&validated.defender_stats);
        let aspect = facing_aspect(attacker_hex, defender_hex, defender.facing);
        let attacker_ctx = self.attacker_context(
            self.active_faction,
            &attacker,
            validated.spotted_only,
            aspect,
        );
        let defender_ctx = self.defender_context(&defender, &validated.defender_stats);
        let expectation = resolve_expected(
            &attacker_profile,
            &attacker_ctx,
            &defender_profile,
            &defender_ctx,
        );
        let engagement =
            Engagement::classify(&attacker_profile, validated.defender_stats.is_air());
        let projected_damage = engagement.apply(expectation.expected_damage);
        let defender_can_retaliate = self
            .check_retaliation(
                &validated.attacker_stats,
                attacker_hex,
                &defender,
                &validated.defender_stats,
                defender_hex,
            )
            .is_ok();
        Some(CombatPreview {
            expectation,
            engagement,
            projected_damage,
            defender_can_retaliate,
        })
    }

    /// Opposing hexes the unit at `attacker_hex` could legally attack
    /// right now, sorted by `(q, r)`.
    pub fn get_attackable_targets(&self, attacker_hex: HexCoord) -> Vec<HexCoord> {
        if !self.phase.allows_turn_play() {
            return Vec::new();
        }
        let defender_faction = self.active_faction.opponent();
        let mut targets = Vec::new();
        for (hex, _) in self.sorted_placements(defender_faction) {
            if self
                .validate_attack(
                    self.active_faction,
                    attacker_hex,
                    hex,
                    AttackOptions::standard(),
                )
                .is_ok()
            {
                targets.push(hex);
            }
        }
        targets
    }
}
