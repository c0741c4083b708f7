//! Aircraft salvo pools.

use serde::{Deserialize, Serialize};

/// A squadron's remaining attacks, split into air-to-air and air-to-ground
/// salvos. Spending the last salvo of either pool flags the squadron for
/// rearming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftAmmo {
    pub air: u32,
    pub ground: u32,
    pub needs_rearm: bool,
}

impl AircraftAmmo {
    /// Loadout for combat aircraft.
    pub fn combat_default() -> Self {
        Self {
            air: 4,
            ground: 1,
            needs_rearm: false,
        }
    }

    /// Loadout for unarmed scouts.
    pub fn scout() -> Self {
        Self {
            air: 0,
            ground: 0,
            needs_rearm: false,
        }
    }

    /// Spend one air-to-air salvo. Returns `false` when the pool is empty.
    pub fn spend_air(&mut self) -> bool {
        if self.air == 0 {
            return false;
        }
        self.air -= 1;
        self.update_rearm_flag();
        true
    }

    /// Spend one air-to-ground salvo. Returns `false` when the pool is
    /// empty.
    pub fn spend_ground(&mut self) -> bool {
        if self.ground == 0 {
            return false;
        }
        self.ground -= 1;
        self.update_rearm_flag();
        true
    }

    /// Whether any salvo remains at all.
    pub fn has_any(&self) -> bool {
        self.air > 0 || self.ground > 0
    }

    /// Restore the pool to a baseline loadout.
    pub fn restore(&mut self, baseline: AircraftAmmo) {
        self.air = baseline.air;
        self.ground = baseline.ground;
        self.needs_rearm = false;
    }

    fn update_rearm_flag(&mut self) {
        if self.air == 0 || self.ground == 0 {
            self.needs_rearm = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spending_last_ground_salvo_flags_rearm() {
        let mut ammo = AircraftAmmo::combat_default();
        assert!(ammo.spend_ground());
        assert_eq!(ammo.ground, 0);
        assert!(ammo.needs_rearm);
        assert!(!ammo.spend_ground());
    }

    #[test]
    fn test_spending_air_salvos_down_to_zero() {
        let mut ammo = AircraftAmmo::combat_default();
        for _ in 0..3 {
            assert!(ammo.spend_air());
            assert!(!ammo.needs_rearm);
        }
        assert!(ammo.spend_air());
        assert_eq!(ammo.air, 0);
        assert!(ammo.needs_rearm);
    }

    #[test]
    fn test_restore_clears_the_flag() {
        let mut ammo = AircraftAmmo::combat_default();
        while ammo.spend_air() {}
        assert!(ammo.needs_rearm);
        ammo.restore(AircraftAmmo::combat_default());
        assert_eq!(ammo, AircraftAmmo::combat_default());
    }

    #[test]
    fn test_scouts_start_dry_but_unflagged() {
        let scout = AircraftAmmo::scout();
        assert!(!scout.has_any());
        assert!(!scout.needs_rearm);
    }
}
