/// Integration tests for the unit-type catalog and instance invariants.
use hexmap::{HexCoord, MoveType};
use units::{Unit, UnitClass, UnitTypeCatalog, STANDARD_CATALOG};

#[test]
fn test_standard_catalog_covers_every_class() {
    let catalog = UnitTypeCatalog::standard();
    let classes: Vec<UnitClass> = catalog
        .sorted_keys()
        .iter()
        .map(|key| catalog.stats(key).unwrap().class)
        .collect();
    for expected in [
        UnitClass::Infantry,
        UnitClass::Specialist,
        UnitClass::Vehicle,
        UnitClass::Tank,
        UnitClass::Artillery,
        UnitClass::Air,
        UnitClass::Recon,
    ] {
        assert!(classes.contains(&expected), "missing class {:?}", expected);
    }
}

#[test]
fn test_air_types_use_air_movement() {
    let catalog = UnitTypeCatalog::standard();
    for key in catalog.sorted_keys() {
        let stats = catalog.stats(&key).unwrap();
        if stats.class == UnitClass::Air {
            assert_eq!(stats.move_type, MoveType::Air, "{} should fly", key);
        } else {
            assert_ne!(stats.move_type, MoveType::Air, "{} should not fly", key);
        }
    }
}

#[test]
fn test_mission_capable_aircraft_have_profiles() {
    let catalog = UnitTypeCatalog::standard();
    for key in ["Bf_109", "Ju_87", "He_111", "Ju_52"] {
        let profile = catalog
            .stats(key)
            .unwrap()
            .air_support
            .as_ref()
            .unwrap_or_else(|| panic!("{} lacks an air-support profile", key));
        assert!(profile.combat_radius_km > 0.0);
        assert!(profile.refit_turns > 0);
        assert!(!profile.roles.is_empty());
    }
}

#[test]
fn test_shared_registry_matches_fresh_catalog() {
    let fresh = UnitTypeCatalog::standard();
    assert_eq!(fresh.sorted_keys(), STANDARD_CATALOG.sorted_keys());
}

#[test]
fn test_new_units_start_at_catalog_defaults() {
    let stats = STANDARD_CATALOG.stats("Panzer_IV").unwrap();
    let unit = Unit::new("Panzer_IV", stats, HexCoord::new(2, -1));
    assert_eq!(unit.strength, 100);
    assert_eq!(unit.ammo, stats.ammo);
    assert_eq!(unit.fuel, stats.fuel);
    assert_eq!(unit.entrench, 0);
    assert_eq!(unit.hex, HexCoord::new(2, -1));
}
