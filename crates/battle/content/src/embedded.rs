//! The default content set, compiled into the binary.

use crate::loaders::{
    BattleSetup, ConfigLoader, Encounter, EncounterLoader, LoadResult, MaskCatalog, MaskLoader,
    UnitCatalog, UnitLoader,
};

pub const BATTLE_TOML: &str = include_str!("../data/battle.toml");
pub const MASKS_RON: &str = include_str!("../data/masks.ron");
pub const UNITS_RON: &str = include_str!("../data/units.ron");
pub const ENCOUNTERS_RON: &str = include_str!("../data/encounters.ron");

pub fn config() -> LoadResult<battle_core::BattleConfig> {
    ConfigLoader::parse(BATTLE_TOML)
}

pub fn masks() -> LoadResult<MaskCatalog> {
    MaskLoader::parse(MASKS_RON)
}

pub fn units() -> LoadResult<UnitCatalog> {
    UnitLoader::parse(UNITS_RON)
}

pub fn encounters() -> LoadResult<Vec<Encounter>> {
    EncounterLoader::parse(ENCOUNTERS_RON)
}

/// Assembles one embedded encounter by id.
pub fn battle(encounter_id: &str) -> LoadResult<BattleSetup> {
    let encounters = encounters()?;
    let encounter = encounters
        .iter()
        .find(|e| e.id == encounter_id)
        .ok_or_else(|| anyhow::anyhow!("Unknown encounter '{}'", encounter_id))?;
    BattleSetup::assemble(config()?, &masks()?, &units()?, encounter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_encounter_assembles() {
        let masks = masks().unwrap();
        let units = units().unwrap();
        let config = config().unwrap();

        for encounter in encounters().unwrap() {
            let setup = BattleSetup::assemble(config.clone(), &masks, &units, &encounter)
                .unwrap_or_else(|e| panic!("{}: {}", encounter.id, e));
            assert!(setup.into_engine().is_ok(), "{} failed to start", encounter.id);
        }
    }

    #[test]
    fn every_catalog_mask_is_reachable() {
        let masks = masks().unwrap();
        let units = units().unwrap();
        let encounters = encounters().unwrap();

        for id in masks.ids() {
            let worn = units
                .ids()
                .any(|u| units.get(u).and_then(|e| e.mask.as_deref()) == Some(id));
            let dealt = encounters
                .iter()
                .any(|e| e.player_deck.iter().chain(&e.enemy_deck).any(|m| m == id));
            assert!(worn || dealt, "mask '{}' is never used", id);
        }
    }
}
