//! Content factory for assembling battles from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, BattleEngine, EngineError, MaskTemplate, Team, UnitTemplate};

use crate::loaders::{
    ConfigLoader, Encounter, EncounterLoader, LoadResult, MaskCatalog, MaskLoader, UnitCatalog,
    UnitLoader,
};

/// Everything needed to start one battle.
#[derive(Debug, Clone)]
pub struct BattleSetup {
    pub name: String,
    pub config: BattleConfig,
    pub players: Vec<UnitTemplate>,
    pub enemies: Vec<UnitTemplate>,
    pub player_deck: Vec<MaskTemplate>,
    pub enemy_deck: Vec<MaskTemplate>,
}

impl BattleSetup {
    /// Resolves an encounter's unit and mask ids against the catalogs.
    pub fn assemble(
        config: BattleConfig,
        masks: &MaskCatalog,
        units: &UnitCatalog,
        encounter: &Encounter,
    ) -> LoadResult<Self> {
        let resolve = |ids: &[String]| -> LoadResult<Vec<UnitTemplate>> {
            ids.iter().map(|id| units.template(id, masks)).collect()
        };

        Ok(Self {
            name: encounter.name.clone(),
            config,
            players: resolve(&encounter.players)?,
            enemies: resolve(&encounter.enemies)?,
            player_deck: masks.resolve_all(&encounter.player_deck)?,
            enemy_deck: masks.resolve_all(&encounter.enemy_deck)?,
        })
    }

    /// Builds an engine with both decks installed and the battle initialized.
    pub fn into_engine(self) -> Result<BattleEngine, EngineError> {
        let mut engine = BattleEngine::new(self.config);
        engine.set_deck(Team::Player, self.player_deck);
        engine.set_deck(Team::Enemy, self.enemy_deck);
        engine.initialize_battle(self.players, self.enemies)?;
        Ok(engine)
    }
}

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── masks.ron
/// ├── units.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle rules from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("battle.toml"))
    }

    /// Load the mask catalog from `masks.ron`.
    pub fn load_masks(&self) -> LoadResult<MaskCatalog> {
        MaskLoader::load(&self.data_dir.join("masks.ron"))
    }

    /// Load the unit catalog from `units.ron`.
    pub fn load_units(&self) -> LoadResult<UnitCatalog> {
        UnitLoader::load(&self.data_dir.join("units.ron"))
    }

    /// Load encounters from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<Vec<Encounter>> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Loads every file and assembles the encounter named `encounter_id`.
    pub fn load_battle(&self, encounter_id: &str) -> LoadResult<BattleSetup> {
        let config = self.load_config()?;
        let masks = self.load_masks()?;
        let units = self.load_units()?;
        let encounters = self.load_encounters()?;
        let encounter = encounters
            .iter()
            .find(|e| e.id == encounter_id)
            .ok_or_else(|| anyhow::anyhow!("Unknown encounter '{}'", encounter_id))?;
        BattleSetup::assemble(config, &masks, &units, encounter)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use battle_core::BattlePhase;

    use super::*;
    use crate::embedded;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_battle_from_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("battle.toml"), embedded::BATTLE_TOML).unwrap();
        fs::write(dir.path().join("masks.ron"), embedded::MASKS_RON).unwrap();
        fs::write(dir.path().join("units.ron"), embedded::UNITS_RON).unwrap();
        fs::write(dir.path().join("encounters.ron"), embedded::ENCOUNTERS_RON).unwrap();

        let factory = ContentFactory::new(dir.path());
        let setup = factory.load_battle("skirmish").unwrap();

        assert_eq!(setup.players.len(), 2);
        assert_eq!(setup.enemies.len(), 2);
        assert_eq!(setup.player_deck.len(), 4);

        let engine = setup.into_engine().unwrap();
        assert_eq!(engine.phase(), BattlePhase::RoundActive(Team::Player));
        assert_eq!(
            engine.state().deck(Team::Player).map(|d| d.hand().len()),
            Some(3)
        );

        assert!(factory.load_battle("nowhere").is_err());
    }
}
