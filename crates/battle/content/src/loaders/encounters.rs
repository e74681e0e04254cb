//! Encounter loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One battle setup: unit ids per side and optional deck lists (mask ids).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: String,
    pub name: String,
    pub players: Vec<String>,
    pub enemies: Vec<String>,
    #[serde(default)]
    pub player_deck: Vec<String>,
    #[serde(default)]
    pub enemy_deck: Vec<String>,
}

/// Loader for encounter lists from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load encounters from a RON file.
    ///
    /// RON format: `Vec<Encounter>`
    pub fn load(path: &Path) -> LoadResult<Vec<Encounter>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<Encounter>> {
        let encounters: Vec<Encounter> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounters RON: {}", e))?;

        for encounter in &encounters {
            if encounter.players.is_empty() || encounter.enemies.is_empty() {
                anyhow::bail!("Encounter '{}' needs units on both sides", encounter.id);
            }
        }
        Ok(encounters)
    }
}
