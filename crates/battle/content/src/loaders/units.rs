//! Unit catalog loader.
//!
//! Units name their starting mask by catalog id; the loader keeps the id and
//! [`UnitCatalog::template`] resolves it against a [`MaskCatalog`].

use std::path::Path;

use battle_core::{ControlSpec, Lane, UnitTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, MaskCatalog, read_file};

/// A unit as written in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub name: String,
    pub lane: Lane,
    pub max_health: u32,
    #[serde(default)]
    pub starting_health: Option<u32>,
    pub base_attack: i32,
    #[serde(default)]
    pub base_defense: i32,
    /// Mask id from the mask catalog.
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub control: ControlSpec,
}

#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    entries: Vec<(String, UnitEntry)>,
}

impl UnitCatalog {
    pub fn get(&self, id: &str) -> Option<&UnitEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, entry)| entry)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the engine template for `id`, resolving its starting mask.
    pub fn template(&self, id: &str, masks: &MaskCatalog) -> LoadResult<UnitTemplate> {
        let entry = self
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown unit id '{}'", id))?;

        let starting_mask = match &entry.mask {
            Some(mask_id) => Some(masks.require(mask_id).cloned().map_err(|e| {
                anyhow::anyhow!("Failed to resolve mask for unit '{}': {}", id, e)
            })?),
            None => None,
        };

        Ok(UnitTemplate {
            name: entry.name.clone(),
            lane: entry.lane,
            max_health: entry.max_health,
            starting_health: entry.starting_health,
            base_attack: entry.base_attack,
            base_defense: entry.base_defense,
            starting_mask,
            control: entry.control,
        })
    }
}

/// Loader for unit catalogs from RON files.
pub struct UnitLoader;

impl UnitLoader {
    /// Load a unit catalog from a RON file.
    ///
    /// RON format: `Vec<(String, UnitEntry)>`
    pub fn load(path: &Path) -> LoadResult<UnitCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<UnitCatalog> {
        let entries: Vec<(String, UnitEntry)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        for (index, (id, entry)) in entries.iter().enumerate() {
            if entries[..index].iter().any(|(other, _)| other == id) {
                anyhow::bail!("Duplicate unit id '{}'", id);
            }
            if entry.max_health == 0 {
                anyhow::bail!("Unit '{}' has zero max_health", id);
            }
        }
        tracing::debug!(count = entries.len(), "unit catalog parsed");
        Ok(UnitCatalog { entries })
    }
}
