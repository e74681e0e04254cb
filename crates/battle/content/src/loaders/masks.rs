//! Mask catalog loader.

use std::path::Path;

use battle_core::MaskTemplate;

use crate::loaders::{LoadResult, read_file};

/// Masks by id, in file order.
#[derive(Debug, Clone, Default)]
pub struct MaskCatalog {
    entries: Vec<(String, MaskTemplate)>,
}

impl MaskCatalog {
    pub fn get(&self, id: &str) -> Option<&MaskTemplate> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, template)| template)
    }

    /// Looks up `id`, failing with the offending id when it is unknown.
    pub fn require(&self, id: &str) -> LoadResult<&MaskTemplate> {
        self.get(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown mask id '{}'", id))
    }

    /// Resolves a list of ids into cloned templates, e.g. a deck list.
    pub fn resolve_all(&self, ids: &[String]) -> LoadResult<Vec<MaskTemplate>> {
        ids.iter().map(|id| self.require(id).cloned()).collect()
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
}

/// Loader for mask catalogs from RON files.
pub struct MaskLoader;

impl MaskLoader {
    /// Load a mask catalog from a RON file.
    ///
    /// RON format: `Vec<(String, MaskTemplate)>`
    pub fn load(path: &Path) -> LoadResult<MaskCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MaskCatalog> {
        let entries: Vec<(String, MaskTemplate)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse mask catalog RON: {}", e))?;

        for (index, (id, _)) in entries.iter().enumerate() {
            if entries[..index].iter().any(|(other, _)| other == id) {
                anyhow::bail!("Duplicate mask id '{}'", id);
            }
        }
        tracing::debug!(count = entries.len(), "mask catalog parsed");
        Ok(MaskCatalog { entries })
    }
}
