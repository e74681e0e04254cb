//! Content loaders for reading battle data from files or strings.
//!
//! Every loader offers `parse` (from an in-memory string, used for the
//! embedded data) and `load` (from a file path).

pub mod config;
pub mod encounters;
pub mod factory;
pub mod masks;
pub mod units;

pub use config::ConfigLoader;
pub use encounters::{Encounter, EncounterLoader};
pub use factory::{BattleSetup, ContentFactory};
pub use masks::{MaskCatalog, MaskLoader};
pub use units::{UnitCatalog, UnitEntry, UnitLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
