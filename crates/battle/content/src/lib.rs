//! Data-driven battle content and loaders.
//!
//! This crate houses the static battle content and the loaders that read it:
//! - Mask catalog (RON)
//! - Unit catalog (RON), referencing masks by id
//! - Encounters (RON): rosters and decks for both sides
//! - Battle rules (TOML)
//!
//! The default data set is embedded at compile time (see [`embedded`]) so
//! binaries run without a data directory. Content only produces templates;
//! it never appears in battle state.

#[cfg(feature = "loaders")]
pub mod embedded;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BattleSetup, ConfigLoader, ContentFactory, Encounter, EncounterLoader, LoadResult,
    MaskCatalog, MaskLoader, UnitCatalog, UnitEntry, UnitLoader,
};
