//! Data-driven combat content and loaders.
//!
//! Definitions (buffs, skills, passives, equipment) and attribute presets are
//! authored in RON; runtime tunables live in a TOML [`combat_core::CombatConfig`].
//! Everything loaded here ends up in a [`combat_core::DefinitionCatalog`] and
//! never appears in per-combatant state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, ContentPack, LoadResult, Preset};
