//! Content factory for building a combat world from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use combat_core::{Arena, CombatConfig, DefinitionCatalog};

use crate::loaders::{CatalogLoader, ConfigLoader, ContentPack, LoadResult};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// └── content.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "combat.toml";
    pub const CONTENT_FILE: &'static str = "content.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `combat.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no combat config; using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the content pack from `content.ron`.
    pub fn load_content(&self) -> LoadResult<ContentPack> {
        let path = self.data_dir.join(Self::CONTENT_FILE);
        CatalogLoader::load(&path)
    }

    /// Load `content.ron` straight into a definition catalog.
    pub fn load_catalog(&self) -> LoadResult<DefinitionCatalog> {
        Ok(self.load_content()?.to_catalog())
    }

    /// Builds an empty arena wired to the loaded config and catalog.
    pub fn build_arena(&self) -> LoadResult<Arena> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        Ok(Arena::new(config, Arc::new(catalog)))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use combat_core::{Combatant, EntityId, SkillId, Team};
    use glam::Vec3;

    use super::*;

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().expect("defaults"), CombatConfig::default());
    }

    #[test]
    fn missing_content_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("cannot read combat data file"));
        assert!(message.ends_with("content.ron"));
    }

    #[test]
    fn builds_a_playable_arena() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("combat.toml"), "default_attack_range = 3.0\n").expect("write");
        fs::write(
            dir.path().join("content.ron"),
            r#"(skills: [(id: 1, name: "slash", is_basic_attack: true)])"#,
        )
        .expect("write");

        let mut arena = ContentFactory::new(dir.path())
            .build_arena()
            .expect("content loads");
        assert_eq!(arena.config().default_attack_range, 3.0);

        let hero = arena.spawn(Combatant::new(EntityId(1), Team::Player, None));
        arena.spawn(
            Combatant::new(EntityId(2), Team::Enemy, None).with_position(Vec3::new(0.0, 0.0, 1.0)),
        );
        arena.learn(hero, SkillId(1)).expect("skill in catalog");
        let report = arena
            .cast(hero, SkillId(1), Vec3::ZERO, Vec3::Z)
            .expect("cast");
        // 10 attack against 5 defense.
        assert_eq!(report.total_damage, 7.5);
    }
}
