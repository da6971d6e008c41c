//! Content loaders for reading combat data from files.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{CatalogLoader, ContentPack, Preset};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

use anyhow::Context;

/// Result of loading combat config or definitions.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a combat data file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("cannot read combat data file {}", path.display()))
}
