//! Content loaders for reading storefront data from files.

pub mod catalog;
pub mod config;
pub mod factory;
pub mod world;

pub use catalog::{CatalogData, CatalogLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use world::{RegionData, WorldData, WorldLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// RON options shared by every loader.
///
/// Identifier newtypes (`ItemHandle`, `EntityId`, ...) are written as bare
/// numbers, and bitflags as `"A | B"` strings.
pub(crate) fn ron_options() -> ron::Options {
    ron::Options::default().with_default_extension(ron::extensions::Extensions::UNWRAP_NEWTYPES)
}

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
