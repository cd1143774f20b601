//! Content factory for building engine inputs from data files.

use std::path::{Path, PathBuf};

use fulfillment_core::{CatalogSnapshot, FulfillmentConfig, WorldState};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, WorldLoader};

/// Content factory that loads all storefront content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml   (optional; defaults when absent)
/// ├── catalog.ron
/// └── world.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const CATALOG_FILE: &'static str = "catalog.ron";
    pub const WORLD_FILE: &'static str = "world.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load fulfillment tuning from `config.toml`, or defaults if the file is missing.
    pub fn load_config(&self) -> LoadResult<FulfillmentConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(FulfillmentConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the purchasable catalog from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<CatalogSnapshot> {
        CatalogLoader::load(&self.data_dir.join(Self::CATALOG_FILE))
    }

    /// Load the world snapshot from `world.ron`.
    pub fn load_world(&self) -> LoadResult<WorldState> {
        WorldLoader::load(&self.data_dir.join(Self::WORLD_FILE))
    }

    /// Write the world snapshot back to `world.ron`.
    pub fn save_world(&self, world: &WorldState) -> LoadResult<()> {
        WorldLoader::save(&self.data_dir.join(Self::WORLD_FILE), world)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfillment_core::{CatalogOracle, ItemHandle, RegionId};

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).expect("write fixture");
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_means_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let factory = ContentFactory::new(dir.path());
        assert_eq!(
            factory.load_config().expect("defaults"),
            FulfillmentConfig::default()
        );
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ContentFactory::new(dir.path())
            .load_catalog()
            .expect_err("no catalog");
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn loads_and_saves_a_data_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(
            dir.path(),
            ContentFactory::CATALOG_FILE,
            r#"(
                definitions: [(handle: 3, name: "Rice", kind: Goods, stack_limit: 50, market_value: 1.0)],
                entries: [(item: 3, base_price: 2)],
            )"#,
        );
        write(
            dir.path(),
            ContentFactory::WORLD_FILE,
            r#"(seed: 5, regions: [(id: 1, name: "Plain", dimensions: (8, 8))])"#,
        );
        write(dir.path(), ContentFactory::CONFIG_FILE, "edge_margin = 2\n");

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().expect("config").edge_margin, 2);
        assert_eq!(
            factory.load_catalog().expect("catalog").find_by_name("RICE"),
            Some(ItemHandle(3))
        );

        let mut world = factory.load_world().expect("world");
        assert_eq!(world.home_region, Some(RegionId(1)));
        world.nonce = 4;
        factory.save_world(&world).expect("save");

        let reloaded = factory.load_world().expect("reload");
        assert_eq!(reloaded.nonce, 4);
        assert_eq!(reloaded.regions, world.regions);
    }
}
