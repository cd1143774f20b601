//! Fulfillment configuration loader.

use std::path::Path;

use fulfillment_core::FulfillmentConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for fulfillment tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate config data from a TOML file.
    ///
    /// Missing keys keep their defaults, so an empty file yields
    /// [`FulfillmentConfig::default`].
    pub fn load(path: &Path) -> LoadResult<FulfillmentConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<FulfillmentConfig> {
        let config: FulfillmentConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid fulfillment config: {}", e))?;
        Ok(config)
    }
}
