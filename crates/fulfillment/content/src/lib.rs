//! Data-driven catalog, configuration, and world loaders.
//!
//! This crate reads the files a storefront needs before it can take orders:
//! - Purchasable catalog (RON)
//! - Fulfillment tuning (TOML)
//! - World snapshot with regions, containers, and agents (RON)
//!
//! Everything loaded here is handed to `fulfillment-core` as plain values;
//! the engine itself never touches the filesystem.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogData, CatalogLoader, ConfigLoader, ContentFactory, LoadResult, RegionData, WorldData,
    WorldLoader,
};
