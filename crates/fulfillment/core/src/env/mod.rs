//! Traits describing read-only inputs to the engine.
//!
//! Oracles expose the purchasable catalog and the deterministic RNG. The
//! [`Env`] aggregate bundles them so the resolver can reach everything it
//! needs without hard coupling to concrete implementations.
mod catalog;
mod rng;
mod snapshot;

pub use catalog::{
    CatalogEntry, CatalogOracle, EntryFlags, ItemKind, ItemTypeDefinition, MaterialCategories,
    resolve_material, validate_material,
};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use snapshot::CatalogSnapshot;

use crate::config::FulfillmentConfig;

/// Aggregates the read-only inputs of one fulfillment call.
pub struct Env<'a, C, R>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    catalog: &'a C,
    rng: &'a R,
    config: &'a FulfillmentConfig,
}

impl<C, R> Clone for Env<'_, C, R>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, R> Copy for Env<'_, C, R>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type FulfillmentEnv<'a> = Env<'a, dyn CatalogOracle + 'a, dyn RngOracle + 'a>;

impl<'a, C, R> Env<'a, C, R>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(catalog: &'a C, rng: &'a R, config: &'a FulfillmentConfig) -> Self {
        Self {
            catalog,
            rng,
            config,
        }
    }

    pub fn catalog(&self) -> &'a C {
        self.catalog
    }

    pub fn rng(&self) -> &'a R {
        self.rng
    }

    pub fn config(&self) -> &'a FulfillmentConfig {
        self.config
    }
}

impl<'a, C, R> Env<'a, C, R>
where
    C: CatalogOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `FulfillmentEnv`.
    pub fn as_fulfillment_env(&self) -> FulfillmentEnv<'a> {
        let catalog: &'a dyn CatalogOracle = self.catalog;
        let rng: &'a dyn RngOracle = self.rng;
        Env::new(catalog, rng, self.config)
    }
}
