//! Deterministic purchase fulfillment for colony simulations.
//!
//! `fulfillment-core` prices catalog entries and turns paid orders into items
//! placed in the world: stored in containers, dropped as freight, handed to
//! the requesting agent, or spawned as live agents. It performs no I/O;
//! callers provide a [`CatalogOracle`], an [`RngOracle`], a
//! [`FulfillmentConfig`], and a mutable [`WorldState`].
pub mod config;
pub mod delivery;
pub mod env;
pub mod error;
pub mod placement;
pub mod pricing;
pub mod state;

pub use config::{ConfigError, EnclosureThresholds, FulfillmentConfig, QualityMultipliers};
pub use delivery::{
    ContainerDelivery, DeliveryMethod, DeliveryMode, DeliveryResolver, DeliveryResult,
    DirectPlacement, Order, split_stacks,
};
pub use env::{
    CatalogEntry, CatalogOracle, CatalogSnapshot, EntryFlags, Env, FulfillmentEnv, ItemKind,
    ItemTypeDefinition, MaterialCategories, PcgRng, RngOracle, compute_seed, resolve_material,
    validate_material,
};
pub use error::{EngineError, ErrorSeverity, FulfillmentError};
pub use placement::{
    ContainerSelector, DropSpotStrategy, RegionClassifier, SpawnSpotStrategy, SpotFinder,
};
pub use pricing::PricingEngine;
pub use state::{
    AgentState, Apparel, Cell, ContainerClass, ContainerState, Coordinate, EntityId, FactionId,
    FreightDrop, ItemHandle, ItemInstance, Landmark, LandmarkKind, PlacementRefusal, QualityTier,
    RegionId, RegionState, RoofKind, RoomId, TerrainKind, WorldState,
};
