//! Where purchased goods physically enter the world.
//!
//! - [`RegionClassifier`]: open-air versus enclosed regions
//! - [`SpotFinder`]: drop and spawn coordinates with ordered fallback chains
//! - [`ContainerSelector`]: ranks storage containers for a stack
mod classifier;
mod container;
mod search;
mod spot;

pub use classifier::RegionClassifier;
pub use container::ContainerSelector;
pub use spot::{DropSpotStrategy, SpawnSpotStrategy, SpotFinder};
