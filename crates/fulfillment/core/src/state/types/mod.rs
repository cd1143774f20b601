//! Plain data types that make up the world snapshot.
mod agent;
mod common;
mod container;
mod item;
mod region;

pub use agent::{AgentState, Apparel, PlacementRefusal};
pub use common::{Coordinate, EntityId, FactionId, RegionId, RoomId};
pub use container::{ContainerClass, ContainerState};
pub use item::{ItemHandle, ItemInstance, QualityTier};
pub use region::{Cell, FreightDrop, Landmark, LandmarkKind, RegionState, RoofKind, TerrainKind};
