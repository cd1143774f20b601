//! Authoritative world snapshot the engine reads and mutates.
//!
//! The host simulation owns this state and hands a mutable borrow to the
//! resolver once per purchase. The engine only inserts into containers,
//! places items on agents, appends freight drops, and spawns agents; it never
//! removes or relocates existing objects.
pub mod types;

pub use types::{
    AgentState, Apparel, Cell, ContainerClass, ContainerState, Coordinate, EntityId, FactionId,
    FreightDrop, ItemHandle, ItemInstance, Landmark, LandmarkKind, PlacementRefusal, QualityTier,
    RegionId, RegionState, RoofKind, RoomId, TerrainKind,
};

/// All regions of the running simulation plus allocation bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    /// Seed for deterministic sampling; set once by the host.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: u64,

    /// Incremented once per fulfillment so repeated orders sample different cells.
    #[cfg_attr(feature = "serde", serde(default))]
    pub nonce: u64,

    /// Sequential entity ID allocator (monotonically increasing, never reused).
    #[cfg_attr(feature = "serde", serde(default))]
    next_entity_id: u32,

    /// Region used when the order has no requester.
    #[cfg_attr(feature = "serde", serde(default))]
    pub home_region: Option<RegionId>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub regions: Vec<RegionState>,
}

impl WorldState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Adds a region; the first region added becomes home unless one is set.
    pub fn add_region(&mut self, region: RegionState) {
        if self.home_region.is_none() {
            self.home_region = Some(region.id);
        }
        self.bump_allocator_past(&region);
        self.regions.push(region);
    }

    pub fn region(&self, id: RegionId) -> Option<&RegionState> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut RegionState> {
        self.regions.iter_mut().find(|region| region.id == id)
    }

    /// Finds an agent anywhere in the world.
    pub fn agent(&self, id: EntityId) -> Option<&AgentState> {
        self.regions.iter().find_map(|region| region.agent(id))
    }

    /// Allocates a new unique EntityId.
    ///
    /// Ids already present in any region are skipped, including objects the
    /// host pushed into `regions` directly.
    pub fn allocate_entity_id(&mut self) -> EntityId {
        let floor = self.max_entity_id().map_or(1, |id| id.0.saturating_add(1));
        self.next_entity_id = self.next_entity_id.max(floor);
        let id = EntityId(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);
        id
    }

    fn max_entity_id(&self) -> Option<EntityId> {
        self.regions
            .iter()
            .flat_map(|region| {
                region
                    .agents
                    .iter()
                    .map(|agent| agent.id)
                    .chain(region.containers.iter().map(|container| container.id))
            })
            .max()
    }

    fn bump_allocator_past(&mut self, region: &RegionState) {
        let highest = region
            .agents
            .iter()
            .map(|agent| agent.id.0)
            .chain(region.containers.iter().map(|container| container.id.0))
            .max();
        if let Some(highest) = highest {
            self.next_entity_id = self.next_entity_id.max(highest.saturating_add(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_skips_loaded_ids() {
        let mut region = RegionState::new(RegionId(1), "home", 8, 8);
        region.agents.push(AgentState::new(
            EntityId(41),
            region.coordinate(1, 1),
            FactionId::PLAYER,
        ));
        let mut world = WorldState::new(7);
        world.add_region(region);

        assert_eq!(world.home_region, Some(RegionId(1)));
        assert_eq!(world.allocate_entity_id(), EntityId(42));
        assert_eq!(world.allocate_entity_id(), EntityId(43));
    }

    #[test]
    fn allocator_recovers_after_deserialized_state() {
        let mut region = RegionState::new(RegionId(1), "home", 8, 8);
        region.agents.push(AgentState::new(
            EntityId(9),
            region.coordinate(1, 1),
            FactionId::PLAYER,
        ));
        let mut world = WorldState {
            regions: vec![region],
            ..WorldState::default()
        };
        assert_eq!(world.allocate_entity_id(), EntityId(10));
    }

    #[test]
    fn allocator_sees_objects_pushed_after_first_allocation() {
        let mut world = WorldState::new(3);
        world.add_region(RegionState::new(RegionId(1), "home", 8, 8));
        assert_eq!(world.allocate_entity_id(), EntityId(1));

        let home = world.region_mut(RegionId(1)).unwrap();
        let position = home.coordinate(2, 2);
        home.agents
            .push(AgentState::new(EntityId(5), position, FactionId::PLAYER));
        assert_eq!(world.allocate_entity_id(), EntityId(6));
    }
}
