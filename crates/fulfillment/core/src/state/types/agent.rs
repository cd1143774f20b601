//! Agents (characters and creatures) living in a region.

use arrayvec::ArrayVec;

use crate::config::FulfillmentConfig;
use crate::state::types::{Coordinate, EntityId, FactionId, ItemHandle, ItemInstance};

/// Worn apparel, bounded by [`FulfillmentConfig::MAX_APPAREL_SLOTS`].
pub type Apparel = ArrayVec<ItemInstance, { FulfillmentConfig::MAX_APPAREL_SLOTS }>;

/// Reason an agent refused a direct placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementRefusal {
    #[error("agent cannot use equipment")]
    Incapable,
    #[error("equipment slot already occupied")]
    SlotOccupied,
    #[error("carry or apparel capacity exceeded")]
    CapacityExceeded,
    #[error("item is incompatible with this placement")]
    Incompatible,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub id: EntityId,
    pub position: Coordinate,
    pub faction: FactionId,
    /// Catalog template this agent was spawned from, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub template: Option<ItemHandle>,
    pub active: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub injured: bool,
    /// Total units the agent can carry across all stacks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub carry_capacity: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub carried: Vec<ItemInstance>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipped: Option<ItemInstance>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_equip: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub apparel: Apparel,
    #[cfg_attr(feature = "serde", serde(default))]
    pub apparel_capacity: u8,
}

impl AgentState {
    /// A humanoid agent able to equip, wear and carry.
    pub fn new(id: EntityId, position: Coordinate, faction: FactionId) -> Self {
        Self {
            id,
            position,
            faction,
            template: None,
            active: true,
            injured: false,
            carry_capacity: 75,
            carried: Vec::new(),
            equipped: None,
            can_equip: true,
            apparel: Apparel::new(),
            apparel_capacity: FulfillmentConfig::MAX_APPAREL_SLOTS as u8,
        }
    }

    /// A freshly spawned creature: no equipment, nothing carried.
    pub fn spawned(
        id: EntityId,
        position: Coordinate,
        faction: FactionId,
        template: ItemHandle,
    ) -> Self {
        Self {
            template: Some(template),
            carry_capacity: 0,
            can_equip: false,
            apparel_capacity: 0,
            ..Self::new(id, position, faction)
        }
    }

    /// Active, uninjured, and loyal to `faction`.
    pub fn is_available_for(&self, faction: FactionId) -> bool {
        self.active && !self.injured && self.faction == faction
    }

    pub fn carried_units(&self) -> u64 {
        self.carried.iter().map(|stack| u64::from(stack.count)).sum()
    }

    /// Places a single unit into the primary equipment slot.
    pub fn equip(&mut self, item: ItemInstance) -> Result<(), PlacementRefusal> {
        if !self.can_equip {
            return Err(PlacementRefusal::Incapable);
        }
        if item.count != 1 {
            return Err(PlacementRefusal::Incompatible);
        }
        if self.equipped.is_some() {
            return Err(PlacementRefusal::SlotOccupied);
        }
        self.equipped = Some(item);
        Ok(())
    }

    /// Puts on a single apparel piece; one piece per item type.
    pub fn wear(&mut self, item: ItemInstance) -> Result<(), PlacementRefusal> {
        if item.count != 1 {
            return Err(PlacementRefusal::Incompatible);
        }
        if self.apparel.iter().any(|worn| worn.item == item.item) {
            return Err(PlacementRefusal::SlotOccupied);
        }
        if self.apparel.len() >= usize::from(self.apparel_capacity) {
            return Err(PlacementRefusal::CapacityExceeded);
        }
        self.apparel
            .try_push(item)
            .map_err(|_| PlacementRefusal::CapacityExceeded)
    }

    /// Adds the stack to the carried inventory, merging with an identical stack.
    pub fn carry(&mut self, item: ItemInstance, stack_limit: u32) -> Result<(), PlacementRefusal> {
        if self.carried_units() + u64::from(item.count) > u64::from(self.carry_capacity) {
            return Err(PlacementRefusal::CapacityExceeded);
        }
        let stack_limit = stack_limit.max(1);
        let mut remaining = item.count;
        for stack in self.carried.iter_mut().filter(|s| s.can_merge_with(&item)) {
            let moved = remaining.min(stack_limit.saturating_sub(stack.count));
            stack.count += moved;
            remaining -= moved;
        }
        if remaining > 0 {
            self.carried.push(ItemInstance {
                count: remaining,
                ..item
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::RegionId;

    fn agent() -> AgentState {
        AgentState::new(
            EntityId(1),
            Coordinate::new(5, 5, RegionId(1)),
            FactionId::PLAYER,
        )
    }

    #[test]
    fn equip_refuses_occupied_slot() {
        let mut agent = agent();
        agent.equip(ItemInstance::new(ItemHandle(1), 1)).unwrap();
        assert_eq!(
            agent.equip(ItemInstance::new(ItemHandle(2), 1)),
            Err(PlacementRefusal::SlotOccupied)
        );
    }

    #[test]
    fn wear_refuses_duplicates_and_overflow() {
        let mut agent = agent();
        agent.apparel_capacity = 1;
        agent.wear(ItemInstance::new(ItemHandle(4), 1)).unwrap();
        assert_eq!(
            agent.wear(ItemInstance::new(ItemHandle(4), 1)),
            Err(PlacementRefusal::SlotOccupied)
        );
        assert_eq!(
            agent.wear(ItemInstance::new(ItemHandle(5), 1)),
            Err(PlacementRefusal::CapacityExceeded)
        );
    }

    #[test]
    fn carry_respects_unit_capacity() {
        let mut agent = agent();
        agent.carry_capacity = 10;
        agent.carry(ItemInstance::new(ItemHandle(1), 6), 20).unwrap();
        agent.carry(ItemInstance::new(ItemHandle(1), 4), 20).unwrap();
        assert_eq!(agent.carried.len(), 1);
        assert_eq!(agent.carried_units(), 10);
        assert_eq!(
            agent.carry(ItemInstance::new(ItemHandle(1), 1), 20),
            Err(PlacementRefusal::CapacityExceeded)
        );
    }

    #[test]
    fn spawned_creatures_cannot_equip() {
        let mut creature = AgentState::spawned(
            EntityId(9),
            Coordinate::new(0, 0, RegionId(1)),
            FactionId::PLAYER,
            ItemHandle(50),
        );
        assert_eq!(
            creature.equip(ItemInstance::new(ItemHandle(1), 1)),
            Err(PlacementRefusal::Incapable)
        );
    }
}
