use crate::state::{Coordinate, EntityId, ItemInstance, RegionId};

/// Primary way an order reached the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeliveryMethod {
    Container,
    AerialDrop,
    AgentInventory,
    AgentEquipped,
    AgentWorn,
    AgentSpawn,
}

/// Stacks stored in one container.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerDelivery {
    pub container: EntityId,
    pub position: Coordinate,
    pub items: Vec<ItemInstance>,
}

/// A stack handed straight to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectPlacement {
    pub agent: EntityId,
    pub method: DeliveryMethod,
    pub item: ItemInstance,
}

/// Everything one fulfillment call did, enough to invoice and refund exactly.
///
/// Immutable once returned.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryResult {
    pub method: DeliveryMethod,
    /// Final resolved coordinate (drop spot, first container, agent, or spawn cell).
    pub position: Coordinate,
    /// Region the order was originally aimed at, when it was redirected to the surface.
    pub redirected_from: Option<RegionId>,
    pub containers: Vec<ContainerDelivery>,
    pub freight: Vec<ItemInstance>,
    pub direct: Vec<DirectPlacement>,
    pub spawned: Vec<EntityId>,
    /// Stacks that could not be placed anywhere; the caller should refund these.
    pub undelivered: Vec<ItemInstance>,
}

impl DeliveryResult {
    pub(crate) fn new(method: DeliveryMethod, position: Coordinate) -> Self {
        Self {
            method,
            position,
            redirected_from: None,
            containers: Vec::new(),
            freight: Vec::new(),
            direct: Vec::new(),
            spawned: Vec::new(),
            undelivered: Vec::new(),
        }
    }

    pub fn region(&self) -> RegionId {
        self.position.region
    }

    pub fn container_units(&self) -> u64 {
        self.containers
            .iter()
            .flat_map(|delivery| delivery.items.iter())
            .map(|item| u64::from(item.count))
            .sum()
    }

    pub fn freight_units(&self) -> u64 {
        units(&self.freight)
    }

    pub fn direct_units(&self) -> u64 {
        self.direct.iter().map(|placement| u64::from(placement.item.count)).sum()
    }

    /// Units that landed anywhere, spawned agents included.
    pub fn delivered_units(&self) -> u64 {
        self.container_units() + self.freight_units() + self.direct_units() + self.spawned.len() as u64
    }

    pub fn undelivered_units(&self) -> u64 {
        units(&self.undelivered)
    }

    pub fn is_complete(&self) -> bool {
        self.undelivered.is_empty()
    }

    /// Records a container insert, grouping stacks per container.
    pub(crate) fn record_container(&mut self, container: EntityId, position: Coordinate, item: ItemInstance) {
        match self.containers.iter_mut().find(|d| d.container == container) {
            Some(delivery) => delivery.items.push(item),
            None => self.containers.push(ContainerDelivery {
                container,
                position,
                items: vec![item],
            }),
        }
    }
}

fn units(items: &[ItemInstance]) -> u64 {
    items.iter().map(|item| u64::from(item.count)).sum()
}
