use crate::state::{EntityId, ItemHandle, QualityTier};

/// How the purchaser wants the goods handed over.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum DeliveryMode {
    /// Containers first, aerial freight for the rest.
    #[default]
    Deliver,
    /// Put into the requester's equipment slot.
    Equip,
    /// Put on as apparel.
    Wear,
    /// Add to the requester's carried inventory.
    Carry,
}

/// One paid purchase to fulfill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub item: ItemHandle,
    pub quantity: u32,
    pub quality: Option<QualityTier>,
    pub material: Option<ItemHandle>,
    /// Agent the purchaser is assigned to, if any.
    pub requester: Option<EntityId>,
    pub mode: DeliveryMode,
}

impl Order {
    pub fn new(item: ItemHandle, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            quality: None,
            material: None,
            requester: None,
            mode: DeliveryMode::Deliver,
        }
    }

    #[must_use]
    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = Some(quality);
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: ItemHandle) -> Self {
        self.material = Some(material);
        self
    }

    #[must_use]
    pub fn for_requester(mut self, requester: EntityId) -> Self {
        self.requester = Some(requester);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }
}
