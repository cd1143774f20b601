//! Storage containers owned by a region.

use crate::state::types::{Coordinate, EntityId, ItemHandle, ItemInstance};

/// Object classes that can hold item stacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerClass {
    Shelf,
    Crate,
    Stockpile,
    Hopper,
}

/// A world object holding up to `slots` stacks.
///
/// The engine never creates or destroys containers; it only inserts into them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerState {
    pub id: EntityId,
    pub class: ContainerClass,
    pub position: Coordinate,
    /// Maximum number of stacks held at once.
    pub slots: u16,
    /// Optional whitelist of accepted item types; `None` accepts everything.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed: Option<Vec<ItemHandle>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub contents: Vec<ItemInstance>,
    #[cfg_attr(feature = "serde", serde(default = "default_spawned"))]
    pub spawned: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub destroyed: bool,
}

#[cfg(feature = "serde")]
fn default_spawned() -> bool {
    true
}

impl ContainerState {
    pub fn new(id: EntityId, class: ContainerClass, position: Coordinate, slots: u16) -> Self {
        Self {
            id,
            class,
            position,
            slots,
            allowed: None,
            contents: Vec::new(),
            spawned: true,
            destroyed: false,
        }
    }

    #[must_use]
    pub fn with_contents(mut self, contents: Vec<ItemInstance>) -> Self {
        self.contents = contents;
        self
    }

    #[must_use]
    pub fn with_allowed(mut self, allowed: Vec<ItemHandle>) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Live means spawned into the world and not destroyed.
    pub fn is_live(&self) -> bool {
        self.spawned && !self.destroyed
    }

    /// Number of empty stack slots.
    pub fn free_slots(&self) -> u32 {
        u32::from(self.slots).saturating_sub(self.contents.len() as u32)
    }

    pub fn holds_type(&self, item: ItemHandle) -> bool {
        self.contents.iter().any(|stack| stack.item == item)
    }

    fn permits(&self, item: ItemHandle) -> bool {
        self.allowed
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&item))
    }

    /// Units of `item` that fit, counting top-ups of mergeable stacks and fresh slots.
    pub fn room_for(&self, item: &ItemInstance, stack_limit: u32) -> u64 {
        let stack_limit = stack_limit.max(1);
        let merge_room: u64 = self
            .contents
            .iter()
            .filter(|stack| stack.can_merge_with(item))
            .map(|stack| u64::from(stack_limit.saturating_sub(stack.count)))
            .sum();
        merge_room + u64::from(self.free_slots()) * u64::from(stack_limit)
    }

    /// Whether the whole stack can be stored here, merging where possible.
    pub fn accepts(&self, item: &ItemInstance, stack_limit: u32) -> bool {
        self.is_live()
            && item.count > 0
            && self.permits(item.item)
            && self.room_for(item, stack_limit) >= u64::from(item.count)
    }

    /// Stores the stack, topping up mergeable stacks before opening new slots.
    ///
    /// # Errors
    ///
    /// Hands the instance back untouched if [`accepts`](Self::accepts) is false.
    pub fn insert(&mut self, item: ItemInstance, stack_limit: u32) -> Result<(), ItemInstance> {
        if !self.accepts(&item, stack_limit) {
            return Err(item);
        }
        let stack_limit = stack_limit.max(1);
        let mut remaining = item.count;

        for stack in self
            .contents
            .iter_mut()
            .filter(|stack| stack.can_merge_with(&item))
        {
            if remaining == 0 {
                break;
            }
            let moved = remaining.min(stack_limit.saturating_sub(stack.count));
            stack.count += moved;
            remaining -= moved;
        }

        while remaining > 0 {
            let count = remaining.min(stack_limit);
            self.contents.push(ItemInstance { count, ..item });
            remaining -= count;
        }

        Ok(())
    }
}
