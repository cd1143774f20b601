//! Container ranking for a single stack.

use std::cmp::Reverse;

use crate::state::{ContainerClass, ContainerState, Coordinate, ItemInstance, RegionState};

/// Picks the storage container a stack should go into.
///
/// Containers that already hold the item type win over raw proximity, so
/// deliveries consolidate stacks instead of spreading them.
#[derive(Clone, Copy, Debug)]
pub struct ContainerSelector<'a> {
    classes: &'a [ContainerClass],
}

impl<'a> ContainerSelector<'a> {
    pub fn new(classes: &'a [ContainerClass]) -> Self {
        Self { classes }
    }

    /// Best eligible container for `item`, or `None` when freight should be used.
    pub fn best_container_for<'r>(
        &self,
        region: &'r RegionState,
        item: &ItemInstance,
        stack_limit: u32,
        reference: Coordinate,
    ) -> Option<&'r ContainerState> {
        let eligible: Vec<&ContainerState> = region
            .containers
            .iter()
            .filter(|container| self.classes.contains(&container.class))
            .filter(|container| container.is_live() && container.position.region == region.id)
            .filter(|container| container.accepts(item, stack_limit))
            .collect();

        let consolidating = eligible
            .iter()
            .copied()
            .filter(|container| container.holds_type(item.item))
            .min_by_key(|container| (container.position.distance_sq(&reference), container.id));
        if consolidating.is_some() {
            return consolidating;
        }

        eligible.into_iter().min_by_key(|container| {
            (
                container.position.distance_sq(&reference),
                Reverse(container.free_slots()),
                container.id,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, ItemHandle, RegionId};

    const CLASSES: [ContainerClass; 3] = [
        ContainerClass::Shelf,
        ContainerClass::Crate,
        ContainerClass::Stockpile,
    ];

    fn region() -> RegionState {
        RegionState::new(RegionId(1), "base", 30, 30)
    }

    fn shelf(id: u32, region: &RegionState, x: i32, slots: u16) -> ContainerState {
        ContainerState::new(EntityId(id), ContainerClass::Shelf, region.coordinate(x, 0), slots)
    }

    #[test]
    fn merge_preference_overrides_distance() {
        let mut region = region();
        let far = shelf(1, &region, 10, 4).with_contents(vec![ItemInstance::new(ItemHandle(5), 3)]);
        let near = shelf(2, &region, 3, 4);
        region.containers = vec![near, far];

        let item = ItemInstance::new(ItemHandle(5), 4);
        let chosen = ContainerSelector::new(&CLASSES)
            .best_container_for(&region, &item, 20, region.coordinate(0, 0))
            .unwrap();
        assert_eq!(chosen.id, EntityId(1));
    }

    #[test]
    fn equidistant_tie_goes_to_container_holding_the_type() {
        let mut region = region();
        let left = shelf(1, &region, 5, 4);
        let right = ContainerState::new(EntityId(2), ContainerClass::Crate, region.coordinate(0, 5), 4)
            .with_contents(vec![ItemInstance::new(ItemHandle(5), 1)]);
        region.containers = vec![left, right];

        let item = ItemInstance::new(ItemHandle(5), 1);
        let chosen = ContainerSelector::new(&CLASSES)
            .best_container_for(&region, &item, 20, region.coordinate(0, 0))
            .unwrap();
        assert_eq!(chosen.id, EntityId(2));
    }

    #[test]
    fn nearest_wins_then_larger_remaining_capacity() {
        let mut region = region();
        region.containers = vec![
            shelf(1, &region, 8, 10),
            shelf(2, &region, 4, 2),
            ContainerState::new(EntityId(3), ContainerClass::Crate, region.coordinate(0, 4), 6),
        ];
        let item = ItemInstance::new(ItemHandle(9), 1);
        let chosen = ContainerSelector::new(&CLASSES)
            .best_container_for(&region, &item, 20, region.coordinate(0, 0))
            .unwrap();
        assert_eq!(chosen.id, EntityId(3));
    }

    #[test]
    fn skips_full_destroyed_foreign_and_unlisted_classes() {
        let mut region = region();
        let full = shelf(1, &region, 1, 1).with_contents(vec![ItemInstance::new(ItemHandle(2), 1)]);
        let mut destroyed = shelf(2, &region, 2, 4);
        destroyed.destroyed = true;
        let mut unspawned = shelf(3, &region, 3, 4);
        unspawned.spawned = false;
        let foreign = ContainerState::new(
            EntityId(4),
            ContainerClass::Shelf,
            Coordinate::new(4, 0, RegionId(9)),
            4,
        );
        let hopper = ContainerState::new(EntityId(5), ContainerClass::Hopper, region.coordinate(5, 0), 4);
        region.containers = vec![full, destroyed, unspawned, foreign, hopper];

        let item = ItemInstance::new(ItemHandle(1), 1);
        assert!(
            ContainerSelector::new(&CLASSES)
                .best_container_for(&region, &item, 20, region.coordinate(0, 0))
                .is_none()
        );
    }

    #[test]
    fn container_without_room_for_whole_stack_is_skipped() {
        let mut region = region();
        let cramped = shelf(1, &region, 1, 1).with_contents(vec![ItemInstance::new(ItemHandle(1), 15)]);
        let roomy = shelf(2, &region, 20, 2);
        region.containers = vec![cramped, roomy];

        let item = ItemInstance::new(ItemHandle(1), 10);
        let chosen = ContainerSelector::new(&CLASSES)
            .best_container_for(&region, &item, 20, region.coordinate(0, 0))
            .unwrap();
        assert_eq!(chosen.id, EntityId(2));
    }
}
