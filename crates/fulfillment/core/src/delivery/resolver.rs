//! Top-level fulfillment state machine.

use crate::delivery::{
    DeliveryMethod, DeliveryMode, DeliveryResult, DirectPlacement, Order, split_stacks,
};
use crate::env::{CatalogOracle, EntryFlags, Env, ItemTypeDefinition, RngOracle, resolve_material};
use crate::error::{EngineError, FulfillmentError};
use crate::placement::{ContainerSelector, SpotFinder};
use crate::state::{
    AgentState, Coordinate, EntityId, FactionId, FreightDrop, ItemInstance, PlacementRefusal,
    RegionId, WorldState,
};

/// Agent an order is addressed to, resolved once up front.
#[derive(Clone, Copy, Debug)]
struct Requester {
    id: EntityId,
    region: RegionId,
    position: Coordinate,
    faction: FactionId,
}

/// Resolves where and how purchased goods enter the world.
///
/// # Branches
///
/// 1. Living-agent templates spawn agents near the requester.
/// 2. Equip / Wear / Carry orders go straight onto the requester; refused
///    stacks fall through to regular delivery one by one.
/// 3. Regular delivery tries containers per stack, then sends every leftover
///    stack in a single freight drop.
///
/// Regular delivery in an enclosed region is redirected to its open-air
/// sibling before any placement happens.
pub struct DeliveryResolver<'a, C, R>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    env: Env<'a, C, R>,
    default_faction: FactionId,
}

impl<'a, C, R> DeliveryResolver<'a, C, R>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(env: Env<'a, C, R>) -> Self {
        Self {
            env,
            default_faction: FactionId::PLAYER,
        }
    }

    /// Faction that owns orders placed without a requester.
    #[must_use]
    pub fn with_default_faction(mut self, faction: FactionId) -> Self {
        self.default_faction = faction;
        self
    }

    /// Fulfills one paid order against the world.
    ///
    /// On `Ok`, the result lists exactly what landed where; partially placed
    /// orders report leftovers in `undelivered` instead of failing.
    ///
    /// # Errors
    ///
    /// Returned before anything is constructed for invalid orders and missing
    /// regions; `NoSafePosition` when nothing could be placed at all.
    pub fn fulfill(
        &self,
        world: &mut WorldState,
        order: &Order,
    ) -> Result<DeliveryResult, FulfillmentError> {
        let outcome = self.resolve(world, order);
        match &outcome {
            Ok(result) => tracing::info!(
                item = %order.item,
                quantity = order.quantity,
                method = %result.method,
                position = %result.position,
                delivered = result.delivered_units(),
                undelivered = result.undelivered_units(),
                "order fulfilled"
            ),
            Err(error) if error.severity().is_internal() => tracing::error!(
                item = %order.item,
                quantity = order.quantity,
                code = error.error_code(),
                severity = error.severity().as_str(),
                %error,
                "order failed"
            ),
            Err(error) => tracing::warn!(
                item = %order.item,
                quantity = order.quantity,
                code = error.error_code(),
                severity = error.severity().as_str(),
                %error,
                "order failed"
            ),
        }
        outcome
    }

    fn resolve(
        &self,
        world: &mut WorldState,
        order: &Order,
    ) -> Result<DeliveryResult, FulfillmentError> {
        if world.regions.is_empty() {
            return Err(FulfillmentError::NoRegion);
        }
        if order.quantity == 0 {
            return Err(FulfillmentError::EmptyOrder);
        }

        let catalog = self.env.catalog();
        let definition = catalog
            .definition(order.item)
            .ok_or(FulfillmentError::UnknownItem(order.item))?;
        let quality = order.quality.filter(|_| definition.supports_quality);
        let material = resolve_material(catalog, &definition, order.material)?;

        let requester = order
            .requester
            .map(|id| find_requester(world, id).ok_or(FulfillmentError::RequesterNotFound(id)))
            .transpose()?;
        let region = match requester {
            Some(requester) => requester.region,
            None => world
                .home_region
                .or_else(|| world.regions.first().map(|region| region.id))
                .ok_or(FulfillmentError::NoRegion)?,
        };
        if world.region(region).is_none() {
            return Err(FulfillmentError::UnknownRegion(region));
        }

        world.nonce = world.nonce.wrapping_add(1);
        let faction = requester.map_or(self.default_faction, |requester| requester.faction);
        let finder = SpotFinder::new(self.env.config(), self.env.rng(), faction)
            .with_seed(world.seed, world.nonce);

        if definition.is_living_agent() {
            return self.spawn_agents(world, &finder, &definition, order.quantity, region, requester);
        }

        let stack_limit = definition.effective_stack_limit();
        let template = ItemInstance::new(definition.handle, 0)
            .with_quality(quality)
            .with_material(material);
        let instances: Vec<ItemInstance> = split_stacks(order.quantity, stack_limit)
            .into_iter()
            .map(|count| ItemInstance { count, ..template })
            .collect();

        match (direct_method(order.mode), requester) {
            (Some(method), Some(requester)) => {
                let flags = catalog
                    .entry(definition.handle)
                    .map_or(EntryFlags::empty(), |entry| entry.flags);
                self.hand_over(world, &finder, method, flags, instances, stack_limit, requester)
            }
            _ => {
                let reference = requester.map(|requester| requester.position);
                let position = reference.unwrap_or_else(|| {
                    world
                        .region(region)
                        .map_or(Coordinate::new(0, 0, region), |r| r.center())
                });
                let mut result = DeliveryResult::new(DeliveryMethod::AerialDrop, position);
                self.place_regular(world, &finder, instances, stack_limit, region, reference, &mut result)?;
                Ok(result)
            }
        }
    }

    fn spawn_agents(
        &self,
        world: &mut WorldState,
        finder: &SpotFinder<'a, R>,
        definition: &ItemTypeDefinition,
        quantity: u32,
        region: RegionId,
        requester: Option<Requester>,
    ) -> Result<DeliveryResult, FulfillmentError> {
        let spot = {
            let state = world
                .region(region)
                .ok_or(FulfillmentError::UnknownRegion(region))?;
            let anchor = requester
                .map(|requester| requester.position)
                .filter(|position| position.region == region)
                .unwrap_or_else(|| finder.drop_spot_in(state));
            finder.spawn_spot(state, anchor)?
        };
        let faction = requester.map_or(self.default_faction, |requester| requester.faction);

        let mut result = DeliveryResult::new(DeliveryMethod::AgentSpawn, spot);
        for _ in 0..quantity {
            let id = world.allocate_entity_id();
            let state = world
                .region_mut(region)
                .ok_or(FulfillmentError::UnknownRegion(region))?;
            state
                .agents
                .push(AgentState::spawned(id, spot, faction, definition.handle));
            result.spawned.push(id);
        }
        Ok(result)
    }

    #[allow(clippy::too_many_arguments)]
    fn hand_over(
        &self,
        world: &mut WorldState,
        finder: &SpotFinder<'a, R>,
        method: DeliveryMethod,
        flags: EntryFlags,
        instances: Vec<ItemInstance>,
        stack_limit: u32,
        requester: Requester,
    ) -> Result<DeliveryResult, FulfillmentError> {
        let required = match method {
            DeliveryMethod::AgentEquipped => EntryFlags::EQUIPPABLE,
            DeliveryMethod::AgentWorn => EntryFlags::WEARABLE,
            _ => EntryFlags::empty(),
        };

        let mut result = DeliveryResult::new(method, requester.position);
        let mut refused = Vec::new();
        for instance in instances {
            let outcome = if flags.contains(required) {
                match world
                    .region_mut(requester.region)
                    .and_then(|region| region.agent_mut(requester.id))
                {
                    Some(agent) => match method {
                        DeliveryMethod::AgentEquipped => agent.equip(instance),
                        DeliveryMethod::AgentWorn => agent.wear(instance),
                        _ => agent.carry(instance, stack_limit),
                    },
                    None => Err(PlacementRefusal::Incompatible),
                }
            } else {
                Err(PlacementRefusal::Incompatible)
            };

            match outcome {
                Ok(()) => result.direct.push(DirectPlacement {
                    agent: requester.id,
                    method,
                    item: instance,
                }),
                Err(refusal) => {
                    tracing::debug!(
                        agent = %requester.id,
                        item = %instance.item,
                        count = instance.count,
                        %refusal,
                        "direct placement refused; falling back to delivery"
                    );
                    refused.push(instance);
                }
            }
        }

        if !refused.is_empty() {
            self.place_regular(
                world,
                finder,
                refused,
                stack_limit,
                requester.region,
                Some(requester.position),
                &mut result,
            )?;
        }
        if !result.direct.is_empty() {
            result.method = method;
            result.position = requester.position;
        }
        Ok(result)
    }

    /// Containers first, then one freight drop for everything left over.
    ///
    /// Sets `method` and `position` on `result`: freight wins whenever any
    /// stack went by air, even if most units reached containers.
    #[allow(clippy::too_many_arguments)]
    fn place_regular(
        &self,
        world: &mut WorldState,
        finder: &SpotFinder<'a, R>,
        instances: Vec<ItemInstance>,
        stack_limit: u32,
        origin: RegionId,
        reference: Option<Coordinate>,
        result: &mut DeliveryResult,
    ) -> Result<(), FulfillmentError> {
        let (target, reference) = {
            let origin_state = world
                .region(origin)
                .ok_or(FulfillmentError::UnknownRegion(origin))?;
            let target = finder.surface_of(world, origin_state);
            let reference = reference
                .filter(|position| position.region == target.id)
                .unwrap_or_else(|| finder.drop_spot_in(target));
            (target.id, reference)
        };
        if target != origin {
            result.redirected_from = Some(origin);
        }

        let selector = ContainerSelector::new(&self.env.config().container_classes);
        let mut leftovers = Vec::new();
        for instance in instances {
            let choice = world.region(target).and_then(|region| {
                selector
                    .best_container_for(region, &instance, stack_limit, reference)
                    .map(|container| (container.id, container.position))
            });
            let stored = choice.filter(|(id, _)| {
                world
                    .region_mut(target)
                    .and_then(|region| region.container_mut(*id))
                    .is_some_and(|container| container.insert(instance, stack_limit).is_ok())
            });
            match stored {
                Some((id, position)) => result.record_container(id, position, instance),
                None => leftovers.push(instance),
            }
        }

        if !leftovers.is_empty() {
            let spot = world
                .region(origin)
                .ok_or(FulfillmentError::UnknownRegion(origin))
                .and_then(|region| finder.safe_drop_spot(world, region));
            match spot {
                Ok(spot) => {
                    if let Some(region) = world.region_mut(spot.region) {
                        region.freight.push(FreightDrop {
                            position: spot,
                            items: leftovers.clone(),
                        });
                    }
                    result.freight.extend(leftovers);
                    result.position = spot;
                }
                Err(error) if result.containers.is_empty() && result.direct.is_empty() => {
                    return Err(error);
                }
                Err(error) => {
                    tracing::warn!(
                        region = %target,
                        %error,
                        stacks = leftovers.len(),
                        "freight drop impossible; reporting stacks as undelivered"
                    );
                    result.undelivered.extend(leftovers);
                }
            }
        }

        if !result.freight.is_empty() {
            result.method = DeliveryMethod::AerialDrop;
        } else if let Some(first) = result.containers.first() {
            result.method = DeliveryMethod::Container;
            result.position = first.position;
        }
        Ok(())
    }
}

fn direct_method(mode: DeliveryMode) -> Option<DeliveryMethod> {
    match mode {
        DeliveryMode::Deliver => None,
        DeliveryMode::Equip => Some(DeliveryMethod::AgentEquipped),
        DeliveryMode::Wear => Some(DeliveryMethod::AgentWorn),
        DeliveryMode::Carry => Some(DeliveryMethod::AgentInventory),
    }
}

fn find_requester(world: &WorldState, id: EntityId) -> Option<Requester> {
    world.regions.iter().find_map(|region| {
        region.agent(id).map(|agent| Requester {
            id,
            region: region.id,
            position: agent.position.in_region(region.id),
            faction: agent.faction,
        })
    })
}
