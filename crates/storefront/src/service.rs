//! Quote and purchase flow.

use fulfillment_core::{
    CatalogEntry, CatalogOracle, CatalogSnapshot, DeliveryResolver, DeliveryResult, EngineError,
    Env, FactionId, FulfillmentConfig, ItemHandle, Order, PcgRng, PricingEngine, WorldState,
};
use serde::Serialize;

use crate::config::StorefrontConfig;
use crate::error::PurchaseError;

/// An order that passed catalog gating, with its final price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// The order as it will be fulfilled (quantity may be clamped to the cap).
    pub order: Order,
    pub price: u64,
}

/// Proof of a completed purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub order: Order,
    pub price: u64,
    pub result: DeliveryResult,
}

impl Receipt {
    pub fn units_delivered(&self) -> u64 {
        self.result.delivered_units()
    }

    /// Share of the price covering stacks that were never placed.
    pub fn refund_due(&self) -> u64 {
        let ordered = u64::from(self.order.quantity.max(1));
        let missing = self.result.undelivered_units().min(ordered);
        let refund = u128::from(self.price) * u128::from(missing) / u128::from(ordered);
        // missing <= ordered, so the share never exceeds the price.
        u64::try_from(refund).unwrap_or(self.price)
    }
}

/// One row of the public catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub item: ItemHandle,
    pub name: String,
    pub base_price: u32,
    /// Zero means unlimited.
    pub quantity_cap: u32,
}

/// Validates, prices and fulfills purchases against one catalog.
pub struct Storefront<C: CatalogOracle = CatalogSnapshot> {
    catalog: C,
    config: FulfillmentConfig,
    rng: PcgRng,
    faction: FactionId,
    strict_caps: bool,
}

impl<C: CatalogOracle> Storefront<C> {
    pub fn new(catalog: C, config: FulfillmentConfig) -> Self {
        let defaults = StorefrontConfig::default();
        Self {
            catalog,
            config,
            rng: PcgRng,
            faction: defaults.faction,
            strict_caps: defaults.strict_caps,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: &StorefrontConfig) -> Self {
        self.faction = settings.faction;
        self.strict_caps = settings.strict_caps;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &FulfillmentConfig {
        &self.config
    }

    /// Enabled entries with their item names, in handle order.
    pub fn listings(&self) -> Vec<Listing> {
        self.catalog
            .all_entries()
            .into_iter()
            .filter(|entry| entry.enabled)
            .map(|entry| Listing {
                item: entry.item,
                name: self
                    .catalog
                    .definition(entry.item)
                    .map_or_else(|| entry.item.to_string(), |definition| definition.name),
                base_price: entry.base_price,
                quantity_cap: entry.quantity_cap,
            })
            .collect()
    }

    /// Checks the order against its catalog entry and prices it.
    ///
    /// # Errors
    ///
    /// Unlisted or disabled items, zero quantities, and (with strict caps)
    /// quantities above the entry's cap.
    pub fn quote(&self, order: &Order) -> Result<Quote, PurchaseError> {
        let entry = self
            .catalog
            .entry(order.item)
            .ok_or(PurchaseError::NotListed(order.item))?;
        if !entry.enabled {
            return Err(PurchaseError::Disabled(order.item));
        }
        if order.quantity == 0 {
            return Err(PurchaseError::ZeroQuantity);
        }

        let mut order = *order;
        order.quantity = self.apply_cap(&entry, order.quantity)?;

        let material = order.material.or_else(|| {
            self.catalog
                .definition(order.item)
                .and_then(|definition| definition.default_material)
        });
        let price = PricingEngine::new(&self.catalog, self.config.quality_multipliers).price(
            &entry,
            order.quantity,
            order.quality,
            material,
        );
        Ok(Quote { order, price })
    }

    fn apply_cap(&self, entry: &CatalogEntry, requested: u32) -> Result<u32, PurchaseError> {
        if !entry.is_capped() || requested <= entry.quantity_cap {
            return Ok(requested);
        }
        if self.strict_caps {
            return Err(PurchaseError::QuantityExceedsCap {
                item: entry.item,
                requested,
                cap: entry.quantity_cap,
            });
        }
        tracing::info!(
            item = %entry.item,
            requested,
            cap = entry.quantity_cap,
            "quantity clamped to catalog cap"
        );
        Ok(entry.quantity_cap)
    }

    /// Quotes and fulfills the order, mutating `world`.
    ///
    /// # Errors
    ///
    /// Any [`quote`](Self::quote) rejection, or a fulfillment failure. In both
    /// cases the world is unchanged apart from the order nonce.
    pub fn purchase(&self, world: &mut WorldState, order: &Order) -> Result<Receipt, PurchaseError> {
        let quote = self.quote(order).inspect_err(|error| {
            tracing::info!(item = %order.item, code = error.error_code(), %error, "order rejected");
        })?;

        let resolver = DeliveryResolver::new(Env::new(&self.catalog, &self.rng, &self.config))
            .with_default_faction(self.faction);
        let result = resolver.fulfill(world, &quote.order)?;

        let receipt = Receipt {
            order: quote.order,
            price: quote.price,
            result,
        };
        tracing::info!(
            item = %receipt.order.item,
            quantity = receipt.order.quantity,
            price = receipt.price,
            method = %receipt.result.method,
            refund = receipt.refund_due(),
            "purchase completed"
        );
        Ok(receipt)
    }
}
