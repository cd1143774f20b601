//! Order pricing.
//!
//! Pricing is a pure function of the catalog entry, quantity, quality and
//! material. Lookup failures never fail the purchase; they degrade to the
//! flat `base_price × quantity` rate.

use crate::config::QualityMultipliers;
use crate::env::{CatalogEntry, CatalogOracle, ItemTypeDefinition, validate_material};
use crate::state::{ItemHandle, QualityTier};

/// Computes final prices against a catalog.
pub struct PricingEngine<'a, C: CatalogOracle + ?Sized> {
    catalog: &'a C,
    multipliers: QualityMultipliers,
}

impl<'a, C: CatalogOracle + ?Sized> PricingEngine<'a, C> {
    pub fn new(catalog: &'a C, multipliers: QualityMultipliers) -> Self {
        Self {
            catalog,
            multipliers,
        }
    }

    /// Final integer price for `quantity` units.
    ///
    /// Every unit costs at least 1, so the result is at least 1 and strictly
    /// increases with quantity.
    pub fn price(
        &self,
        entry: &CatalogEntry,
        quantity: u32,
        quality: Option<QualityTier>,
        material: Option<ItemHandle>,
    ) -> u64 {
        match self.unit_price(entry, quality, material) {
            Some(unit) => finalize(unit * f64::from(quantity), quantity),
            None => {
                tracing::debug!(
                    item = %entry.item,
                    "catalog lookup failed; pricing at flat base rate"
                );
                flat_price(entry.base_price, quantity)
            }
        }
    }

    /// Per-unit price before truncation, or `None` when a lookup failed.
    pub fn unit_price(
        &self,
        entry: &CatalogEntry,
        quality: Option<QualityTier>,
        material: Option<ItemHandle>,
    ) -> Option<f64> {
        let definition = self.catalog.definition(entry.item)?;
        let mut unit = f64::from(entry.base_price);

        if let Some(material) = material.filter(|_| definition.requires_material) {
            unit *= self.material_factor(&definition, material)?;
        }
        if let Some(tier) = quality.filter(|_| definition.supports_quality) {
            unit *= self.multipliers.multiplier(tier);
        }
        Some(unit)
    }

    /// Market value of the substance; unknown substances are a lookup failure,
    /// incompatible ones leave the price unscaled.
    fn material_factor(&self, target: &ItemTypeDefinition, material: ItemHandle) -> Option<f64> {
        let substance = self.catalog.definition(material)?;
        if validate_material(self.catalog, target, material).is_err() {
            return Some(1.0);
        }
        let value = substance.market_value;
        Some(if value.is_finite() && value > 0.0 { value } else { 1.0 })
    }
}

fn finalize(total: f64, quantity: u32) -> u64 {
    let truncated = if total.is_finite() && total > 0.0 {
        // `as` saturates at u64::MAX.
        total.trunc() as u64
    } else {
        0
    };
    truncated.max(u64::from(quantity)).max(1)
}

fn flat_price(base_price: u32, quantity: u32) -> u64 {
    (u64::from(base_price) * u64::from(quantity))
        .max(u64::from(quantity))
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{CatalogSnapshot, ItemKind, ItemTypeDefinition, MaterialCategories};
    use strum::IntoEnumIterator;

    const BEER: ItemHandle = ItemHandle(1);
    const SWORD: ItemHandle = ItemHandle(2);
    const STEEL: ItemHandle = ItemHandle(3);
    const JADE: ItemHandle = ItemHandle(4);
    const CLOTH: ItemHandle = ItemHandle(5);

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new()
            .with_item(
                ItemTypeDefinition::new(BEER, "Beer", ItemKind::Goods, 25),
                CatalogEntry::new(BEER, 100),
            )
            .with_item(
                ItemTypeDefinition::new(SWORD, "Longsword", ItemKind::Goods, 1)
                    .with_quality()
                    .made_from(MaterialCategories::METALLIC | MaterialCategories::STONY),
                CatalogEntry::new(SWORD, 100),
            )
            .with_definition(
                ItemTypeDefinition::new(STEEL, "Steel", ItemKind::Material, 75)
                    .with_market_value(1.9)
                    .in_categories(MaterialCategories::METALLIC),
            )
            .with_definition(
                ItemTypeDefinition::new(JADE, "Jade", ItemKind::Material, 75)
                    .with_market_value(5.0)
                    .in_categories(MaterialCategories::STONY),
            )
            .with_definition(
                ItemTypeDefinition::new(CLOTH, "Cloth", ItemKind::Material, 75)
                    .with_market_value(1.5)
                    .in_categories(MaterialCategories::FABRIC),
            )
    }

    fn engine(catalog: &CatalogSnapshot) -> PricingEngine<'_, CatalogSnapshot> {
        PricingEngine::new(catalog, QualityMultipliers::default())
    }

    #[test]
    fn plain_item_scales_with_quantity() {
        let catalog = catalog();
        let entry = catalog.entry(BEER).unwrap();
        assert_eq!(engine(&catalog).price(&entry, 3, None, None), 300);
    }

    #[test]
    fn legendary_quality_multiplies_by_five() {
        let catalog = catalog();
        let entry = catalog.entry(SWORD).unwrap();
        assert_eq!(
            engine(&catalog).price(&entry, 2, Some(QualityTier::Legendary), None),
            1000
        );
    }

    #[test]
    fn pricier_substance_costs_more() {
        let catalog = catalog();
        let engine = engine(&catalog);
        let entry = catalog.entry(SWORD).unwrap();
        let steel = engine.price(&entry, 1, None, Some(STEEL));
        let jade = engine.price(&entry, 1, None, Some(JADE));
        assert_eq!(steel, 190);
        assert_eq!(jade, 500);
    }

    #[test]
    fn incompatible_material_is_ignored() {
        let catalog = catalog();
        let entry = catalog.entry(SWORD).unwrap();
        assert_eq!(engine(&catalog).price(&entry, 1, None, Some(CLOTH)), 100);
    }

    #[test]
    fn quality_on_unsupported_item_is_ignored() {
        let catalog = catalog();
        let entry = catalog.entry(BEER).unwrap();
        assert_eq!(
            engine(&catalog).price(&entry, 1, Some(QualityTier::Legendary), None),
            100
        );
    }

    #[test]
    fn unknown_item_falls_back_to_flat_rate() {
        let catalog = catalog();
        let entry = CatalogEntry::new(ItemHandle(99), 40);
        assert_eq!(
            engine(&catalog).price(&entry, 3, Some(QualityTier::Legendary), Some(STEEL)),
            120
        );
    }

    #[test]
    fn unknown_material_falls_back_to_flat_rate() {
        let catalog = catalog();
        let entry = catalog.entry(SWORD).unwrap();
        assert_eq!(
            engine(&catalog).price(&entry, 2, Some(QualityTier::Legendary), Some(ItemHandle(77))),
            200
        );
    }

    #[test]
    fn degenerate_prices_never_drop_below_one() {
        let catalog = catalog().with_item(
            ItemTypeDefinition::new(ItemHandle(8), "Pebble", ItemKind::Goods, 75).with_quality(),
            CatalogEntry::new(ItemHandle(8), 0),
        );
        let entry = catalog.entry(ItemHandle(8)).unwrap();
        let engine = engine(&catalog);
        assert_eq!(engine.price(&entry, 1, Some(QualityTier::Awful), None), 1);
        assert_eq!(engine.price(&entry, 0, None, None), 1);
    }

    #[test]
    fn price_strictly_increases_with_quantity() {
        let catalog = catalog().with_item(
            ItemTypeDefinition::new(ItemHandle(9), "Candle", ItemKind::Goods, 75).with_quality(),
            CatalogEntry::new(ItemHandle(9), 1),
        );
        let engine = engine(&catalog);
        for id in [ItemHandle(9), SWORD, BEER] {
            let entry = catalog.entry(id).unwrap();
            for tier in QualityTier::iter() {
                let mut previous = engine.price(&entry, 1, Some(tier), None);
                for quantity in 2..60 {
                    let current = engine.price(&entry, quantity, Some(tier), None);
                    assert!(current > previous, "{id} {tier} q={quantity}");
                    previous = current;
                }
            }
        }
    }

    #[test]
    fn price_is_non_decreasing_across_tiers() {
        let catalog = catalog();
        let engine = engine(&catalog);
        let entry = catalog.entry(SWORD).unwrap();
        let prices: Vec<u64> = QualityTier::iter()
            .map(|tier| engine.price(&entry, 3, Some(tier), Some(STEEL)))
            .collect();
        assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]), "{prices:?}");
    }
}
