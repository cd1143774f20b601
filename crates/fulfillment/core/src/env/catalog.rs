use crate::error::FulfillmentError;
use crate::state::ItemHandle;

/// Read-only purchasable catalog, loaded once and shared across orders.
pub trait CatalogOracle: Send + Sync {
    fn definition(&self, handle: ItemHandle) -> Option<ItemTypeDefinition>;

    fn entry(&self, handle: ItemHandle) -> Option<CatalogEntry>;

    /// Case-insensitive lookup by item name, for command handlers.
    fn find_by_name(&self, name: &str) -> Option<ItemHandle>;

    /// Returns every listed entry, in handle order.
    fn all_entries(&self) -> Vec<CatalogEntry>;
}

/// Immutable item template.
///
/// # Materials
///
/// For goods, `material_categories` names the substance categories the item
/// may be made from. For `ItemKind::Material` definitions it names the
/// categories the substance belongs to. An item accepts a material when the
/// two sets intersect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTypeDefinition {
    pub handle: ItemHandle,
    pub name: String,
    pub kind: ItemKind,
    pub stack_limit: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires_material: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub supports_quality: bool,
    /// Base market value of one unit.
    pub market_value: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub material_categories: MaterialCategories,
    /// Substance used when an order does not name one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_material: Option<ItemHandle>,
}

impl ItemTypeDefinition {
    pub fn new(handle: ItemHandle, name: impl Into<String>, kind: ItemKind, stack_limit: u32) -> Self {
        Self {
            handle,
            name: name.into(),
            kind,
            stack_limit,
            requires_material: false,
            supports_quality: false,
            market_value: 1.0,
            material_categories: MaterialCategories::empty(),
            default_material: None,
        }
    }

    #[must_use]
    pub fn with_market_value(mut self, market_value: f64) -> Self {
        self.market_value = market_value;
        self
    }

    #[must_use]
    pub fn with_quality(mut self) -> Self {
        self.supports_quality = true;
        self
    }

    /// Marks the item as made from a substance of the given categories.
    #[must_use]
    pub fn made_from(mut self, categories: MaterialCategories) -> Self {
        self.requires_material = true;
        self.material_categories = categories;
        self
    }

    /// Declares the categories a substance belongs to.
    #[must_use]
    pub fn in_categories(mut self, categories: MaterialCategories) -> Self {
        self.material_categories = categories;
        self
    }

    /// Stack limit with the degenerate zero case treated as one.
    pub fn effective_stack_limit(&self) -> u32 {
        self.stack_limit.max(1)
    }

    pub fn is_living_agent(&self) -> bool {
        matches!(self.kind, ItemKind::LivingAgent { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Ordinary goods delivered as stacks.
    Goods,
    /// A substance other items can be made from.
    Material,
    /// Creature or character template; purchases spawn agents.
    LivingAgent { body_size: u8 },
}

bitflags::bitflags! {
    /// Substance categories.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MaterialCategories: u8 {
        const METALLIC = 1 << 0;
        const WOODY    = 1 << 1;
        const STONY    = 1 << 2;
        const FABRIC   = 1 << 3;
        const LEATHERY = 1 << 4;
    }
}

bitflags::bitflags! {
    /// Categorical flags of a catalog entry.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EntryFlags: u8 {
        const EQUIPPABLE = 1 << 0;
        const WEARABLE   = 1 << 1;
        const CONSUMABLE = 1 << 2;
    }
}

/// Purchasable wrapper around an item definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    pub item: ItemHandle,
    /// Per-unit price before quality and material scaling.
    pub base_price: u32,
    /// Maximum units per order; zero means unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub quantity_cap: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_enabled"))]
    pub enabled: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: EntryFlags,
}

#[cfg(feature = "serde")]
fn default_enabled() -> bool {
    true
}

impl CatalogEntry {
    pub fn new(item: ItemHandle, base_price: u32) -> Self {
        Self {
            item,
            base_price,
            quantity_cap: 0,
            enabled: true,
            flags: EntryFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: EntryFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_cap(mut self, quantity_cap: u32) -> Self {
        self.quantity_cap = quantity_cap;
        self
    }

    pub fn is_capped(&self) -> bool {
        self.quantity_cap > 0
    }
}

/// Checks that `material` is a substance the target item may be made from.
///
/// # Errors
///
/// Returns `InvalidMaterial` when the target does not take a material, the
/// material is unknown or not a substance, or the categories do not overlap.
pub fn validate_material<C>(
    catalog: &C,
    target: &ItemTypeDefinition,
    material: ItemHandle,
) -> Result<ItemTypeDefinition, FulfillmentError>
where
    C: CatalogOracle + ?Sized,
{
    let invalid = || FulfillmentError::InvalidMaterial {
        item: target.handle,
        material,
    };
    if !target.requires_material {
        return Err(invalid());
    }
    let substance = catalog.definition(material).ok_or_else(invalid)?;
    let compatible = matches!(substance.kind, ItemKind::Material)
        && substance
            .material_categories
            .intersects(target.material_categories);
    if compatible { Ok(substance) } else { Err(invalid()) }
}

/// Settles which material an order's units are made from.
///
/// Items that take no material resolve to `None`; a requested material on such
/// an item is rejected. Items that require one fall back to their default.
///
/// # Errors
///
/// `InvalidMaterial` or `MaterialRequired`.
pub fn resolve_material<C>(
    catalog: &C,
    target: &ItemTypeDefinition,
    requested: Option<ItemHandle>,
) -> Result<Option<ItemHandle>, FulfillmentError>
where
    C: CatalogOracle + ?Sized,
{
    if !target.requires_material {
        return match requested {
            Some(material) => Err(FulfillmentError::InvalidMaterial {
                item: target.handle,
                material,
            }),
            None => Ok(None),
        };
    }
    let material = requested
        .or(target.default_material)
        .ok_or(FulfillmentError::MaterialRequired(target.handle))?;
    validate_material(catalog, target, material)?;
    Ok(Some(material))
}
