//! Concrete item units and the quality ladder.

use std::fmt;

/// Reference to an item type definition stored in the catalog (lookup via `CatalogOracle`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u32);

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// Seven-rank quality ladder, ordered worst to best.
///
/// The derived `Ord` follows declaration order so tiers can be compared for
/// gating (`tier >= QualityTier::Good`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum QualityTier {
    Awful,
    Poor,
    Normal,
    Good,
    Excellent,
    Masterwork,
    Legendary,
}

impl QualityTier {
    /// Zero-based rank, used to index multiplier tables.
    pub const fn rank(self) -> usize {
        self as usize
    }
}

/// A concrete unit or stack created at delivery time.
///
/// `count` is always in `1..=stack_limit` of the referenced definition; the
/// resolver never constructs an empty or oversized stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub item: ItemHandle,
    pub count: u32,
    pub quality: Option<QualityTier>,
    pub material: Option<ItemHandle>,
}

impl ItemInstance {
    pub fn new(item: ItemHandle, count: u32) -> Self {
        Self {
            item,
            count,
            quality: None,
            material: None,
        }
    }

    #[must_use]
    pub fn with_quality(mut self, quality: Option<QualityTier>) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Option<ItemHandle>) -> Self {
        self.material = material;
        self
    }

    /// Two stacks can merge when type, quality and material all agree.
    pub fn can_merge_with(&self, other: &ItemInstance) -> bool {
        self.item == other.item && self.quality == other.quality && self.material == other.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn tiers_are_totally_ordered() {
        let tiers: Vec<_> = QualityTier::iter().collect();
        assert_eq!(tiers.len(), 7);
        assert!(tiers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(QualityTier::Legendary.rank(), 6);
    }

    #[test]
    fn tiers_parse_case_insensitively() {
        assert_eq!(
            QualityTier::from_str("masterwork").unwrap(),
            QualityTier::Masterwork
        );
        assert!(QualityTier::from_str("shiny").is_err());
    }

    #[test]
    fn merge_requires_matching_quality_and_material() {
        let base = ItemInstance::new(ItemHandle(1), 5);
        assert!(base.can_merge_with(&ItemInstance::new(ItemHandle(1), 3)));
        assert!(!base.can_merge_with(
            &ItemInstance::new(ItemHandle(1), 3).with_quality(Some(QualityTier::Good))
        ));
        assert!(!base.can_merge_with(
            &ItemInstance::new(ItemHandle(1), 3).with_material(Some(ItemHandle(9)))
        ));
    }
}
