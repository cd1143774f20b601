//! Open-air versus enclosed region classification.

use crate::config::EnclosureThresholds;
use crate::state::RegionState;

/// Decides whether a region counts as enclosed (cavern-like).
///
/// The decision is a single linear pass over the roof grid and is free of
/// side effects, so it can be repeated as often as callers like.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionClassifier {
    thresholds: EnclosureThresholds,
}

impl RegionClassifier {
    pub fn new(thresholds: EnclosureThresholds) -> Self {
        Self { thresholds }
    }

    /// Fraction of cells covered by thick natural roof, in `[0, 1]`.
    pub fn thick_roof_fraction(&self, region: &RegionState) -> f64 {
        let total = region.cell_count();
        if total == 0 {
            return 0.0;
        }
        let covered = region
            .cells
            .iter()
            .filter(|cell| cell.roof.is_thick_natural())
            .count();
        covered as f64 / total as f64
    }

    pub fn is_enclosed(&self, region: &RegionState) -> bool {
        let fraction = self.thick_roof_fraction(region);
        fraction > self.thresholds.high_threshold
            || (fraction > self.thresholds.low_threshold
                && region.cell_count() < self.thresholds.small_region_cells)
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(EnclosureThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RegionId, RoofKind};

    /// Roofs the first `covered` cells of a `width × height` region.
    fn region_with_roof(width: u32, height: u32, covered: usize, roof: RoofKind) -> RegionState {
        let mut region = RegionState::new(RegionId(1), "cave", width, height);
        for cell in region.cells.iter_mut().take(covered) {
            cell.roof = roof;
        }
        region
    }

    #[test]
    fn open_region_is_not_enclosed() {
        let region = region_with_roof(20, 20, 0, RoofKind::ThickNatural);
        assert!(!RegionClassifier::default().is_enclosed(&region));
    }

    #[test]
    fn mostly_thick_roof_is_enclosed() {
        let region = region_with_roof(20, 20, 380, RoofKind::ThickNatural);
        assert!(RegionClassifier::default().is_enclosed(&region));
    }

    #[test]
    fn thin_or_constructed_roofs_do_not_count() {
        let thin = region_with_roof(20, 20, 400, RoofKind::ThinNatural);
        let built = region_with_roof(20, 20, 400, RoofKind::Constructed);
        let classifier = RegionClassifier::default();
        assert!(!classifier.is_enclosed(&thin));
        assert!(!classifier.is_enclosed(&built));
    }

    #[test]
    fn lower_threshold_applies_only_to_small_regions() {
        // 85% coverage: enclosed when small, open when large.
        let small = region_with_roof(20, 20, 340, RoofKind::ThickNatural);
        let large = region_with_roof(200, 100, 17_000, RoofKind::ThickNatural);
        let classifier = RegionClassifier::default();
        assert!(classifier.is_enclosed(&small));
        assert!(!classifier.is_enclosed(&large));
    }

    #[test]
    fn empty_region_is_open() {
        let region = RegionState::new(RegionId(1), "void", 0, 0);
        assert!(!RegionClassifier::default().is_enclosed(&region));
    }
}
