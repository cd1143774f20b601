//! Bounded cell scans shared by the spot strategies.

use crate::state::{Cell, Coordinate, RegionState};

/// Nearest in-bounds cell within `radius` of `origin` that satisfies `accept`.
///
/// Ties are broken by (z, x) so results are deterministic.
pub(crate) fn nearest_within<F>(
    region: &RegionState,
    origin: Coordinate,
    radius: u32,
    accept: F,
) -> Option<Coordinate>
where
    F: Fn(Coordinate, &Cell) -> bool,
{
    let r = i64::from(radius);
    let radius_sq = r.saturating_mul(r);
    let (ox, oz) = (i64::from(origin.x), i64::from(origin.z));
    let x_range = (ox - r).max(0)..=(ox + r).min(i64::from(region.width) - 1);
    let z_range = (oz - r).max(0)..=(oz + r).min(i64::from(region.height) - 1);

    // Both ranges are clamped to the grid, so the narrowing casts are lossless.
    z_range
        .flat_map(|z| {
            x_range
                .clone()
                .map(move |x| region.coordinate(x as i32, z as i32))
        })
        .filter(|candidate| candidate.distance_sq(&origin) <= radius_sq)
        .filter(|candidate| {
            region
                .cell(candidate.x, candidate.z)
                .is_some_and(|cell| accept(*candidate, cell))
        })
        .min_by_key(|candidate| (candidate.distance_sq(&origin), candidate.z, candidate.x))
}

/// Nearest cell anywhere in the region that satisfies `accept`.
pub(crate) fn nearest_anywhere<F>(
    region: &RegionState,
    origin: Coordinate,
    accept: F,
) -> Option<Coordinate>
where
    F: Fn(Coordinate, &Cell) -> bool,
{
    region
        .coordinates()
        .filter(|candidate| {
            region
                .cell(candidate.x, candidate.z)
                .is_some_and(|cell| accept(*candidate, cell))
        })
        .min_by_key(|candidate| (candidate.distance_sq(&origin), candidate.z, candidate.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RegionId, TerrainKind};

    #[test]
    fn finds_closest_matching_cell() {
        let mut region = RegionState::new(RegionId(1), "test", 10, 10);
        for cell in region.cells.iter_mut() {
            cell.terrain = TerrainKind::NaturalRock;
        }
        region.cell_mut(7, 5).unwrap().terrain = TerrainKind::Soil;
        region.cell_mut(2, 5).unwrap().terrain = TerrainKind::Soil;

        let origin = region.coordinate(6, 5);
        let found = nearest_within(&region, origin, 3, |_, cell| cell.accepts_drop());
        assert_eq!(found, Some(region.coordinate(7, 5)));

        let none = nearest_within(&region, region.coordinate(0, 0), 1, |_, cell| {
            cell.accepts_drop()
        });
        assert_eq!(none, None);
    }

    #[test]
    fn radius_is_euclidean_not_square() {
        let mut region = RegionState::new(RegionId(1), "test", 10, 10);
        for cell in region.cells.iter_mut() {
            cell.fogged = true;
        }
        region.cell_mut(3, 3).unwrap().fogged = false;
        let origin = region.coordinate(0, 0);
        // (3, 3) is within the 3-cell square but at distance sqrt(18) > 3.
        assert_eq!(
            nearest_within(&region, origin, 3, |_, cell| cell.accepts_drop()),
            None
        );
        assert_eq!(
            nearest_anywhere(&region, origin, |_, cell| cell.accepts_drop()),
            Some(region.coordinate(3, 3))
        );
    }
}
