//! Drop and spawn coordinate selection.
//!
//! Both searches are ordered lists of strategies evaluated first-success-wins.
//! The order lives in [`FulfillmentConfig`] so it can be tested and reordered
//! without touching control flow.

use crate::config::FulfillmentConfig;
use crate::env::{RngOracle, compute_seed};
use crate::error::FulfillmentError;
use crate::placement::RegionClassifier;
use crate::placement::search::{nearest_anywhere, nearest_within};
use crate::state::{Coordinate, FactionId, LandmarkKind, RegionState, WorldState};

/// Candidate producers for the general drop spot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropSpotStrategy {
    /// Trade or landing beacon in the region.
    Beacon,
    /// Caravan or staging spot.
    Gathering,
    /// Mean position of available agents loyal to the requester's faction.
    FactionCentroid,
    /// Geometric center; always succeeds.
    RegionCenter,
}

impl DropSpotStrategy {
    pub const DEFAULT_CHAIN: [Self; 4] = [
        Self::Beacon,
        Self::Gathering,
        Self::FactionCentroid,
        Self::RegionCenter,
    ];
}

/// Candidate producers for live-agent spawn positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnSpotStrategy {
    /// Valid cell in the same room as the anchor.
    SameRoom,
    /// Any valid cell near the anchor.
    NearbyWalkable,
    /// Valid cell on the region border, nearest the anchor.
    RegionEdge,
    /// The region's validated drop spot.
    SafeDropSpot,
}

impl SpawnSpotStrategy {
    pub const DEFAULT_CHAIN: [Self; 4] = [
        Self::SameRoom,
        Self::NearbyWalkable,
        Self::RegionEdge,
        Self::SafeDropSpot,
    ];
}

/// Produces candidate coordinates for freight drops and agent spawns.
pub struct SpotFinder<'a, R: RngOracle + ?Sized> {
    config: &'a FulfillmentConfig,
    rng: &'a R,
    classifier: RegionClassifier,
    faction: FactionId,
    seed: u64,
    nonce: u64,
}

impl<'a, R: RngOracle + ?Sized> SpotFinder<'a, R> {
    pub fn new(config: &'a FulfillmentConfig, rng: &'a R, faction: FactionId) -> Self {
        Self {
            config,
            rng,
            classifier: RegionClassifier::new(config.enclosure),
            faction,
            seed: 0,
            nonce: 0,
        }
    }

    /// Seeds the random sampling tier; same seed and nonce give the same cells.
    #[must_use]
    pub fn with_seed(mut self, seed: u64, nonce: u64) -> Self {
        self.seed = seed;
        self.nonce = nonce;
        self
    }

    pub fn classifier(&self) -> &RegionClassifier {
        &self.classifier
    }

    /// Follows at most one enclosed-to-surface redirection.
    ///
    /// The sibling is used only when it exists and is itself open-air, so a
    /// second call on the result never redirects again.
    pub fn surface_of<'w>(&self, world: &'w WorldState, region: &'w RegionState) -> &'w RegionState {
        if !self.classifier.is_enclosed(region) {
            return region;
        }
        let Some(sibling) = region.surface_sibling.and_then(|id| world.region(id)) else {
            return region;
        };
        if self.classifier.is_enclosed(sibling) {
            tracing::debug!(
                from = %region.id,
                sibling = %sibling.id,
                "surface sibling is enclosed too; staying put"
            );
            return region;
        }
        tracing::debug!(from = %region.id, to = %sibling.id, "redirecting to surface region");
        sibling
    }

    /// General-purpose drop spot, redirected to the surface when underground.
    pub fn general_drop_spot(&self, world: &WorldState, region: &RegionState) -> Coordinate {
        self.drop_spot_in(self.surface_of(world, region))
    }

    /// Evaluates the drop chain inside `region` without redirection.
    pub fn drop_spot_in(&self, region: &RegionState) -> Coordinate {
        self.config
            .drop_chain
            .iter()
            .find_map(|strategy| {
                let spot = self.try_drop_strategy(*strategy, region);
                if let Some(spot) = spot {
                    tracing::debug!(region = %region.id, ?strategy, %spot, "drop spot chosen");
                }
                spot
            })
            .unwrap_or_else(|| region.center())
    }

    fn try_drop_strategy(&self, strategy: DropSpotStrategy, region: &RegionState) -> Option<Coordinate> {
        match strategy {
            DropSpotStrategy::Beacon => region.landmark(LandmarkKind::Beacon),
            DropSpotStrategy::Gathering => region.landmark(LandmarkKind::Gathering),
            DropSpotStrategy::FactionCentroid => self.faction_centroid(region),
            DropSpotStrategy::RegionCenter => Some(region.center()),
        }
    }

    /// Mean position of available loyal agents, nudged onto a valid cell.
    fn faction_centroid(&self, region: &RegionState) -> Option<Coordinate> {
        let (count, sum_x, sum_z) = region
            .agents
            .iter()
            .filter(|agent| agent.is_available_for(self.faction) && agent.position.region == region.id)
            .fold((0i64, 0i64, 0i64), |(n, x, z), agent| {
                (n + 1, x + i64::from(agent.position.x), z + i64::from(agent.position.z))
            });
        if count == 0 {
            return None;
        }
        let mean = region.coordinate((sum_x / count) as i32, (sum_z / count) as i32);
        if region.is_valid_drop(mean) {
            return Some(mean);
        }
        nearest_within(region, mean, self.config.centroid_nudge_radius, |_, cell| {
            cell.accepts_drop()
        })
    }

    /// Validated drop spot, redirected to the surface when underground.
    ///
    /// # Errors
    ///
    /// `NoSafePosition` only when no cell of the target region is valid.
    pub fn safe_drop_spot(
        &self,
        world: &WorldState,
        region: &RegionState,
    ) -> Result<Coordinate, FulfillmentError> {
        self.safe_spot_in(self.surface_of(world, region))
    }

    /// Validated drop spot inside `region` without redirection.
    ///
    /// Escalates through the configured search radii, then random interior
    /// samples, then a full scan of the region.
    ///
    /// # Errors
    ///
    /// `NoSafePosition` when no cell satisfies the drop predicate.
    pub fn safe_spot_in(&self, region: &RegionState) -> Result<Coordinate, FulfillmentError> {
        let seed = self.drop_spot_in(region);
        if region.is_valid_drop(seed) {
            return Ok(seed);
        }

        for radius in &self.config.safe_search_radii {
            if let Some(spot) = nearest_within(region, seed, *radius, |_, cell| cell.accepts_drop()) {
                tracing::debug!(region = %region.id, radius, %spot, "safe spot found by radius search");
                return Ok(spot);
            }
        }

        if let Some(spot) = self.random_interior_cell(region) {
            tracing::debug!(region = %region.id, %spot, "safe spot found by random sampling");
            return Ok(spot);
        }

        nearest_anywhere(region, seed, |_, cell| cell.accepts_drop()).ok_or_else(|| {
            tracing::warn!(region = %region.id, "no cell accepts a drop");
            FulfillmentError::NoSafePosition(region.id)
        })
    }

    fn random_interior_cell(&self, region: &RegionState) -> Option<Coordinate> {
        let margin = self.config.edge_margin;
        if region.width <= margin * 2 || region.height <= margin * 2 {
            return None;
        }
        let (max_x, max_z) = (region.width - 1 - margin, region.height - 1 - margin);
        (0..self.config.random_sample_attempts).find_map(|attempt| {
            let x = self.rng.range(self.sample_seed(region, attempt * 2), margin, max_x);
            let z = self.rng.range(self.sample_seed(region, attempt * 2 + 1), margin, max_z);
            let candidate = region.coordinate(x as i32, z as i32);
            region.is_valid_drop(candidate).then_some(candidate)
        })
    }

    fn sample_seed(&self, region: &RegionState, attempt: u32) -> u64 {
        compute_seed(self.seed, self.nonce, region.id.0, attempt)
    }

    /// Spawn position for live agents near `anchor`, inside `region` only.
    ///
    /// # Errors
    ///
    /// `NoSafePosition` when every strategy in the spawn chain comes up empty.
    pub fn spawn_spot(
        &self,
        region: &RegionState,
        anchor: Coordinate,
    ) -> Result<Coordinate, FulfillmentError> {
        self.config
            .spawn_chain
            .iter()
            .find_map(|strategy| {
                let spot = self.try_spawn_strategy(*strategy, region, anchor);
                if let Some(spot) = spot {
                    tracing::debug!(region = %region.id, ?strategy, %spot, "spawn spot chosen");
                }
                spot
            })
            .ok_or(FulfillmentError::NoSafePosition(region.id))
    }

    fn try_spawn_strategy(
        &self,
        strategy: SpawnSpotStrategy,
        region: &RegionState,
        anchor: Coordinate,
    ) -> Option<Coordinate> {
        let radius = self.config.spawn_search_radius;
        match strategy {
            SpawnSpotStrategy::SameRoom => {
                let room = region.cell(anchor.x, anchor.z)?.room?;
                nearest_within(region, anchor, radius, |_, cell| {
                    cell.accepts_drop() && cell.room == Some(room)
                })
            }
            SpawnSpotStrategy::NearbyWalkable => {
                nearest_within(region, anchor, radius, |_, cell| cell.accepts_drop())
            }
            SpawnSpotStrategy::RegionEdge => {
                let margin = self.config.edge_margin.max(1) as i32;
                nearest_anywhere(region, anchor, |candidate, cell| {
                    cell.accepts_drop() && region.is_edge(candidate.x, candidate.z, margin)
                })
            }
            SpawnSpotStrategy::SafeDropSpot => self.safe_spot_in(region).ok(),
        }
    }
}
