//! Fulfillment tuning.
//!
//! Compile-time bounds live as associated constants on [`FulfillmentConfig`];
//! everything else is runtime-tunable and loaded from `config.toml` by the
//! content crate. [`FulfillmentConfig::validate`] must pass before the engine
//! uses a loaded config.

use crate::error::{EngineError, ErrorSeverity};
use crate::placement::{DropSpotStrategy, SpawnSpotStrategy};
use crate::state::{ContainerClass, QualityTier};

/// Fulfillment tuning constants and runtime-tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FulfillmentConfig {
    /// Price multiplier per quality tier, worst to best.
    pub quality_multipliers: QualityMultipliers,
    /// Thresholds used by the region classifier.
    pub enclosure: EnclosureThresholds,
    /// Radius used to nudge the faction centroid onto a standable cell.
    pub centroid_nudge_radius: u32,
    /// Escalating radii searched around the general drop spot.
    pub safe_search_radii: Vec<u32>,
    /// Random interior cells tried after the radius search gives up.
    pub random_sample_attempts: u32,
    /// Cells within this distance of the border count as edge cells.
    pub edge_margin: u32,
    /// Radius searched around the requester when spawning agents.
    pub spawn_search_radius: u32,
    /// Object classes the container selector considers.
    pub container_classes: Vec<ContainerClass>,
    /// Ordered strategies for the general drop spot.
    pub drop_chain: Vec<DropSpotStrategy>,
    /// Ordered strategies for live-agent spawn positions.
    pub spawn_chain: Vec<SpawnSpotStrategy>,
}

impl FulfillmentConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum apparel pieces any agent can wear.
    pub const MAX_APPAREL_SLOTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CENTROID_NUDGE_RADIUS: u32 = 20;
    pub const DEFAULT_SAFE_SEARCH_RADII: [u32; 3] = [15, 30, 50];
    pub const DEFAULT_RANDOM_SAMPLE_ATTEMPTS: u32 = 200;
    pub const DEFAULT_EDGE_MARGIN: u32 = 1;
    pub const DEFAULT_SPAWN_SEARCH_RADIUS: u32 = 12;

    pub fn new() -> Self {
        Self {
            quality_multipliers: QualityMultipliers::default(),
            enclosure: EnclosureThresholds::default(),
            centroid_nudge_radius: Self::DEFAULT_CENTROID_NUDGE_RADIUS,
            safe_search_radii: Self::DEFAULT_SAFE_SEARCH_RADII.to_vec(),
            random_sample_attempts: Self::DEFAULT_RANDOM_SAMPLE_ATTEMPTS,
            edge_margin: Self::DEFAULT_EDGE_MARGIN,
            spawn_search_radius: Self::DEFAULT_SPAWN_SEARCH_RADIUS,
            container_classes: vec![
                ContainerClass::Shelf,
                ContainerClass::Crate,
                ContainerClass::Stockpile,
            ],
            drop_chain: DropSpotStrategy::DEFAULT_CHAIN.to_vec(),
            spawn_chain: SpawnSpotStrategy::DEFAULT_CHAIN.to_vec(),
        }
    }

    /// Checks invariants that the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quality_multipliers.validate()?;
        self.enclosure.validate()?;
        if self.safe_search_radii.is_empty() {
            return Err(ConfigError::EmptyList("safe_search_radii"));
        }
        if self.drop_chain.is_empty() {
            return Err(ConfigError::EmptyList("drop_chain"));
        }
        if self.spawn_chain.is_empty() {
            return Err(ConfigError::EmptyList("spawn_chain"));
        }
        if self.container_classes.is_empty() {
            return Err(ConfigError::EmptyList("container_classes"));
        }
        Ok(())
    }
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Price multipliers indexed by [`QualityTier::rank`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct QualityMultipliers(pub [f64; 7]);

impl QualityMultipliers {
    pub const DEFAULT: Self = Self([0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 5.0]);

    pub fn multiplier(&self, tier: QualityTier) -> f64 {
        self.0[tier.rank()]
    }

    /// Multipliers must be positive and non-decreasing so better tiers never cost less.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(&value) = self.0.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(ConfigError::NonPositiveMultiplier(value));
        }
        if self.0.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ConfigError::DescendingMultipliers);
        }
        Ok(())
    }
}

impl Default for QualityMultipliers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Heuristic thresholds separating open-air regions from cavern-like ones.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnclosureThresholds {
    /// Thick natural roof fraction above which any region is enclosed.
    pub high_threshold: f64,
    /// Lower fraction that suffices for small regions.
    pub low_threshold: f64,
    /// Regions with fewer cells than this count as small.
    pub small_region_cells: usize,
}

impl EnclosureThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("high_threshold", self.high_threshold),
            ("low_threshold", self.low_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.low_threshold > self.high_threshold {
            return Err(ConfigError::InvertedThresholds);
        }
        Ok(())
    }
}

impl Default for EnclosureThresholds {
    fn default() -> Self {
        Self {
            high_threshold: 0.92,
            low_threshold: 0.80,
            small_region_cells: 10_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("quality multiplier {0} must be positive and finite")]
    NonPositiveMultiplier(f64),

    #[error("quality multipliers must not decrease with rank")]
    DescendingMultipliers,

    #[error("{name} = {value} must lie in (0, 1]")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("low enclosure threshold exceeds the high threshold")]
    InvertedThresholds,

    #[error("{0} must not be empty")]
    EmptyList(&'static str),
}

impl EngineError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveMultiplier(_) => "CONFIG_NON_POSITIVE_MULTIPLIER",
            Self::DescendingMultipliers => "CONFIG_DESCENDING_MULTIPLIERS",
            Self::ThresholdOutOfRange { .. } => "CONFIG_THRESHOLD_OUT_OF_RANGE",
            Self::InvertedThresholds => "CONFIG_INVERTED_THRESHOLDS",
            Self::EmptyList(_) => "CONFIG_EMPTY_LIST",
        }
    }
}
