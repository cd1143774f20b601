use std::fmt;

/// Unique identifier for any world object tracked by the engine (agents, containers).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a simulated region (map).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region:{}", self.0)
    }
}

/// Faction an agent is loyal to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactionId(pub u32);

impl FactionId {
    /// Faction controlled by the requesting audience.
    pub const PLAYER: Self = Self(0);
}

/// Enclosed room a cell belongs to; cells outdoors have no room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomId(pub u32);

/// Discrete cell position inside a specific region.
///
/// Coordinates from different regions are never compared by distance; callers
/// must check [`Coordinate::region`] before ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: i32,
    pub z: i32,
    pub region: RegionId,
}

impl Coordinate {
    pub const fn new(x: i32, z: i32, region: RegionId) -> Self {
        Self { x, z, region }
    }

    /// Squared Euclidean distance on the (x, z) plane.
    ///
    /// Saturates instead of overflowing for coordinates far outside any grid.
    pub fn distance_sq(&self, other: &Coordinate) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx.saturating_mul(dx).saturating_add(dz.saturating_mul(dz))
    }

    /// Same cell relocated into another region.
    #[must_use]
    pub const fn in_region(self, region: RegionId) -> Self {
        Self { region, ..self }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) in {}", self.x, self.z, self.region)
    }
}
