//! Region grid, landmarks and freight drops.

use crate::state::types::{
    AgentState, ContainerState, Coordinate, EntityId, ItemInstance, RegionId, RoomId,
};

/// Canonical terrain classes for region cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Soil,
    Floor,
    Gravel,
    ShallowWater,
    DeepWater,
    /// Constructed wall; impassable but not natural.
    Wall,
    /// Solid natural rock (mountain interior).
    NaturalRock,
}

impl TerrainKind {
    /// Whether an agent can stand on, or freight can land on, this terrain.
    pub fn is_standable(self) -> bool {
        matches!(
            self,
            TerrainKind::Soil | TerrainKind::Floor | TerrainKind::Gravel | TerrainKind::ShallowWater
        )
    }

    pub fn is_natural_rock(self) -> bool {
        matches!(self, TerrainKind::NaturalRock)
    }
}

/// Overhead covering of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoofKind {
    #[default]
    Open,
    Constructed,
    ThinNatural,
    ThickNatural,
}

impl RoofKind {
    /// Natural and thick: the covering that marks cavern-like regions.
    pub fn is_thick_natural(self) -> bool {
        matches!(self, RoofKind::ThickNatural)
    }
}

/// Mutable per-cell data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub terrain: TerrainKind,
    pub roof: RoofKind,
    /// Hidden from the requesting faction (unexplored or fog of war).
    pub fogged: bool,
    pub room: Option<RoomId>,
}

impl Cell {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            roof: RoofKind::Open,
            fogged: false,
            room: None,
        }
    }

    /// Freight and spawned agents may only land on visible, standable, non-rock cells.
    pub fn accepts_drop(&self) -> bool {
        !self.fogged && self.terrain.is_standable() && !self.terrain.is_natural_rock()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LandmarkKind {
    /// Trade or landing beacon.
    Beacon,
    /// Caravan or staging spot.
    Gathering,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Landmark {
    pub kind: LandmarkKind,
    pub x: i32,
    pub z: i32,
}

/// Items that arrived by aerial freight and now rest on the ground.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreightDrop {
    pub position: Coordinate,
    pub items: Vec<ItemInstance>,
}

/// One simulated map with its cell grid and the objects living on it.
///
/// Cells are stored row-major (`z * width + x`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionState {
    pub id: RegionId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Cell>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub landmarks: Vec<Landmark>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub containers: Vec<ContainerState>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub agents: Vec<AgentState>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub freight: Vec<FreightDrop>,
    /// Open-air region reachable from this one (e.g. the surface above a cave layer).
    #[cfg_attr(feature = "serde", serde(default))]
    pub surface_sibling: Option<RegionId>,
}

impl RegionState {
    /// Creates a region filled with open soil.
    pub fn new(id: RegionId, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
            landmarks: Vec::new(),
            containers: Vec::new(),
            agents: Vec::new(),
            freight: Vec::new(),
            surface_sibling: None,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.width as i32 && z < self.height as i32
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        self.contains(x, z)
            .then(|| (z as usize) * (self.width as usize) + x as usize)
    }

    pub fn cell(&self, x: i32, z: i32) -> Option<&Cell> {
        self.index(x, z).and_then(|i| self.cells.get(i))
    }

    pub fn cell_mut(&mut self, x: i32, z: i32) -> Option<&mut Cell> {
        self.index(x, z).and_then(move |i| self.cells.get_mut(i))
    }

    pub fn coordinate(&self, x: i32, z: i32) -> Coordinate {
        Coordinate::new(x, z, self.id)
    }

    /// Geometric center of the grid.
    pub fn center(&self) -> Coordinate {
        self.coordinate(self.width as i32 / 2, self.height as i32 / 2)
    }

    /// True when the cell lies within `margin` cells of the region border.
    pub fn is_edge(&self, x: i32, z: i32, margin: i32) -> bool {
        x < margin
            || z < margin
            || x >= self.width as i32 - margin
            || z >= self.height as i32 - margin
    }

    /// The validity predicate for freight landing and agent spawns.
    ///
    /// Coordinates from another region are never valid here.
    pub fn is_valid_drop(&self, coordinate: Coordinate) -> bool {
        coordinate.region == self.id
            && self
                .cell(coordinate.x, coordinate.z)
                .is_some_and(Cell::accepts_drop)
    }

    /// First landmark of `kind` that lies inside the grid.
    pub fn landmark(&self, kind: LandmarkKind) -> Option<Coordinate> {
        self.landmarks
            .iter()
            .find(|landmark| landmark.kind == kind && self.contains(landmark.x, landmark.z))
            .map(|landmark| self.coordinate(landmark.x, landmark.z))
    }

    pub fn agent(&self, id: EntityId) -> Option<&AgentState> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut AgentState> {
        self.agents.iter_mut().find(|agent| agent.id == id)
    }

    pub fn container_mut(&mut self, id: EntityId) -> Option<&mut ContainerState> {
        self.containers.iter_mut().find(|container| container.id == id)
    }

    /// Iterates every in-bounds coordinate in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height as i32)
            .flat_map(move |z| (0..self.width as i32).map(move |x| self.coordinate(x, z)))
    }
}
