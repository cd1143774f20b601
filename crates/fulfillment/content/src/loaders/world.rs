//! World snapshot loader.
//!
//! Region grids are stored sparsely: a base terrain and roof fill the whole
//! grid, then per-cell overrides are applied on top. Objects (containers,
//! agents, freight, landmarks) are listed per region.

use std::collections::BTreeSet;
use std::path::Path;

use fulfillment_core::{
    AgentState, ContainerState, FreightDrop, Landmark, RegionId, RegionState, RoofKind, RoomId,
    TerrainKind, WorldState,
};
use ron::extensions::Extensions;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, ron_options};

/// World structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldData {
    pub seed: u64,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub home_region: Option<RegionId>,
    pub regions: Vec<RegionData>,
}

/// One region for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionData {
    pub id: RegionId,
    pub name: String,
    pub dimensions: (u32, u32),
    #[serde(default)]
    pub surface_sibling: Option<RegionId>,
    #[serde(default)]
    pub base_terrain: TerrainKind,
    #[serde(default)]
    pub base_roof: RoofKind,
    #[serde(default)]
    pub terrain: Vec<(i32, i32, TerrainKind)>,
    #[serde(default)]
    pub roofs: Vec<(i32, i32, RoofKind)>,
    #[serde(default)]
    pub fogged: Vec<(i32, i32)>,
    #[serde(default)]
    pub rooms: Vec<(i32, i32, RoomId)>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub containers: Vec<ContainerState>,
    #[serde(default)]
    pub agents: Vec<AgentState>,
    #[serde(default)]
    pub freight: Vec<FreightDrop>,
}

impl RegionData {
    /// Expands the sparse description into a full grid.
    pub fn into_state(self) -> LoadResult<RegionState> {
        let (width, height) = self.dimensions;
        if width == 0 || height == 0 {
            anyhow::bail!("Region {} has empty dimensions", self.id);
        }

        let mut region = RegionState::new(self.id, self.name, width, height);
        for cell in region.cells.iter_mut() {
            cell.terrain = self.base_terrain;
            cell.roof = self.base_roof;
        }

        let id = self.id;
        let out_of_bounds = |x: i32, z: i32| anyhow::anyhow!("Cell ({}, {}) is outside {}", x, z, id);
        for (x, z, terrain) in self.terrain {
            region.cell_mut(x, z).ok_or_else(|| out_of_bounds(x, z))?.terrain = terrain;
        }
        for (x, z, roof) in self.roofs {
            region.cell_mut(x, z).ok_or_else(|| out_of_bounds(x, z))?.roof = roof;
        }
        for (x, z) in self.fogged {
            region.cell_mut(x, z).ok_or_else(|| out_of_bounds(x, z))?.fogged = true;
        }
        for (x, z, room) in self.rooms {
            region.cell_mut(x, z).ok_or_else(|| out_of_bounds(x, z))?.room = Some(room);
        }

        for landmark in &self.landmarks {
            if !region.contains(landmark.x, landmark.z) {
                return Err(out_of_bounds(landmark.x, landmark.z));
            }
        }
        region.landmarks = self.landmarks;

        // Objects listed under a region belong to it, whatever their coordinate says.
        for mut container in self.containers {
            container.position = container.position.in_region(id);
            if !region.contains(container.position.x, container.position.z) {
                return Err(out_of_bounds(container.position.x, container.position.z));
            }
            region.containers.push(container);
        }
        for mut agent in self.agents {
            agent.position = agent.position.in_region(id);
            if !region.contains(agent.position.x, agent.position.z) {
                return Err(out_of_bounds(agent.position.x, agent.position.z));
            }
            region.agents.push(agent);
        }
        for mut drop in self.freight {
            drop.position = drop.position.in_region(id);
            region.freight.push(drop);
        }
        region.surface_sibling = self.surface_sibling;

        Ok(region)
    }

    /// Compresses a region back into base fill plus overrides.
    pub fn from_state(region: &RegionState) -> Self {
        let base_terrain = most_common(region.cells.iter().map(|cell| cell.terrain));
        let base_roof = most_common(region.cells.iter().map(|cell| cell.roof));

        let mut data = Self {
            id: region.id,
            name: region.name.clone(),
            dimensions: (region.width, region.height),
            surface_sibling: region.surface_sibling,
            base_terrain,
            base_roof,
            terrain: Vec::new(),
            roofs: Vec::new(),
            fogged: Vec::new(),
            rooms: Vec::new(),
            landmarks: region.landmarks.clone(),
            containers: region.containers.clone(),
            agents: region.agents.clone(),
            freight: region.freight.clone(),
        };

        for coordinate in region.coordinates() {
            let (x, z) = (coordinate.x, coordinate.z);
            let Some(cell) = region.cell(x, z) else {
                continue;
            };
            if cell.terrain != base_terrain {
                data.terrain.push((x, z, cell.terrain));
            }
            if cell.roof != base_roof {
                data.roofs.push((x, z, cell.roof));
            }
            if cell.fogged {
                data.fogged.push((x, z));
            }
            if let Some(room) = cell.room {
                data.rooms.push((x, z, room));
            }
        }
        data
    }
}

impl WorldData {
    pub fn into_state(self) -> LoadResult<WorldState> {
        let mut world = WorldState::new(self.seed);
        world.nonce = self.nonce;

        let mut region_ids = BTreeSet::new();
        let mut entity_ids = BTreeSet::new();
        for region in self.regions {
            if !region_ids.insert(region.id) {
                anyhow::bail!("Duplicate region {}", region.id);
            }
            let state = region.into_state()?;
            let ids = state
                .containers
                .iter()
                .map(|container| container.id)
                .chain(state.agents.iter().map(|agent| agent.id));
            for id in ids {
                if !entity_ids.insert(id) {
                    anyhow::bail!("Duplicate entity id {}", id);
                }
            }
            world.add_region(state);
        }

        for region in &world.regions {
            match region.surface_sibling {
                Some(sibling) if sibling == region.id => {
                    anyhow::bail!("{} lists itself as its surface sibling", region.id)
                }
                Some(sibling) if !region_ids.contains(&sibling) => {
                    anyhow::bail!("{} has unknown surface sibling {}", region.id, sibling)
                }
                _ => {}
            }
        }

        if let Some(home) = self.home_region {
            if !region_ids.contains(&home) {
                anyhow::bail!("Home region {} does not exist", home);
            }
            world.home_region = Some(home);
        }
        Ok(world)
    }

    pub fn from_state(world: &WorldState) -> Self {
        Self {
            seed: world.seed,
            nonce: world.nonce,
            home_region: world.home_region,
            regions: world.regions.iter().map(RegionData::from_state).collect(),
        }
    }
}

/// Loader for world snapshots from RON files.
pub struct WorldLoader;

impl WorldLoader {
    pub fn load(path: &Path) -> LoadResult<WorldState> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<WorldState> {
        let data: WorldData = ron_options()
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse world RON: {}", e))?;
        let world = data.into_state()?;
        tracing::debug!(regions = world.regions.len(), "world loaded");
        Ok(world)
    }

    /// Serializes the world in the same sparse format [`load`](Self::load) reads.
    pub fn to_ron(world: &WorldState) -> LoadResult<String> {
        let pretty = PrettyConfig::new()
            .depth_limit(4)
            .extensions(Extensions::UNWRAP_NEWTYPES);
        ron_options()
            .to_string_pretty(&WorldData::from_state(world), pretty)
            .map_err(|e| anyhow::anyhow!("Failed to serialize world RON: {}", e))
    }

    pub fn save(path: &Path, world: &WorldState) -> LoadResult<()> {
        let content = Self::to_ron(world)?;
        std::fs::write(path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", path.display(), e))
    }
}

fn most_common<T: Copy + PartialEq + Default>(values: impl Iterator<Item = T>) -> T {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map_or_else(T::default, |(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfillment_core::{ContainerClass, Coordinate, EntityId, LandmarkKind};

    const WORLD: &str = r#"(
        seed: 7,
        home_region: Some(1),
        regions: [
            (
                id: 1,
                name: "Valley",
                dimensions: (20, 10),
                terrain: [(3, 3, Wall), (4, 3, NaturalRock)],
                fogged: [(0, 0)],
                rooms: [(5, 5, 9)],
                landmarks: [(kind: Beacon, x: 10, z: 5)],
                containers: [
                    (id: 50, class: Shelf, position: (x: 2, z: 2, region: 99), slots: 6),
                ],
                agents: [
                    (id: 1, position: (x: 6, z: 6, region: 1), faction: 0, active: true,
                     carry_capacity: 75, can_equip: true, apparel_capacity: 8),
                ],
            ),
            (
                id: 2,
                name: "Caverns",
                dimensions: (10, 10),
                base_terrain: Floor,
                base_roof: ThickNatural,
                surface_sibling: Some(1),
            ),
        ],
    )"#;

    #[test]
    fn expands_sparse_regions() {
        let world = WorldLoader::parse(WORLD).expect("world parses");

        assert_eq!(world.seed, 7);
        assert_eq!(world.home_region, Some(RegionId(1)));

        let valley = world.region(RegionId(1)).expect("valley");
        assert_eq!(valley.cell_count(), 200);
        assert_eq!(valley.cell(3, 3).map(|c| c.terrain), Some(TerrainKind::Wall));
        assert_eq!(valley.cell(0, 0).map(|c| c.fogged), Some(true));
        assert_eq!(valley.cell(5, 5).and_then(|c| c.room), Some(RoomId(9)));
        assert_eq!(
            valley.landmark(LandmarkKind::Beacon),
            Some(Coordinate::new(10, 5, RegionId(1)))
        );
        assert_eq!(valley.containers[0].class, ContainerClass::Shelf);
        assert_eq!(
            valley.containers[0].position.region,
            RegionId(1),
            "container coordinates are normalized to their region"
        );

        let caverns = world.region(RegionId(2)).expect("caverns");
        assert!(caverns.cells.iter().all(|c| c.roof == RoofKind::ThickNatural));
        assert_eq!(caverns.surface_sibling, Some(RegionId(1)));
    }

    #[test]
    fn saved_world_loads_back_identically() {
        let mut world = WorldLoader::parse(WORLD).expect("world parses");
        world.nonce = 12;
        if let Some(region) = world.region_mut(RegionId(1)) {
            region.freight.push(FreightDrop {
                position: Coordinate::new(8, 8, RegionId(1)),
                items: vec![fulfillment_core::ItemInstance::new(
                    fulfillment_core::ItemHandle(4),
                    3,
                )],
            });
        }

        let text = WorldLoader::to_ron(&world).expect("serializes");
        let reloaded = WorldLoader::parse(&text).expect("reloads");

        assert_eq!(reloaded.nonce, 12);
        assert_eq!(reloaded.regions, world.regions);
        assert_eq!(reloaded.agent(EntityId(1)), world.agent(EntityId(1)));
    }

    #[test]
    fn rejects_out_of_bounds_override() {
        let err = WorldLoader::parse(
            r#"(seed: 1, regions: [(id: 1, name: "x", dimensions: (4, 4), terrain: [(9, 9, Wall)])])"#,
        )
        .expect_err("override outside grid");
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn rejects_dangling_sibling() {
        let err = WorldLoader::parse(
            r#"(seed: 1, regions: [(id: 1, name: "x", dimensions: (4, 4), surface_sibling: Some(3))])"#,
        )
        .expect_err("sibling missing");
        assert!(err.to_string().contains("unknown surface sibling"));
    }

    #[test]
    fn rejects_duplicate_entities() {
        let err = WorldLoader::parse(
            r#"(seed: 1, regions: [(id: 1, name: "x", dimensions: (4, 4), containers: [
                (id: 3, class: Crate, position: (x: 0, z: 0, region: 1), slots: 1),
                (id: 3, class: Crate, position: (x: 1, z: 0, region: 1), slots: 1),
            ])])"#,
        )
        .expect_err("duplicate id");
        assert!(err.to_string().contains("Duplicate entity"));
    }
}
