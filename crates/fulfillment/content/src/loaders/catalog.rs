//! Purchasable catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use fulfillment_core::{CatalogEntry, CatalogSnapshot, ItemKind, ItemTypeDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, ron_options};

/// Catalog structure for RON files.
///
/// `definitions` lists every item type the world knows, including raw
/// materials that are never sold on their own. `entries` lists what the
/// storefront actually offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub definitions: Vec<ItemTypeDefinition>,
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

impl CatalogData {
    /// Checks cross references between entries and definitions.
    pub fn validate(&self) -> LoadResult<()> {
        let mut handles = BTreeSet::new();
        for definition in &self.definitions {
            if !handles.insert(definition.handle) {
                anyhow::bail!("Duplicate item definition {}", definition.handle);
            }
        }

        for definition in &self.definitions {
            if let Some(material) = definition.default_material {
                let substance = self
                    .definitions
                    .iter()
                    .find(|candidate| candidate.handle == material);
                if !substance.is_some_and(|s| matches!(s.kind, ItemKind::Material)) {
                    anyhow::bail!(
                        "Default material {} of '{}' is not a material definition",
                        material,
                        definition.name
                    );
                }
            }
        }

        let mut listed = BTreeSet::new();
        for entry in &self.entries {
            if !handles.contains(&entry.item) {
                anyhow::bail!("Catalog entry for unknown item {}", entry.item);
            }
            if !listed.insert(entry.item) {
                anyhow::bail!("Duplicate catalog entry for {}", entry.item);
            }
        }
        Ok(())
    }

    pub fn into_snapshot(self) -> CatalogSnapshot {
        CatalogSnapshot::from_parts(self.definitions, self.entries)
    }
}

/// Loader for the purchasable catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and cross-check a catalog, returning the engine snapshot.
    pub fn load(path: &Path) -> LoadResult<CatalogSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CatalogSnapshot> {
        let data: CatalogData = ron_options()
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        data.validate()?;

        let snapshot = data.into_snapshot();
        tracing::debug!(entries = snapshot.len(), "catalog loaded");
        Ok(snapshot)
    }

    /// Returns the definitions and entries without building a snapshot.
    pub fn load_data(path: &Path) -> LoadResult<CatalogData> {
        let content = read_file(path)?;
        ron_options()
            .from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfillment_core::{CatalogOracle, EntryFlags, ItemHandle, MaterialCategories};

    const CATALOG: &str = r#"(
        definitions: [
            (
                handle: 1,
                name: "Steel",
                kind: Material,
                stack_limit: 75,
                market_value: 1.9,
                material_categories: "METALLIC",
            ),
            (
                handle: 10,
                name: "Longsword",
                kind: Goods,
                stack_limit: 1,
                requires_material: true,
                supports_quality: true,
                market_value: 1.0,
                material_categories: "METALLIC",
                default_material: Some(1),
            ),
            (
                handle: 20,
                name: "Husky",
                kind: LivingAgent(body_size: 2),
                stack_limit: 1,
                market_value: 1.0,
            ),
        ],
        entries: [
            (item: 10, base_price: 100, flags: "EQUIPPABLE"),
            (item: 20, base_price: 250, quantity_cap: 3),
        ],
    )"#;

    #[test]
    fn parses_definitions_and_entries() {
        let catalog = CatalogLoader::parse(CATALOG).expect("catalog parses");

        assert_eq!(catalog.len(), 2);
        let sword = catalog.definition(ItemHandle(10)).expect("sword defined");
        assert!(sword.requires_material);
        assert_eq!(sword.material_categories, MaterialCategories::METALLIC);
        assert_eq!(sword.default_material, Some(ItemHandle(1)));

        let entry = catalog.entry(ItemHandle(10)).expect("sword listed");
        assert!(entry.enabled);
        assert_eq!(entry.flags, EntryFlags::EQUIPPABLE);
        assert_eq!(catalog.entry(ItemHandle(20)).map(|e| e.quantity_cap), Some(3));
        assert!(catalog.entry(ItemHandle(1)).is_none(), "steel is not sold");
        assert_eq!(catalog.find_by_name("longsword"), Some(ItemHandle(10)));
    }

    #[test]
    fn rejects_entry_without_definition() {
        let err = CatalogLoader::parse(
            r#"(definitions: [], entries: [(item: 5, base_price: 1)])"#,
        )
        .expect_err("dangling entry");
        assert!(err.to_string().contains("unknown item"));
    }

    #[test]
    fn rejects_non_material_default() {
        let err = CatalogLoader::parse(
            r#"(definitions: [
                (handle: 1, name: "Apple", kind: Goods, stack_limit: 10, market_value: 1.0),
                (handle: 2, name: "Club", kind: Goods, stack_limit: 1, market_value: 1.0,
                 requires_material: true, default_material: Some(1)),
            ])"#,
        )
        .expect_err("apple is not a material");
        assert!(err.to_string().contains("not a material"));
    }
}
