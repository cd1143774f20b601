//! In-memory catalog backing [`CatalogOracle`].
//!
//! Loaders build a snapshot once at catalog-load time; it is immutable after
//! that and shared by reference with every order.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CatalogEntry, CatalogOracle, ItemTypeDefinition};
use crate::state::ItemHandle;

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogSnapshot {
    definitions: BTreeMap<ItemHandle, ItemTypeDefinition>,
    entries: BTreeMap<ItemHandle, CatalogEntry>,
    /// Lowercased names, computed once so lookups never rebuild a keyword set.
    #[cfg_attr(feature = "serde", serde(skip))]
    names: BTreeMap<String, ItemHandle>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from loaded definitions and entries.
    ///
    /// Definitions without an entry are still resolvable (e.g. materials that
    /// are not sold on their own).
    pub fn from_parts(
        definitions: impl IntoIterator<Item = ItemTypeDefinition>,
        entries: impl IntoIterator<Item = CatalogEntry>,
    ) -> Self {
        let mut snapshot = Self::new();
        for definition in definitions {
            snapshot.insert_definition(definition);
        }
        for entry in entries {
            snapshot.entries.insert(entry.item, entry);
        }
        snapshot
    }

    #[must_use]
    pub fn with_item(mut self, definition: ItemTypeDefinition, entry: CatalogEntry) -> Self {
        self.entries.insert(entry.item, entry);
        self.insert_definition(definition);
        self
    }

    #[must_use]
    pub fn with_definition(mut self, definition: ItemTypeDefinition) -> Self {
        self.insert_definition(definition);
        self
    }

    fn insert_definition(&mut self, definition: ItemTypeDefinition) {
        self.names
            .insert(definition.name.to_lowercase(), definition.handle);
        self.definitions.insert(definition.handle, definition);
    }

    /// Replaces an entry; used by configuration editors.
    pub fn set_entry(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.item, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogOracle for CatalogSnapshot {
    fn definition(&self, handle: ItemHandle) -> Option<ItemTypeDefinition> {
        self.definitions.get(&handle).cloned()
    }

    fn entry(&self, handle: ItemHandle) -> Option<CatalogEntry> {
        self.entries.get(&handle).copied()
    }

    fn find_by_name(&self, name: &str) -> Option<ItemHandle> {
        if let Some(handle) = self.names.get(&name.to_lowercase()) {
            return Some(*handle);
        }
        // Deserialized snapshots skip the name index.
        self.definitions
            .values()
            .find(|definition| definition.name.eq_ignore_ascii_case(name))
            .map(|definition| definition.handle)
    }

    fn all_entries(&self) -> Vec<CatalogEntry> {
        self.entries.values().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ItemKind;

    #[test]
    fn finds_items_by_name_ignoring_case() {
        let catalog = CatalogSnapshot::new().with_item(
            ItemTypeDefinition::new(ItemHandle(5), "Packaged Meal", ItemKind::Goods, 10),
            CatalogEntry::new(ItemHandle(5), 25),
        );
        assert_eq!(catalog.find_by_name("packaged meal"), Some(ItemHandle(5)));
        assert_eq!(catalog.find_by_name("PACKAGED MEAL"), Some(ItemHandle(5)));
        assert_eq!(catalog.find_by_name("meal"), None);
    }

    #[test]
    fn unlisted_definitions_resolve_without_entry() {
        let catalog = CatalogSnapshot::from_parts(
            [ItemTypeDefinition::new(ItemHandle(2), "Steel", ItemKind::Material, 75)],
            [],
        );
        assert!(catalog.definition(ItemHandle(2)).is_some());
        assert!(catalog.entry(ItemHandle(2)).is_none());
        assert!(catalog.is_empty());
    }
}
