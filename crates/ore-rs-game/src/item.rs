//! Item identity and the injected item metadata lookup.
//!
//! Slots only ever store an [`ItemId`] and a quantity. Display data (name,
//! max stack size) comes from an [`ItemLookup`] provider passed in by the
//! caller; nothing here reaches into global game state.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Built-in item table.
const ITEMS_JSON: &str = include_str!("../data/items.json");

/// Identifier of a concrete item instance tracked by the entity system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_max_stack_size() -> u32 {
    64
}

/// Display metadata for an item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemInfo {
    pub id: ItemId,
    /// Human-readable name, e.g. `"Copper Ore"`.
    pub name: String,
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
}

/// Supplies item metadata for a given [`ItemId`].
pub trait ItemLookup {
    fn info(&self, id: ItemId) -> Option<&ItemInfo>;

    fn display_name(&self, id: ItemId) -> Option<&str> {
        self.info(id).map(|info| info.name.as_str())
    }

    fn max_stack_size(&self, id: ItemId) -> Option<u32> {
        self.info(id).map(|info| info.max_stack_size)
    }
}

/// Item metadata table loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    by_id: HashMap<ItemId, ItemInfo>,
}

impl ItemCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(ITEMS_JSON)
    }

    /// Parse a JSON array of `{ "id", "name", "max_stack_size" }` entries.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<ItemInfo> = serde_json::from_str(json)?;
        let mut by_id = HashMap::with_capacity(entries.len());
        for entry in entries {
            if entry.max_stack_size == 0 {
                return Err(CatalogError::ZeroStackSize(entry.id));
            }
            let id = entry.id;
            if by_id.insert(id, entry).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(Self { by_id })
    }

    /// Load a catalog file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl ItemLookup for ItemCatalog {
    fn info(&self, id: ItemId) -> Option<&ItemInfo> {
        self.by_id.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = ItemCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.display_name(ItemId(1)), Some("Dirt"));
        assert_eq!(catalog.max_stack_size(ItemId(7)), Some(1));
    }

    #[test]
    fn unknown_item() {
        let catalog = ItemCatalog::builtin().unwrap();
        assert!(catalog.info(ItemId(9999)).is_none());
        assert!(catalog.display_name(ItemId(9999)).is_none());
    }

    #[test]
    fn max_stack_defaults_to_64() {
        let catalog = ItemCatalog::from_json(r#"[{ "id": 42, "name": "Sand" }]"#).unwrap();
        assert_eq!(catalog.max_stack_size(ItemId(42)), Some(64));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = r#"[{ "id": 1, "name": "A" }, { "id": 1, "name": "B" }]"#;
        assert!(matches!(
            ItemCatalog::from_json(json),
            Err(CatalogError::DuplicateId(ItemId(1)))
        ));
    }

    #[test]
    fn zero_stack_size_rejected() {
        let json = r#"[{ "id": 3, "name": "Ghost", "max_stack_size": 0 }]"#;
        assert!(matches!(
            ItemCatalog::from_json(json),
            Err(CatalogError::ZeroStackSize(ItemId(3)))
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            ItemCatalog::from_json("{not json"),
            Err(CatalogError::Json(_))
        ));
    }
}
