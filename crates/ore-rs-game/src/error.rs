//! Inventory and item catalog errors.

use thiserror::Error;

use crate::item::ItemId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("slot index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("slot {index}: an occupied slot needs a quantity above zero")]
    ZeroQuantity { index: usize },

    #[error("slot {index} is empty")]
    SlotEmpty { index: usize },

    #[error("expected {expected} slots, got {got}")]
    CapacityMismatch { expected: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),

    #[error("item {0} has a max stack size of zero")]
    ZeroStackSize(ItemId),
}
