//! Inventory slot model, change notification and the drag-transfer protocol.

pub mod authority;
pub mod client;
pub mod error;
pub mod inventory;
pub mod item;
pub mod listener;
pub mod net;
pub mod player;
pub mod slot;
pub mod transfer;

pub use authority::{MoveResolution, SlotCorrection};
pub use client::{ClientInventories, DragPayload, MoveIntentDispatcher, SlotDescription};
pub use error::{CatalogError, InventoryError};
pub use inventory::Inventory;
pub use item::{ItemCatalog, ItemId, ItemInfo, ItemLookup};
pub use listener::{ListenerHandle, SlotEvent, SlotEventLog, SlotListener};
pub use player::PlayerInventories;
pub use slot::{Slot, SlotItem};
pub use transfer::{
    AbortReason, InventoryKind, MoveIntent, RejectReason, SlotRef, TransferOutcome, Verdict,
};
