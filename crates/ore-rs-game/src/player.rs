//! The pair of inventories a single player owns.

use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::item::ItemId;
use crate::slot::SlotItem;
use crate::transfer::{self, InventoryKind, MoveIntent, SlotRef, TransferOutcome, Verdict};

/// Default number of slots in the main inventory.
pub const DEFAULT_MAIN_CAPACITY: usize = 32;
/// Default number of hotbar slots.
pub const DEFAULT_HOTBAR_CAPACITY: usize = 8;

/// Main inventory plus hotbar, addressed by [`InventoryKind`].
#[derive(Debug)]
pub struct PlayerInventories {
    main: Inventory,
    hotbar: Inventory,
}

impl PlayerInventories {
    pub fn new(main_capacity: usize, hotbar_capacity: usize) -> Self {
        Self {
            main: Inventory::new(InventoryKind::Inventory, main_capacity),
            hotbar: Inventory::new(InventoryKind::Hotbar, hotbar_capacity),
        }
    }

    pub fn get(&self, kind: InventoryKind) -> &Inventory {
        match kind {
            InventoryKind::Inventory => &self.main,
            InventoryKind::Hotbar => &self.hotbar,
        }
    }

    pub fn get_mut(&mut self, kind: InventoryKind) -> &mut Inventory {
        match kind {
            InventoryKind::Inventory => &mut self.main,
            InventoryKind::Hotbar => &mut self.hotbar,
        }
    }

    pub fn main(&self) -> &Inventory {
        &self.main
    }

    pub fn hotbar(&self) -> &Inventory {
        &self.hotbar
    }

    pub fn contents_at(&self, slot: SlotRef) -> Result<Option<SlotItem>, InventoryError> {
        self.get(slot.kind).contents_at(slot.index)
    }

    pub fn validate(&self, intent: &MoveIntent) -> Result<Verdict, InventoryError> {
        transfer::validate(self, intent)
    }

    pub fn transfer(&mut self, intent: &MoveIntent) -> Result<TransferOutcome, InventoryError> {
        transfer::transfer(self, intent)
    }

    /// Every slot holding `id`, main inventory first.
    pub fn locate(&self, id: ItemId) -> Vec<SlotRef> {
        [&self.main, &self.hotbar]
            .into_iter()
            .flat_map(|inv| {
                inv.iter()
                    .filter(move |(_, slot)| slot.item() == Some(id))
                    .map(move |(index, _)| SlotRef::new(inv.kind(), index))
            })
            .collect()
    }

    /// Put an item in the first empty main slot, falling back to the hotbar.
    pub fn insert(&mut self, item: SlotItem) -> Result<Option<SlotRef>, InventoryError> {
        for kind in [InventoryKind::Inventory, InventoryKind::Hotbar] {
            let inv = self.get_mut(kind);
            if let Some(index) = inv.first_empty() {
                inv.set_slot(index, item.id, item.quantity)?;
                return Ok(Some(SlotRef::new(kind, index)));
            }
        }
        Ok(None)
    }
}

impl Default for PlayerInventories {
    fn default() -> Self {
        Self::new(DEFAULT_MAIN_CAPACITY, DEFAULT_HOTBAR_CAPACITY)
    }
}
