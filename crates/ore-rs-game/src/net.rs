//! Conversions between the game model and inventory packets.

use std::num::TryFromIntError;

use ore_rs_proto::packets::{InventoryContent, InventoryMove, InventorySlot, NetworkSlotItem, WindowKind};

use crate::authority::SlotCorrection;
use crate::inventory::Inventory;
use crate::item::ItemId;
use crate::slot::SlotItem;
use crate::transfer::{InventoryKind, MoveIntent, SlotRef};

impl From<InventoryKind> for WindowKind {
    fn from(kind: InventoryKind) -> Self {
        match kind {
            InventoryKind::Inventory => WindowKind::Inventory,
            InventoryKind::Hotbar => WindowKind::Hotbar,
        }
    }
}

impl From<WindowKind> for InventoryKind {
    fn from(kind: WindowKind) -> Self {
        match kind {
            WindowKind::Inventory => InventoryKind::Inventory,
            WindowKind::Hotbar => InventoryKind::Hotbar,
        }
    }
}

impl From<SlotItem> for NetworkSlotItem {
    fn from(item: SlotItem) -> Self {
        Self {
            item_id: item.id.0,
            quantity: item.quantity,
        }
    }
}

impl From<NetworkSlotItem> for SlotItem {
    fn from(item: NetworkSlotItem) -> Self {
        SlotItem::new(ItemId(item.item_id), item.quantity)
    }
}

impl From<&InventoryMove> for MoveIntent {
    fn from(pkt: &InventoryMove) -> Self {
        MoveIntent::new(
            SlotRef::new(pkt.source_kind.into(), pkt.source_slot as usize),
            SlotRef::new(pkt.dest_kind.into(), pkt.dest_slot as usize),
        )
    }
}

impl TryFrom<&MoveIntent> for InventoryMove {
    type Error = TryFromIntError;

    fn try_from(intent: &MoveIntent) -> Result<Self, Self::Error> {
        Ok(Self {
            source_kind: intent.source.kind.into(),
            source_slot: u32::try_from(intent.source.index)?,
            dest_kind: intent.dest.kind.into(),
            dest_slot: u32::try_from(intent.dest.index)?,
        })
    }
}

impl TryFrom<&SlotCorrection> for InventorySlot {
    type Error = TryFromIntError;

    fn try_from(correction: &SlotCorrection) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: correction.slot.kind.into(),
            slot: u32::try_from(correction.slot.index)?,
            item: correction.contents.map(NetworkSlotItem::from),
        })
    }
}

impl From<&InventorySlot> for SlotCorrection {
    fn from(pkt: &InventorySlot) -> Self {
        SlotCorrection {
            slot: SlotRef::new(pkt.kind.into(), pkt.slot as usize),
            contents: pkt.item.map(SlotItem::from),
        }
    }
}

/// Full snapshot of `inventory` for initial sync or resync.
pub fn content_packet(inventory: &Inventory) -> InventoryContent {
    InventoryContent {
        kind: inventory.kind().into(),
        items: inventory
            .contents()
            .into_iter()
            .map(|c| c.map(NetworkSlotItem::from))
            .collect(),
    }
}

/// Slot contents carried by a snapshot packet.
pub fn content_items(pkt: &InventoryContent) -> Vec<Option<SlotItem>> {
    pkt.items.iter().map(|c| c.map(SlotItem::from)).collect()
}
