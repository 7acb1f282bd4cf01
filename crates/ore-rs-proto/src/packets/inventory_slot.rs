//! InventorySlot (0x02) — Server → Client.
//!
//! Authoritative contents of a single slot. The client overwrites its local
//! prediction with it.

use bytes::{Buf, BufMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::packets::slot_item::{read_slot, write_slot, NetworkSlotItem, WindowKind};
use crate::types::VarUInt32;

/// Update a single inventory slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySlot {
    /// Which inventory the slot belongs to.
    pub kind: WindowKind,
    /// Slot index within that inventory.
    pub slot: u32,
    /// The slot contents; `None` clears it.
    pub item: Option<NetworkSlotItem>,
}

impl ProtoEncode for InventorySlot {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        self.kind.proto_encode(buf);
        VarUInt32(self.slot).proto_encode(buf);
        write_slot(buf, &self.item);
    }
}

impl ProtoDecode for InventorySlot {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let kind = WindowKind::proto_decode(buf)?;
        let slot = VarUInt32::proto_decode(buf)?.0;
        let item = read_slot(buf)?;
        Ok(Self { kind, slot, item })
    }
}
