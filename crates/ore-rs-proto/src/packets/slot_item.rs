//! Shared wire types for inventory packets: window kind and slot contents.

use bytes::{Buf, BufMut};

use crate::codec::{read_u8, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::VarUInt32;

/// Which of the player's inventories a slot index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// The main inventory.
    Inventory,
    /// The quick-access hotbar.
    Hotbar,
}

impl WindowKind {
    pub fn to_byte(self) -> u8 {
        match self {
            WindowKind::Inventory => 0,
            WindowKind::Hotbar => 1,
        }
    }

    pub fn from_byte(b: u8) -> Result<Self, ProtoError> {
        match b {
            0 => Ok(WindowKind::Inventory),
            1 => Ok(WindowKind::Hotbar),
            other => Err(ProtoError::UnknownWindowKind(other)),
        }
    }
}

impl ProtoEncode for WindowKind {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.to_byte());
    }
}

impl ProtoDecode for WindowKind {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Self::from_byte(read_u8(buf)?)
    }
}

/// An occupied slot on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkSlotItem {
    pub item_id: u32,
    pub quantity: u32,
}

/// Write optional slot contents.
///
/// Wire format:
/// ```text
/// u8(has_item)
/// if has_item: VarUInt32(item_id) VarUInt32(quantity)
/// ```
pub fn write_slot(buf: &mut impl BufMut, slot: &Option<NetworkSlotItem>) {
    match slot {
        Some(item) => {
            buf.put_u8(1);
            VarUInt32(item.item_id).proto_encode(buf);
            VarUInt32(item.quantity).proto_encode(buf);
        }
        None => buf.put_u8(0),
    }
}

/// Read optional slot contents. An occupied slot with quantity 0 is invalid.
pub fn read_slot(buf: &mut impl Buf) -> Result<Option<NetworkSlotItem>, ProtoError> {
    match read_u8(buf)? {
        0 => Ok(None),
        1 => {
            let item_id = VarUInt32::proto_decode(buf)?.0;
            let quantity = VarUInt32::proto_decode(buf)?.0;
            if quantity == 0 {
                return Err(ProtoError::InvalidData(format!(
                    "item {item_id} with zero quantity"
                )));
            }
            Ok(Some(NetworkSlotItem { item_id, quantity }))
        }
        other => Err(ProtoError::InvalidData(format!(
            "bad slot presence flag {other}"
        ))),
    }
}
