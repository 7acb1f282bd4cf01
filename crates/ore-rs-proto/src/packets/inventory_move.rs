//! InventoryMove (0x01) — Client → Server.
//!
//! Sent after the client has optimistically moved an item from one slot to an
//! empty slot. The server re-validates the move against its own state.

use bytes::{Buf, BufMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::packets::slot_item::WindowKind;
use crate::types::VarUInt32;

/// A requested slot-to-slot move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryMove {
    pub source_kind: WindowKind,
    pub source_slot: u32,
    pub dest_kind: WindowKind,
    pub dest_slot: u32,
}

impl ProtoEncode for InventoryMove {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        self.source_kind.proto_encode(buf);
        VarUInt32(self.source_slot).proto_encode(buf);
        self.dest_kind.proto_encode(buf);
        VarUInt32(self.dest_slot).proto_encode(buf);
    }
}

impl ProtoDecode for InventoryMove {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let source_kind = WindowKind::proto_decode(buf)?;
        let source_slot = VarUInt32::proto_decode(buf)?.0;
        let dest_kind = WindowKind::proto_decode(buf)?;
        let dest_slot = VarUInt32::proto_decode(buf)?.0;
        Ok(Self {
            source_kind,
            source_slot,
            dest_kind,
            dest_slot,
        })
    }
}
