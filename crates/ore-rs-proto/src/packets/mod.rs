//! Inventory packet definitions.

pub mod inventory_content;
pub mod inventory_move;
pub mod inventory_slot;
pub mod slot_item;

pub use inventory_content::{InventoryContent, MAX_SLOTS};
pub use inventory_move::InventoryMove;
pub use inventory_slot::InventorySlot;
pub use slot_item::{NetworkSlotItem, WindowKind};

use bytes::Buf;

use crate::codec::ProtoDecode;
use crate::error::ProtoError;

/// Packet IDs.
pub mod id {
    pub const INVENTORY_MOVE: u32 = 0x01;
    pub const INVENTORY_SLOT: u32 = 0x02;
    pub const INVENTORY_CONTENT: u32 = 0x03;
}

/// Packets a client may send to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerboundPacket {
    InventoryMove(InventoryMove),
}

impl ServerboundPacket {
    /// Decode the body of a frame carrying `packet_id`.
    pub fn decode(packet_id: u32, body: &mut impl Buf) -> Result<Self, ProtoError> {
        match packet_id {
            id::INVENTORY_MOVE => Ok(Self::InventoryMove(InventoryMove::proto_decode(body)?)),
            other => Err(ProtoError::UnknownPacketId(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ProtoEncode;
    use bytes::BytesMut;

    #[test]
    fn decode_inventory_move() {
        let pkt = InventoryMove {
            source_kind: WindowKind::Inventory,
            source_slot: 0,
            dest_kind: WindowKind::Hotbar,
            dest_slot: 3,
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        assert_eq!(
            ServerboundPacket::decode(id::INVENTORY_MOVE, &mut buf.freeze()).unwrap(),
            ServerboundPacket::InventoryMove(pkt)
        );
    }

    #[test]
    fn server_to_client_ids_are_not_serverbound() {
        let mut body: &[u8] = &[];
        assert!(matches!(
            ServerboundPacket::decode(id::INVENTORY_SLOT, &mut body),
            Err(ProtoError::UnknownPacketId(0x02))
        ));
        assert!(matches!(
            ServerboundPacket::decode(0x7F, &mut body),
            Err(ProtoError::UnknownPacketId(0x7F))
        ));
    }
}
