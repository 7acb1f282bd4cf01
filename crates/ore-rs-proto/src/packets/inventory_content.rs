//! InventoryContent (0x03) — Server → Client.
//!
//! Sends the full contents of one of the player's inventories.

use bytes::{Buf, BufMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::packets::slot_item::{read_slot, write_slot, NetworkSlotItem, WindowKind};
use crate::types::VarUInt32;

/// Upper bound on the slot count accepted when decoding.
pub const MAX_SLOTS: usize = 1024;

/// Full contents of an inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryContent {
    pub kind: WindowKind,
    /// Every slot in index order.
    pub items: Vec<Option<NetworkSlotItem>>,
}

impl ProtoEncode for InventoryContent {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        self.kind.proto_encode(buf);
        VarUInt32(self.items.len() as u32).proto_encode(buf);
        for item in &self.items {
            write_slot(buf, item);
        }
    }
}

impl ProtoDecode for InventoryContent {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let kind = WindowKind::proto_decode(buf)?;
        let count = VarUInt32::proto_decode(buf)?.0 as usize;
        if count > MAX_SLOTS {
            return Err(ProtoError::InvalidData(format!(
                "inventory content with {count} slots"
            )));
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(read_slot(buf)?);
        }
        Ok(Self { kind, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn encode_then_decode_mixed_slots() {
        let pkt = InventoryContent {
            kind: WindowKind::Hotbar,
            items: vec![
                None,
                Some(NetworkSlotItem {
                    item_id: 7,
                    quantity: 1,
                }),
                None,
            ],
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        assert_eq!(&buf[..], &[1, 3, 0, 1, 7, 1, 0]);

        let decoded = InventoryContent::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, pkt);
    }

    #[test]
    fn decode_missing_slots() {
        // Claims 2 slots, carries 1.
        let data: &[u8] = &[0, 2, 0];
        assert!(InventoryContent::proto_decode(&mut &data[..]).is_err());
    }

    #[test]
    fn largest_content_fits_in_a_frame() {
        let pkt = InventoryContent {
            kind: WindowKind::Inventory,
            items: vec![
                Some(NetworkSlotItem {
                    item_id: u32::MAX,
                    quantity: u32::MAX,
                });
                MAX_SLOTS
            ],
        };
        let frame = crate::frame::encode_packet(crate::packets::id::INVENTORY_CONTENT, &pkt);
        assert!(frame.len() <= crate::frame::MAX_FRAME_LEN);

        let mut decoder = crate::frame::FrameDecoder::default();
        decoder.extend(&frame);
        let mut body = decoder.next_frame().unwrap().unwrap().body;
        assert_eq!(InventoryContent::proto_decode(&mut body).unwrap().items.len(), MAX_SLOTS);
    }

    #[test]
    fn decode_rejects_too_many_slots() {
        let pkt = InventoryContent {
            kind: WindowKind::Inventory,
            items: vec![None; MAX_SLOTS + 1],
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        assert!(matches!(
            InventoryContent::proto_decode(&mut buf.freeze()),
            Err(ProtoError::InvalidData(_))
        ));
    }
}
