//! Length-prefixed packet framing for a byte stream.
//!
//! Each frame is `VarUInt32(len)` followed by `len` bytes of payload, where the
//! payload is `VarUInt32(packet_id)` plus the packet body.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::{VarIntError, VarUInt32};

/// Default upper bound for a single frame payload.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// A decoded frame: packet ID plus the undecoded body.
#[derive(Debug, Clone)]
pub struct Frame {
    pub packet_id: u32,
    pub body: Bytes,
}

/// Encode a packet into a complete frame ready to be written to a stream.
pub fn encode_packet(packet_id: u32, packet: &impl ProtoEncode) -> Bytes {
    let mut payload = BytesMut::new();
    VarUInt32(packet_id).proto_encode(&mut payload);
    packet.proto_encode(&mut payload);

    let len = VarUInt32(payload.len() as u32);
    let mut out = BytesMut::with_capacity(len.encoded_len() + payload.len());
    len.proto_encode(&mut out);
    out.put_slice(&payload);
    out.freeze()
}

/// Incremental frame decoder. Feed it bytes as they arrive, then drain
/// complete frames with [`FrameDecoder::next_frame`].
#[derive(Debug)]
pub struct FrameDecoder {
    buf: BytesMut,
    max_len: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(MAX_FRAME_LEN)
    }
}

impl FrameDecoder {
    pub fn new(max_len: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            max_len,
        }
    }

    /// Append raw bytes read from the stream.
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Number of buffered bytes not yet returned as a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Pop the next complete frame, or `Ok(None)` if more bytes are needed.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, ProtoError> {
        let mut peek = &self.buf[..];
        let len = match VarUInt32::proto_decode(&mut peek) {
            Ok(len) => len.0 as usize,
            Err(ProtoError::VarInt(VarIntError::BufferTooShort)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let header_len = self.buf.len() - peek.len();

        if len == 0 {
            return Err(ProtoError::EmptyFrame);
        }
        if len > self.max_len {
            debug!("Rejecting frame of {len} bytes (limit {})", self.max_len);
            return Err(ProtoError::FrameTooLarge {
                len,
                max: self.max_len,
            });
        }
        if peek.len() < len {
            return Ok(None);
        }

        self.buf.advance(header_len);
        let mut payload = self.buf.split_to(len).freeze();
        let packet_id = VarUInt32::proto_decode(&mut payload)?.0;
        Ok(Some(Frame {
            packet_id,
            body: payload,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Raw(&'static [u8]);

    impl ProtoEncode for Raw {
        fn proto_encode(&self, buf: &mut impl BufMut) {
            buf.put_slice(self.0);
        }
    }

    #[test]
    fn single_frame() {
        let encoded = encode_packet(0x02, &Raw(&[1, 2, 3]));
        assert_eq!(&encoded[..], &[4, 0x02, 1, 2, 3]);

        let mut decoder = FrameDecoder::default();
        decoder.extend(&encoded);
        let frame = decoder.next_frame().unwrap().unwrap();
        assert_eq!(frame.packet_id, 0x02);
        assert_eq!(&frame.body[..], &[1, 2, 3]);
        assert!(decoder.next_frame().unwrap().is_none());
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn partial_frame_waits_for_more_bytes() {
        let encoded = encode_packet(0x01, &Raw(&[9, 9, 9, 9]));
        let mut decoder = FrameDecoder::default();

        decoder.extend(&encoded[..3]);
        assert!(decoder.next_frame().unwrap().is_none());
        assert_eq!(decoder.buffered(), 3);

        decoder.extend(&encoded[3..]);
        let frame = decoder.next_frame().unwrap().unwrap();
        assert_eq!(frame.packet_id, 0x01);
        assert_eq!(&frame.body[..], &[9, 9, 9, 9]);
    }

    #[test]
    fn back_to_back_frames() {
        let mut decoder = FrameDecoder::default();
        decoder.extend(&encode_packet(0x01, &Raw(&[1])));
        decoder.extend(&encode_packet(0x03, &Raw(&[])));

        assert_eq!(decoder.next_frame().unwrap().unwrap().packet_id, 0x01);
        let second = decoder.next_frame().unwrap().unwrap();
        assert_eq!(second.packet_id, 0x03);
        assert!(second.body.is_empty());
        assert!(decoder.next_frame().unwrap().is_none());
    }

    #[test]
    fn oversized_frame_rejected() {
        let mut decoder = FrameDecoder::new(4);
        decoder.extend(&encode_packet(0x01, &Raw(&[0; 8])));
        assert!(matches!(
            decoder.next_frame(),
            Err(ProtoError::FrameTooLarge { len: 9, max: 4 })
        ));
    }

    #[test]
    fn empty_frame_rejected() {
        let mut decoder = FrameDecoder::default();
        decoder.extend(&[0]);
        assert!(matches!(decoder.next_frame(), Err(ProtoError::EmptyFrame)));
    }
}
