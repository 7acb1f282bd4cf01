//! Base data types used by the inventory protocol.

use std::fmt;

use bytes::{Buf, BufMut};
use thiserror::Error;

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

#[derive(Debug, Error)]
pub enum VarIntError {
    #[error("buffer too short")]
    BufferTooShort,
    #[error("VarInt is too long (more than {max_bytes} bytes)")]
    TooManyBytes { max_bytes: usize },
}

// ---------------------------------------------------------------------------
// VarUInt32 (unsigned LEB128)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarUInt32(pub u32);

impl VarUInt32 {
    /// Maximum bytes a VarUInt32 can occupy.
    pub const MAX_BYTES: usize = 5;

    /// Number of bytes this value occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        let mut value = self.0;
        let mut len = 1;
        while value & !0x7F != 0 {
            value >>= 7;
            len += 1;
        }
        len
    }
}

impl ProtoEncode for VarUInt32 {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let mut value = self.0;
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoDecode for VarUInt32 {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let mut result: u32 = 0;
        let mut shift: u32 = 0;
        for i in 0..Self::MAX_BYTES {
            if !buf.has_remaining() {
                return Err(VarIntError::BufferTooShort.into());
            }
            let byte = buf.get_u8();
            result |= ((byte & 0x7F) as u32) << shift;
            if byte & 0x80 == 0 {
                return Ok(VarUInt32(result));
            }
            shift += 7;
            if i == Self::MAX_BYTES - 1 {
                return Err(VarIntError::TooManyBytes {
                    max_bytes: Self::MAX_BYTES,
                }
                .into());
            }
        }
        Err(VarIntError::BufferTooShort.into())
    }
}

impl fmt::Debug for VarUInt32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarUInt32({})", self.0)
    }
}

impl fmt::Display for VarUInt32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
