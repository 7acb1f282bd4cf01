//! Protocol-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("buffer too short: need {needed} more bytes, have {remaining}")]
    BufferTooShort { needed: usize, remaining: usize },

    #[error("VarInt encoding error: {0}")]
    VarInt(#[from] crate::types::VarIntError),

    #[error("unknown packet id: 0x{0:02X}")]
    UnknownPacketId(u32),

    #[error("unknown window kind: {0}")]
    UnknownWindowKind(u8),

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("empty frame")]
    EmptyFrame,

    #[error("invalid data: {0}")]
    InvalidData(String),
}
