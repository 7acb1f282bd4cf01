//! Wire protocol for inventory synchronization between client and server.

pub mod codec;
pub mod error;
pub mod frame;
pub mod packets;
pub mod types;
