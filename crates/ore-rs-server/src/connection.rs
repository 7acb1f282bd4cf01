//! Per-player session state and inventory packet handling.
//!
//! [`ConnectionHandler`] is the only owner of player inventories on the
//! server. It runs as a single task fed by [`SessionEvent`]s, so every move
//! request is resolved against a consistent state.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ore_rs_game::authority::resolve_move;
use ore_rs_game::net::content_packet;
use ore_rs_game::{InventoryKind, ItemCatalog, ItemId, ItemLookup, MoveIntent, PlayerInventories, SlotItem};
use ore_rs_proto::codec::ProtoEncode;
use ore_rs_proto::error::ProtoError;
use ore_rs_proto::frame::{encode_packet, Frame};
use ore_rs_proto::packets::{self, InventoryMove, InventorySlot, ServerboundPacket};

use crate::config::ServerConfig;
use crate::session::SessionEvent;

/// Server-side state for one connected player.
pub struct PlayerSession {
    /// Authoritative inventories.
    pub inventories: PlayerInventories,
    outbound: mpsc::UnboundedSender<Bytes>,
}

impl PlayerSession {
    fn send(&self, packet_id: u32, packet: &impl ProtoEncode) {
        if self.outbound.send(encode_packet(packet_id, packet)).is_err() {
            debug!("Outbound queue closed, dropping packet 0x{packet_id:02X}");
        }
    }

    fn send_content(&self, kind: InventoryKind) {
        self.send(
            packets::id::INVENTORY_CONTENT,
            &content_packet(self.inventories.get(kind)),
        );
    }
}

/// Owns every connected player's inventories and answers their packets.
pub struct ConnectionHandler {
    sessions: HashMap<SocketAddr, PlayerSession>,
    server_config: Arc<ServerConfig>,
    catalog: ItemCatalog,
}

impl ConnectionHandler {
    pub fn new(server_config: Arc<ServerConfig>, catalog: ItemCatalog) -> Self {
        Self {
            sessions: HashMap::new(),
            server_config,
            catalog,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session(&self, addr: &SocketAddr) -> Option<&PlayerSession> {
        self.sessions.get(addr)
    }

    /// Process an event from a socket task.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected { addr, outbound } => {
                self.handle_session_connected(addr, outbound);
            }
            SessionEvent::Packet { addr, frame } => {
                self.handle_packet(addr, frame);
            }
            SessionEvent::Disconnected { addr } => {
                self.handle_session_disconnected(addr);
            }
        }
    }

    fn handle_session_connected(&mut self, addr: SocketAddr, outbound: mpsc::UnboundedSender<Bytes>) {
        let max_players = self.server_config.server.max_players as usize;
        if self.sessions.len() >= max_players {
            // Dropping the sender ends the writer task and closes the socket.
            warn!("Refusing {addr}: server full ({max_players} players)");
            return;
        }

        let inv_config = &self.server_config.inventory;
        let mut inventories = PlayerInventories::new(inv_config.main_capacity, inv_config.hotbar_capacity);
        self.seed_starting_items(addr, &mut inventories);

        let session = PlayerSession {
            inventories,
            outbound,
        };
        session.send_content(InventoryKind::Inventory);
        session.send_content(InventoryKind::Hotbar);
        self.sessions.insert(addr, session);
        info!("Player connected: {addr} ({} online)", self.sessions.len());
    }

    fn seed_starting_items(&self, addr: SocketAddr, inventories: &mut PlayerInventories) {
        for starting in &self.server_config.inventory.starting_items {
            let id = ItemId(starting.id);
            let Some(max_stack) = self.catalog.max_stack_size(id) else {
                warn!("Skipping unknown starting item {id}");
                continue;
            };
            let quantity = starting.quantity.min(max_stack);
            if quantity == 0 {
                continue;
            }
            match inventories.insert(SlotItem::new(id, quantity)) {
                Ok(Some(slot)) => debug!(
                    "Gave {addr} {quantity}x {id} in {slot}; held in {:?}",
                    inventories.locate(id)
                ),
                Ok(None) => {
                    warn!("No room for starting item {id} for {addr}");
                    break;
                }
                Err(e) => warn!("Failed to give starting item {id} to {addr}: {e}"),
            }
        }
    }

    fn handle_session_disconnected(&mut self, addr: SocketAddr) {
        if self.sessions.remove(&addr).is_some() {
            info!("Player disconnected: {addr} ({} online)", self.sessions.len());
        } else {
            debug!("Session disconnected: {addr}");
        }
    }

    fn handle_packet(&mut self, addr: SocketAddr, frame: Frame) {
        if !self.sessions.contains_key(&addr) {
            warn!("Packet from unknown session {addr}");
            return;
        }
        let mut body = frame.body;
        match ServerboundPacket::decode(frame.packet_id, &mut body) {
            Ok(ServerboundPacket::InventoryMove(pkt)) => self.handle_inventory_move(addr, &pkt),
            Err(e @ ProtoError::UnknownPacketId(_)) => debug!("Ignoring packet from {addr}: {e}"),
            Err(e) => warn!("Bad packet 0x{:02X} from {addr}: {e}", frame.packet_id),
        }
    }

    fn handle_inventory_move(&mut self, addr: SocketAddr, pkt: &InventoryMove) {
        let Some(session) = self.sessions.get_mut(&addr) else {
            return;
        };
        let intent = MoveIntent::from(pkt);

        let resolution = match resolve_move(&mut session.inventories, &intent) {
            Ok(r) => r,
            Err(e) => {
                // The client is out of sync on shape, not just contents.
                warn!("Invalid move {intent} from {addr}: {e}");
                session.send_content(intent.source.kind);
                if intent.dest.kind != intent.source.kind {
                    session.send_content(intent.dest.kind);
                }
                return;
            }
        };

        if resolution.outcome.is_committed() {
            debug!("Move {intent} from {addr} committed");
        } else {
            info!("Move {intent} from {addr} refused: {:?}", resolution.outcome);
        }

        for correction in &resolution.corrections {
            match InventorySlot::try_from(correction) {
                Ok(slot) => session.send(packets::id::INVENTORY_SLOT, &slot),
                Err(e) => warn!("Cannot encode slot {} for {addr}: {e}", correction.slot),
            }
        }
    }
}
