//! Client-side drag and drop over a player's inventories.
//!
//! The client predicts every move locally: a drop that passes validation is
//! committed at once and the move is handed to a [`MoveIntentDispatcher`] for
//! the server. Whatever the server answers comes back as slot corrections
//! through [`ClientInventories::reconcile`].

use std::sync::mpsc;

use tracing::{debug, warn};

use crate::authority::{self, SlotCorrection};
use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::item::ItemLookup;
use crate::player::PlayerInventories;
use crate::slot::SlotItem;
use crate::transfer::{InventoryKind, MoveIntent, SlotRef, TransferOutcome};

/// Tells the remote authority about a move the client just made.
///
/// Fire-and-forget: the client never waits for, or reads, a reply here.
pub trait MoveIntentDispatcher {
    fn send_inventory_move(&self, intent: MoveIntent);
}

impl<F> MoveIntentDispatcher for F
where
    F: Fn(MoveIntent),
{
    fn send_inventory_move(&self, intent: MoveIntent) {
        self(intent)
    }
}

impl MoveIntentDispatcher for mpsc::Sender<MoveIntent> {
    fn send_inventory_move(&self, intent: MoveIntent) {
        if let Err(e) = self.send(intent) {
            warn!("Dropping move {}: receiver gone", e.0);
        }
    }
}

/// What the cursor carries while a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload {
    pub source: SlotRef,
}

/// Text data for a slot tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescription {
    pub name: String,
    pub quantity: u32,
}

/// A player's inventories as seen by the client, plus the outbound channel
/// for move requests.
pub struct ClientInventories<D> {
    inventories: PlayerInventories,
    dispatcher: D,
}

impl<D: MoveIntentDispatcher> ClientInventories<D> {
    pub fn new(inventories: PlayerInventories, dispatcher: D) -> Self {
        Self {
            inventories,
            dispatcher,
        }
    }

    pub fn inventories(&self) -> &PlayerInventories {
        &self.inventories
    }

    pub fn inventory(&self, kind: InventoryKind) -> &Inventory {
        self.inventories.get(kind)
    }

    /// Begin dragging from `source`. Returns `None` for an empty slot; there
    /// is nothing to drag.
    pub fn drag_start(&self, source: SlotRef) -> Result<Option<DragPayload>, InventoryError> {
        if self.inventories.get(source.kind).is_slot_empty(source.index)? {
            return Ok(None);
        }
        Ok(Some(DragPayload { source }))
    }

    /// Whether dropping `payload` on `dest` would be accepted. Called every
    /// frame while hovering, so it must not change anything.
    pub fn drop_feedback(&self, payload: &DragPayload, dest: SlotRef) -> Result<bool, InventoryError> {
        let intent = MoveIntent::new(payload.source, dest);
        Ok(self.inventories.validate(&intent)?.is_accepted())
    }

    /// Drop `payload` on `dest`. A committed move is dispatched exactly once;
    /// anything else is neither applied nor sent.
    pub fn drop(&mut self, payload: DragPayload, dest: SlotRef) -> Result<TransferOutcome, InventoryError> {
        let intent = MoveIntent::new(payload.source, dest);
        let outcome = self.inventories.transfer(&intent)?;
        if outcome.is_committed() {
            self.dispatcher.send_inventory_move(intent);
        }
        Ok(outcome)
    }

    /// Apply authoritative slot contents from the server. Returns how many
    /// slots actually changed.
    pub fn reconcile(&mut self, corrections: &[SlotCorrection]) -> Result<usize, InventoryError> {
        let changed = authority::apply_corrections(&mut self.inventories, corrections)?;
        if changed > 0 {
            debug!("Reconciled {changed} of {} slots", corrections.len());
        }
        Ok(changed)
    }

    /// Replace a whole inventory with a server snapshot.
    pub fn load(&mut self, kind: InventoryKind, contents: &[Option<SlotItem>]) -> Result<usize, InventoryError> {
        self.inventories.get_mut(kind).load(contents)
    }

    /// Tooltip data for `slot`, or `None` if it is empty. Unknown items are
    /// described by their numeric id.
    pub fn describe_slot(
        &self,
        slot: SlotRef,
        lookup: &dyn ItemLookup,
    ) -> Result<Option<SlotDescription>, InventoryError> {
        Ok(self.inventories.contents_at(slot)?.map(|item| SlotDescription {
            name: lookup
                .display_name(item.id)
                .map_or_else(|| format!("#{}", item.id), str::to_owned),
            quantity: item.quantity,
        }))
    }
}
