//! Server-side resolution of client move requests.
//!
//! The client has already applied its move by the time the request arrives.
//! The authority re-validates against its own state and answers with the
//! authoritative contents of every slot the move touched, whether or not the
//! move went through. Applying those corrections brings the client back in
//! line after a misprediction and is a no-op when the prediction was right.

use tracing::debug;

use crate::error::InventoryError;
use crate::player::PlayerInventories;
use crate::slot::SlotItem;
use crate::transfer::{MoveIntent, SlotRef, TransferOutcome};

/// Authoritative contents of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCorrection {
    pub slot: SlotRef,
    pub contents: Option<SlotItem>,
}

impl SlotCorrection {
    pub fn capture(inventories: &PlayerInventories, slot: SlotRef) -> Result<Self, InventoryError> {
        Ok(Self {
            slot,
            contents: inventories.contents_at(slot)?,
        })
    }
}

/// Result of resolving one move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResolution {
    pub outcome: TransferOutcome,
    /// Source first, then destination. A single entry for a same-slot move.
    pub corrections: Vec<SlotCorrection>,
}

/// Re-run `intent` against the authoritative inventories.
///
/// Fails only when an index is outside either inventory; the caller decides
/// how to resync in that case.
pub fn resolve_move(
    inventories: &mut PlayerInventories,
    intent: &MoveIntent,
) -> Result<MoveResolution, InventoryError> {
    let outcome = inventories.transfer(intent)?;
    if !outcome.is_committed() {
        debug!("Move {intent} refused by authority: {outcome:?}");
    }

    let mut corrections = vec![SlotCorrection::capture(inventories, intent.source)?];
    if intent.dest != intent.source {
        corrections.push(SlotCorrection::capture(inventories, intent.dest)?);
    }
    Ok(MoveResolution {
        outcome,
        corrections,
    })
}

/// Apply corrections to a client-side copy. Returns how many slots changed.
pub fn apply_corrections(
    inventories: &mut PlayerInventories,
    corrections: &[SlotCorrection],
) -> Result<usize, InventoryError> {
    let mut changed = 0;
    for correction in corrections {
        if inventories
            .get_mut(correction.slot.kind)
            .apply_authoritative(correction.slot.index, correction.contents)?
        {
            changed += 1;
        }
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemId;
    use crate::listener::{SlotEvent, SlotEventLog};
    use crate::transfer::{InventoryKind, RejectReason};

    fn seeded() -> PlayerInventories {
        let mut inv = PlayerInventories::new(8, 4);
        inv.get_mut(InventoryKind::Inventory)
            .set_slot(0, ItemId(42), 5)
            .unwrap();
        inv
    }

    #[test]
    fn accepted_move_reports_both_slots() {
        let mut server = seeded();
        let intent = MoveIntent::new(SlotRef::inventory(0), SlotRef::hotbar(1));
        let resolution = resolve_move(&mut server, &intent).unwrap();

        assert!(resolution.outcome.is_committed());
        assert_eq!(
            resolution.corrections,
            vec![
                SlotCorrection {
                    slot: SlotRef::inventory(0),
                    contents: None,
                },
                SlotCorrection {
                    slot: SlotRef::hotbar(1),
                    contents: Some(SlotItem::new(ItemId(42), 5)),
                },
            ]
        );
    }

    #[test]
    fn correct_prediction_needs_no_client_changes() {
        let mut server = seeded();
        let mut client = seeded();
        let intent = MoveIntent::new(SlotRef::inventory(0), SlotRef::inventory(3));
        assert!(client.transfer(&intent).unwrap().is_committed());

        let log = SlotEventLog::new();
        client.main().add_listener(log.clone());

        let resolution = resolve_move(&mut server, &intent).unwrap();
        assert_eq!(apply_corrections(&mut client, &resolution.corrections), Ok(0));
        assert!(log.events().is_empty());
    }

    #[test]
    fn stale_move_is_rolled_back_on_client() {
        let mut server = seeded();
        let mut client = seeded();
        // Server-side state the client has not seen yet.
        server
            .get_mut(InventoryKind::Inventory)
            .set_slot(3, ItemId(9), 1)
            .unwrap();

        let intent = MoveIntent::new(SlotRef::inventory(0), SlotRef::inventory(3));
        assert!(client.transfer(&intent).unwrap().is_committed());

        let resolution = resolve_move(&mut server, &intent).unwrap();
        assert_eq!(
            resolution.outcome,
            TransferOutcome::Rejected(RejectReason::DestinationOccupied)
        );

        let log = SlotEventLog::new();
        client.main().add_listener(log.clone());
        assert_eq!(apply_corrections(&mut client, &resolution.corrections), Ok(2));

        assert_eq!(client.main().contents(), server.main().contents());
        assert_eq!(
            log.events(),
            vec![
                (InventoryKind::Inventory, SlotEvent::Set(0)),
                (InventoryKind::Inventory, SlotEvent::Set(3)),
            ]
        );
    }

    #[test]
    fn same_slot_move_yields_one_correction() {
        let mut server = seeded();
        let intent = MoveIntent::new(SlotRef::inventory(0), SlotRef::inventory(0));
        let resolution = resolve_move(&mut server, &intent).unwrap();
        assert_eq!(
            resolution.outcome,
            TransferOutcome::Rejected(RejectReason::NoOp)
        );
        assert_eq!(resolution.corrections.len(), 1);
    }

    #[test]
    fn out_of_range_move_is_an_error() {
        let mut server = seeded();
        let intent = MoveIntent::new(SlotRef::inventory(0), SlotRef::hotbar(99));
        assert!(matches!(
            resolve_move(&mut server, &intent),
            Err(InventoryError::IndexOutOfRange { index: 99, .. })
        ));
    }
}
