//! Slot-to-slot transfer: validation and commit.
//!
//! A transfer attempt goes `Proposed → Accepted | Rejected`, and an accepted
//! attempt goes `→ Committed | Aborted`. Only `Committed` changes state. The
//! terminal state is reported as a [`TransferOutcome`].
//!
//! This system never merges or swaps: a move succeeds only into an empty
//! destination slot.

use std::fmt;

use tracing::debug;

use crate::error::InventoryError;
use crate::player::PlayerInventories;
use crate::slot::SlotItem;

/// Which of a player's inventories a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryKind {
    /// The main inventory.
    Inventory,
    /// The quick-access hotbar.
    Hotbar,
}

impl fmt::Display for InventoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryKind::Inventory => f.write_str("Inventory"),
            InventoryKind::Hotbar => f.write_str("Hotbar"),
        }
    }
}

/// Address of a slot across a player's inventories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub kind: InventoryKind,
    pub index: usize,
}

impl SlotRef {
    pub fn new(kind: InventoryKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub fn inventory(index: usize) -> Self {
        Self::new(InventoryKind::Inventory, index)
    }

    pub fn hotbar(index: usize) -> Self {
        Self::new(InventoryKind::Hotbar, index)
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.index)
    }
}

/// A requested move from one slot to another. Lives for a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    pub source: SlotRef,
    pub dest: SlotRef,
}

impl MoveIntent {
    pub fn new(source: SlotRef, dest: SlotRef) -> Self {
        Self { source, dest }
    }
}

impl fmt::Display for MoveIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

/// Why the validator turned a move down. Rejection is a normal outcome, not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Source and destination are the same slot.
    NoOp,
    /// The destination already holds an item.
    DestinationOccupied,
    /// There is nothing in the source slot.
    SourceEmpty,
}

/// Validator decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Why an accepted move could not be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The destination became occupied between validation and commit.
    SlotOccupiedRace,
    /// The source became empty between validation and commit.
    SourceVanished,
}

/// Terminal state of a transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both slots were written and both inventories notified.
    Committed(SlotItem),
    /// Validation failed; nothing changed.
    Rejected(RejectReason),
    /// Commit preconditions no longer held; nothing changed.
    Aborted(AbortReason),
}

impl TransferOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, TransferOutcome::Committed(_))
    }
}

/// Decide whether `intent` may proceed. Pure: reads state, changes nothing.
///
/// Rules, in order: same slot → `NoOp`; occupied destination →
/// `DestinationOccupied`; empty source → `SourceEmpty`; otherwise accept.
/// An index outside either inventory is an error, not a verdict.
pub fn validate(
    inventories: &PlayerInventories,
    intent: &MoveIntent,
) -> Result<Verdict, InventoryError> {
    let source = inventories.get(intent.source.kind);
    let dest = inventories.get(intent.dest.kind);

    // Bounds first, so a bad index never hides behind a rejection.
    let source_empty = source.is_slot_empty(intent.source.index)?;
    let dest_empty = dest.is_slot_empty(intent.dest.index)?;

    let verdict = if intent.source == intent.dest {
        Verdict::Rejected(RejectReason::NoOp)
    } else if !dest_empty {
        Verdict::Rejected(RejectReason::DestinationOccupied)
    } else if source_empty {
        Verdict::Rejected(RejectReason::SourceEmpty)
    } else {
        Verdict::Accepted
    };
    Ok(verdict)
}

/// Commit a move that has been accepted.
///
/// The destination is written before the source is cleared, so a failure
/// between the two can duplicate an item but never lose one. Both writes run
/// back to back with no yield point in between.
pub fn execute(
    inventories: &mut PlayerInventories,
    intent: &MoveIntent,
) -> Result<TransferOutcome, InventoryError> {
    let moved = match inventories
        .get(intent.source.kind)
        .contents_at(intent.source.index)?
    {
        Some(item) => item,
        None => return Ok(TransferOutcome::Aborted(AbortReason::SourceVanished)),
    };
    if !inventories
        .get(intent.dest.kind)
        .is_slot_empty(intent.dest.index)?
    {
        return Ok(TransferOutcome::Aborted(AbortReason::SlotOccupiedRace));
    }

    inventories
        .get_mut(intent.dest.kind)
        .set_slot(intent.dest.index, moved.id, moved.quantity)?;
    inventories
        .get_mut(intent.source.kind)
        .take_item(intent.source.index)?;

    Ok(TransferOutcome::Committed(moved))
}

/// Validate and, if accepted, commit.
pub fn transfer(
    inventories: &mut PlayerInventories,
    intent: &MoveIntent,
) -> Result<TransferOutcome, InventoryError> {
    let outcome = match validate(inventories, intent)? {
        Verdict::Rejected(reason) => TransferOutcome::Rejected(reason),
        Verdict::Accepted => execute(inventories, intent)?,
    };
    debug!("Transfer {intent}: {outcome:?}");
    Ok(outcome)
}
