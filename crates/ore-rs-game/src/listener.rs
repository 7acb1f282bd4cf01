//! Slot change notification.
//!
//! Listeners are registered on an [`Inventory`] and receive one callback per
//! mutating operation, carrying only the slot index and a shared borrow of the
//! inventory. A listener re-queries whatever state it needs. Because the
//! borrow is shared, a callback cannot mutate the inventory that is notifying
//! it, and therefore cannot re-enter a transfer in progress.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::inventory::Inventory;
use crate::transfer::InventoryKind;

/// Observer of slot state changes. All methods default to doing nothing, so
/// implementors only override the capabilities they care about.
pub trait SlotListener: Send + Sync {
    /// The quantity of an occupied slot changed; its item did not.
    fn count_changed(&self, _index: usize, _inventory: &Inventory) {}

    /// An item was placed into the slot.
    fn set(&self, _index: usize, _inventory: &Inventory) {}

    /// The slot was emptied.
    fn removed(&self, _index: usize, _inventory: &Inventory) {}

    /// The slot received UI focus. Carries no data-model change.
    fn selected(&self, _index: usize, _inventory: &Inventory) {}
}

/// A single notification, as delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEvent {
    CountChanged(usize),
    Set(usize),
    Removed(usize),
    Selected(usize),
}

impl SlotEvent {
    fn deliver(self, listener: &dyn SlotListener, inventory: &Inventory) {
        match self {
            SlotEvent::CountChanged(i) => listener.count_changed(i, inventory),
            SlotEvent::Set(i) => listener.set(i, inventory),
            SlotEvent::Removed(i) => listener.removed(i, inventory),
            SlotEvent::Selected(i) => listener.selected(i, inventory),
        }
    }
}

/// Returned by [`Inventory::add_listener`]; used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Registration list owned by an inventory. Notification order is
/// registration order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Mutex<Vec<(ListenerHandle, Arc<dyn SlotListener>)>>,
}

impl ListenerRegistry {
    fn entries(&self) -> MutexGuard<'_, Vec<(ListenerHandle, Arc<dyn SlotListener>)>> {
        // A listener that panicked mid-notification leaves the list itself intact.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add(&self, listener: Arc<dyn SlotListener>) -> ListenerHandle {
        let handle = ListenerHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed));
        self.entries().push((handle, listener));
        handle
    }

    pub(crate) fn remove(&self, handle: ListenerHandle) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|(h, _)| *h != handle);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries().len()
    }

    /// Deliver `event` to every listener registered at the time of the call.
    ///
    /// The list is snapshotted and the lock released before any callback
    /// runs, so callbacks may add or remove listeners freely.
    pub(crate) fn fire(&self, event: SlotEvent, inventory: &Inventory) {
        let snapshot: Vec<Arc<dyn SlotListener>> = self
            .entries()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            event.deliver(listener.as_ref(), inventory);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

/// A listener that records every event it sees. Handy for UI layers that
/// batch redraws, and for tests.
#[derive(Debug, Default)]
pub struct SlotEventLog {
    events: Mutex<Vec<(InventoryKind, SlotEvent)>>,
}

impl SlotEventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, inventory: &Inventory, event: SlotEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((inventory.kind(), event));
    }

    /// All events recorded so far, oldest first.
    pub fn events(&self) -> Vec<(InventoryKind, SlotEvent)> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the recorded events.
    pub fn drain(&self) -> Vec<(InventoryKind, SlotEvent)> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl SlotListener for SlotEventLog {
    fn count_changed(&self, index: usize, inventory: &Inventory) {
        self.push(inventory, SlotEvent::CountChanged(index));
    }

    fn set(&self, index: usize, inventory: &Inventory) {
        self.push(inventory, SlotEvent::Set(index));
    }

    fn removed(&self, index: usize, inventory: &Inventory) {
        self.push(inventory, SlotEvent::Removed(index));
    }

    fn selected(&self, index: usize, inventory: &Inventory) {
        self.push(inventory, SlotEvent::Selected(index));
    }
}
