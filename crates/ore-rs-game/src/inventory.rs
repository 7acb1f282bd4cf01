//! Fixed-capacity slot container with change notification.
//!
//! An `Inventory` owns its slots exclusively and never checks whether a write
//! is a sensible move; that is the job of the transfer validator. Every
//! mutating operation fires exactly one notification per changed slot.

use std::sync::Arc;

use tracing::trace;

use crate::error::InventoryError;
use crate::item::ItemId;
use crate::listener::{ListenerHandle, ListenerRegistry, SlotEvent, SlotListener};
use crate::slot::{Slot, SlotItem};
use crate::transfer::InventoryKind;

/// An ordered, fixed-size sequence of slots.
#[derive(Debug)]
pub struct Inventory {
    kind: InventoryKind,
    slots: Vec<Slot>,
    /// Slot holding UI focus, if any.
    selected: Option<usize>,
    listeners: ListenerRegistry,
}

impl Inventory {
    /// Create an inventory with `capacity` empty slots.
    pub fn new(kind: InventoryKind, capacity: usize) -> Self {
        Self {
            kind,
            slots: vec![Slot::empty(); capacity],
            selected: None,
            listeners: ListenerRegistry::default(),
        }
    }

    pub fn kind(&self) -> InventoryKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn check_index(&self, index: usize) -> Result<(), InventoryError> {
        if index >= self.slots.len() {
            return Err(InventoryError::IndexOutOfRange {
                index,
                capacity: self.slots.len(),
            });
        }
        Ok(())
    }

    /// Get the slot at `index`.
    pub fn slot(&self, index: usize) -> Result<&Slot, InventoryError> {
        self.slots.get(index).ok_or(InventoryError::IndexOutOfRange {
            index,
            capacity: self.slots.len(),
        })
    }

    /// The item referenced by slot `index`, if any.
    pub fn item_at(&self, index: usize) -> Result<Option<ItemId>, InventoryError> {
        Ok(self.slot(index)?.item())
    }

    /// Item and quantity held by slot `index`, if any.
    pub fn contents_at(&self, index: usize) -> Result<Option<SlotItem>, InventoryError> {
        Ok(self.slot(index)?.contents())
    }

    pub fn is_slot_empty(&self, index: usize) -> Result<bool, InventoryError> {
        Ok(self.slot(index)?.is_empty())
    }

    /// Iterate over `(index, slot)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots.iter().enumerate()
    }

    /// Snapshot of every slot's contents in index order.
    pub fn contents(&self) -> Vec<Option<SlotItem>> {
        self.slots.iter().map(Slot::contents).collect()
    }

    /// Index of the first empty slot.
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_empty)
    }

    /// Place `item` into slot `index`, replacing whatever was there.
    ///
    /// Does not check that the slot is empty. Fires `set`.
    pub fn set_slot(
        &mut self,
        index: usize,
        item: ItemId,
        quantity: u32,
    ) -> Result<(), InventoryError> {
        self.check_index(index)?;
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity { index });
        }
        self.slots[index].put(SlotItem::new(item, quantity));
        self.notify(SlotEvent::Set(index));
        Ok(())
    }

    /// Empty slot `index` and return what it held.
    ///
    /// Taking from an empty slot returns `Ok(None)` and fires nothing, so a
    /// retried take is harmless. Otherwise fires `removed`.
    pub fn take_item(&mut self, index: usize) -> Result<Option<SlotItem>, InventoryError> {
        self.check_index(index)?;
        let taken = self.slots[index].clear();
        if taken.is_some() {
            self.notify(SlotEvent::Removed(index));
        }
        Ok(taken)
    }

    /// Change the stack size of an occupied slot without changing its item.
    ///
    /// Fires `count_changed` only if the quantity actually differs.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), InventoryError> {
        self.check_index(index)?;
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity { index });
        }
        match self.slots[index].set_quantity(quantity) {
            None => Err(InventoryError::SlotEmpty { index }),
            Some(previous) => {
                if previous != quantity {
                    self.notify(SlotEvent::CountChanged(index));
                }
                Ok(())
            }
        }
    }

    /// Give UI focus to slot `index`. Fires `selected`.
    pub fn select(&mut self, index: usize) -> Result<(), InventoryError> {
        self.check_index(index)?;
        self.selected = Some(index);
        self.notify(SlotEvent::Selected(index));
        Ok(())
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Overwrite slot `index` with authoritative contents.
    ///
    /// Fires only what the change requires: nothing if the slot already
    /// matches, `count_changed` if only the quantity differs, `removed` if it
    /// becomes empty, `set` otherwise. Returns whether the slot changed.
    pub fn apply_authoritative(
        &mut self,
        index: usize,
        contents: Option<SlotItem>,
    ) -> Result<bool, InventoryError> {
        self.check_index(index)?;
        if contents.is_some_and(|c| c.quantity == 0) {
            return Err(InventoryError::ZeroQuantity { index });
        }

        let current = self.slots[index].contents();
        let event = match (current, contents) {
            (None, None) => None,
            (Some(_), None) => {
                self.slots[index].clear();
                Some(SlotEvent::Removed(index))
            }
            (Some(old), Some(new)) if old == new => None,
            (Some(old), Some(new)) if old.id == new.id => {
                self.slots[index].set_quantity(new.quantity);
                Some(SlotEvent::CountChanged(index))
            }
            (_, Some(new)) => {
                self.slots[index].put(new);
                Some(SlotEvent::Set(index))
            }
        };

        match event {
            Some(event) => {
                trace!(kind = ?self.kind, index, ?contents, "applied authoritative slot");
                self.notify(event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace every slot with `contents`, notifying only for slots that
    /// differ. Returns the number of slots that changed.
    pub fn load(&mut self, contents: &[Option<SlotItem>]) -> Result<usize, InventoryError> {
        if contents.len() != self.slots.len() {
            return Err(InventoryError::CapacityMismatch {
                expected: self.slots.len(),
                got: contents.len(),
            });
        }
        if let Some(index) = contents
            .iter()
            .position(|c| c.is_some_and(|c| c.quantity == 0))
        {
            return Err(InventoryError::ZeroQuantity { index });
        }

        let mut changed = 0;
        for (index, item) in contents.iter().enumerate() {
            if self.apply_authoritative(index, *item)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Register a listener. It sees only transitions that happen after this
    /// call returns.
    pub fn add_listener(&self, listener: Arc<dyn SlotListener>) -> ListenerHandle {
        self.listeners.add(listener)
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, handle: ListenerHandle) -> bool {
        self.listeners.remove(handle)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self, event: SlotEvent) {
        self.listeners.fire(event, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::SlotEventLog;

    fn inv_with_log(capacity: usize) -> (Inventory, Arc<SlotEventLog>) {
        let inv = Inventory::new(InventoryKind::Inventory, capacity);
        let log = SlotEventLog::new();
        inv.add_listener(log.clone());
        (inv, log)
    }

    fn events(log: &SlotEventLog) -> Vec<SlotEvent> {
        log.events().into_iter().map(|(_, e)| e).collect()
    }

    #[test]
    fn new_inventory_is_empty() {
        let inv = Inventory::new(InventoryKind::Hotbar, 8);
        assert_eq!(inv.capacity(), 8);
        assert_eq!(inv.kind(), InventoryKind::Hotbar);
        assert!(inv.iter().all(|(_, s)| s.is_empty()));
        assert_eq!(inv.first_empty(), Some(0));
        assert_eq!(inv.selected(), None);
    }

    #[test]
    fn item_at_out_of_range() {
        let inv = Inventory::new(InventoryKind::Inventory, 20);
        assert_eq!(
            inv.item_at(20),
            Err(InventoryError::IndexOutOfRange {
                index: 20,
                capacity: 20
            })
        );
        assert_eq!(inv.item_at(19), Ok(None));
    }

    #[test]
    fn set_slot_fires_set() {
        let (mut inv, log) = inv_with_log(20);
        inv.set_slot(0, ItemId(42), 5).unwrap();
        assert_eq!(inv.item_at(0), Ok(Some(ItemId(42))));
        assert_eq!(inv.slot(0).unwrap().quantity(), 5);
        assert_eq!(events(&log), vec![SlotEvent::Set(0)]);
    }

    #[test]
    fn set_slot_overwrites_without_checking() {
        let (mut inv, log) = inv_with_log(4);
        inv.set_slot(1, ItemId(1), 1).unwrap();
        inv.set_slot(1, ItemId(2), 3).unwrap();
        assert_eq!(inv.contents_at(1), Ok(Some(SlotItem::new(ItemId(2), 3))));
        assert_eq!(events(&log), vec![SlotEvent::Set(1), SlotEvent::Set(1)]);
    }

    #[test]
    fn set_slot_zero_quantity_rejected() {
        let (mut inv, log) = inv_with_log(4);
        assert_eq!(
            inv.set_slot(0, ItemId(1), 0),
            Err(InventoryError::ZeroQuantity { index: 0 })
        );
        assert!(inv.is_slot_empty(0).unwrap());
        assert!(log.events().is_empty());
    }

    #[test]
    fn set_slot_out_of_range_fires_nothing() {
        let (mut inv, log) = inv_with_log(4);
        assert!(inv.set_slot(4, ItemId(1), 1).is_err());
        assert!(log.events().is_empty());
    }

    #[test]
    fn take_item_is_idempotent() {
        let (mut inv, log) = inv_with_log(20);
        inv.set_slot(3, ItemId(42), 5).unwrap();
        log.drain();

        assert_eq!(inv.take_item(3), Ok(Some(SlotItem::new(ItemId(42), 5))));
        assert_eq!(inv.take_item(3), Ok(None));
        assert_eq!(events(&log), vec![SlotEvent::Removed(3)]);
    }

    #[test]
    fn take_item_from_never_filled_slot() {
        let (mut inv, log) = inv_with_log(2);
        assert_eq!(inv.take_item(1), Ok(None));
        assert!(log.events().is_empty());
    }

    #[test]
    fn set_quantity_fires_count_changed() {
        let (mut inv, log) = inv_with_log(4);
        inv.set_slot(2, ItemId(9), 2).unwrap();
        inv.set_quantity(2, 5).unwrap();
        inv.set_quantity(2, 5).unwrap();
        assert_eq!(inv.item_at(2), Ok(Some(ItemId(9))));
        assert_eq!(inv.slot(2).unwrap().quantity(), 5);
        assert_eq!(
            events(&log),
            vec![SlotEvent::Set(2), SlotEvent::CountChanged(2)]
        );
    }

    #[test]
    fn set_quantity_on_empty_slot() {
        let (mut inv, _log) = inv_with_log(4);
        assert_eq!(
            inv.set_quantity(0, 3),
            Err(InventoryError::SlotEmpty { index: 0 })
        );
    }

    #[test]
    fn select_fires_selected_without_changing_slots() {
        let (mut inv, log) = inv_with_log(8);
        inv.select(5).unwrap();
        assert_eq!(inv.selected(), Some(5));
        assert!(inv.is_slot_empty(5).unwrap());
        assert_eq!(events(&log), vec![SlotEvent::Selected(5)]);
        assert!(inv.select(8).is_err());
        assert_eq!(inv.selected(), Some(5));
    }

    #[test]
    fn apply_authoritative_minimal_notifications() {
        let (mut inv, log) = inv_with_log(4);
        let a = SlotItem::new(ItemId(1), 2);

        assert_eq!(inv.apply_authoritative(0, Some(a)), Ok(true));
        assert_eq!(inv.apply_authoritative(0, Some(a)), Ok(false));
        assert_eq!(
            inv.apply_authoritative(0, Some(SlotItem::new(ItemId(1), 6))),
            Ok(true)
        );
        assert_eq!(
            inv.apply_authoritative(0, Some(SlotItem::new(ItemId(3), 6))),
            Ok(true)
        );
        assert_eq!(inv.apply_authoritative(0, None), Ok(true));
        assert_eq!(inv.apply_authoritative(0, None), Ok(false));

        assert_eq!(
            events(&log),
            vec![
                SlotEvent::Set(0),
                SlotEvent::CountChanged(0),
                SlotEvent::Set(0),
                SlotEvent::Removed(0),
            ]
        );
    }

    #[test]
    fn apply_authoritative_rejects_zero_quantity() {
        let (mut inv, _log) = inv_with_log(4);
        assert_eq!(
            inv.apply_authoritative(1, Some(SlotItem::new(ItemId(1), 0))),
            Err(InventoryError::ZeroQuantity { index: 1 })
        );
    }

    #[test]
    fn reload_is_idempotent() {
        let (mut inv, log) = inv_with_log(3);
        let snapshot = vec![Some(SlotItem::new(ItemId(4), 1)), None, None];

        assert_eq!(inv.load(&snapshot), Ok(1));
        assert_eq!(inv.load(&snapshot), Ok(0));
        assert_eq!(inv.contents(), snapshot);
        assert_eq!(events(&log), vec![SlotEvent::Set(0)]);
    }

    #[test]
    fn load_wrong_length() {
        let (mut inv, _log) = inv_with_log(3);
        assert_eq!(
            inv.load(&[None, None]),
            Err(InventoryError::CapacityMismatch {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn load_with_zero_quantity_changes_nothing() {
        let (mut inv, log) = inv_with_log(2);
        let bad = [
            Some(SlotItem::new(ItemId(1), 1)),
            Some(SlotItem::new(ItemId(2), 0)),
        ];
        assert_eq!(
            inv.load(&bad),
            Err(InventoryError::ZeroQuantity { index: 1 })
        );
        assert!(inv.is_slot_empty(0).unwrap());
        assert!(log.events().is_empty());
    }

    #[test]
    fn first_empty_skips_occupied() {
        let mut inv = Inventory::new(InventoryKind::Inventory, 3);
        inv.set_slot(0, ItemId(1), 1).unwrap();
        assert_eq!(inv.first_empty(), Some(1));
        inv.set_slot(1, ItemId(2), 1).unwrap();
        inv.set_slot(2, ItemId(3), 1).unwrap();
        assert_eq!(inv.first_empty(), None);
    }
}
