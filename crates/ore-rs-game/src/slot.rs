//! A single item-holding cell.

use crate::item::ItemId;

/// An item reference together with its stack size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotItem {
    pub id: ItemId,
    /// Always above zero while stored in a slot.
    pub quantity: u32,
}

impl SlotItem {
    pub fn new(id: ItemId, quantity: u32) -> Self {
        Self { id, quantity }
    }
}

/// One slot of an [`Inventory`](crate::Inventory). Empty slots carry no quantity.
///
/// Slots are only mutated through their owning inventory so that every
/// change reaches the registered listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    contents: Option<SlotItem>,
}

impl Slot {
    pub fn empty() -> Self {
        Self { contents: None }
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    /// The referenced item, if any.
    pub fn item(&self) -> Option<ItemId> {
        self.contents.map(|c| c.id)
    }

    /// Stack size; 0 for an empty slot.
    pub fn quantity(&self) -> u32 {
        self.contents.map_or(0, |c| c.quantity)
    }

    pub fn contents(&self) -> Option<SlotItem> {
        self.contents
    }

    pub(crate) fn put(&mut self, item: SlotItem) {
        debug_assert!(item.quantity > 0);
        self.contents = Some(item);
    }

    pub(crate) fn clear(&mut self) -> Option<SlotItem> {
        self.contents.take()
    }

    /// Returns the previous quantity, or `None` if the slot is empty.
    pub(crate) fn set_quantity(&mut self, quantity: u32) -> Option<u32> {
        let contents = self.contents.as_mut()?;
        let previous = contents.quantity;
        contents.quantity = quantity;
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot() {
        let slot = Slot::empty();
        assert!(slot.is_empty());
        assert_eq!(slot.item(), None);
        assert_eq!(slot.quantity(), 0);
    }

    #[test]
    fn put_and_clear() {
        let mut slot = Slot::empty();
        slot.put(SlotItem::new(ItemId(42), 5));
        assert_eq!(slot.item(), Some(ItemId(42)));
        assert_eq!(slot.quantity(), 5);

        assert_eq!(slot.clear(), Some(SlotItem::new(ItemId(42), 5)));
        assert!(slot.is_empty());
        assert_eq!(slot.clear(), None);
    }

    #[test]
    fn set_quantity_keeps_identity() {
        let mut slot = Slot::empty();
        assert_eq!(slot.set_quantity(3), None);

        slot.put(SlotItem::new(ItemId(9), 2));
        assert_eq!(slot.set_quantity(7), Some(2));
        assert_eq!(slot.item(), Some(ItemId(9)));
        assert_eq!(slot.quantity(), 7);
    }
}
