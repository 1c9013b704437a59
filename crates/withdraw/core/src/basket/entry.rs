use std::num::NonZeroU32;

use crate::ids::ItemId;

/// One staged item and how many units of it are being withdrawn.
///
/// A zero quantity is unrepresentable: an entry decremented to zero is removed
/// from the [`Basket`] instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasketEntry {
    pub item: ItemId,
    pub quantity: NonZeroU32,
}

impl BasketEntry {
    pub fn new(item: ItemId, quantity: NonZeroU32) -> Self {
        Self { item, quantity }
    }
}

/// Insertion-ordered set of staged items, unique by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Basket {
    entries: Vec<BasketEntry>,
}

impl Basket {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BasketEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Staged units of `item`, zero when absent.
    pub fn quantity(&self, item: &ItemId) -> u32 {
        self.position(item)
            .map(|index| self.entries[index].quantity.get())
            .unwrap_or(0)
    }

    fn position(&self, item: &ItemId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.item == item)
    }

    /// Returns a copy with one more unit of `item`, appending a new entry at
    /// the end when the item was not staged yet. `None` on counter overflow.
    pub(crate) fn incremented(&self, item: &ItemId) -> Option<Self> {
        let mut next = self.clone();
        match next.position(item) {
            Some(index) => {
                let entry = &mut next.entries[index];
                entry.quantity = entry.quantity.checked_add(1)?;
            }
            None => next
                .entries
                .push(BasketEntry::new(item.clone(), NonZeroU32::MIN)),
        }
        Some(next)
    }

    /// Returns a copy with one unit of `item` removed, dropping the entry when
    /// it reaches zero. `None` when the item is not staged.
    pub(crate) fn decremented(&self, item: &ItemId) -> Option<Self> {
        let index = self.position(item)?;
        let mut next = self.clone();
        match NonZeroU32::new(next.entries[index].quantity.get() - 1) {
            Some(quantity) => next.entries[index].quantity = quantity,
            None => {
                next.entries.remove(index);
            }
        }
        Some(next)
    }
}
