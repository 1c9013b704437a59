use std::sync::Arc;

use rust_decimal::Decimal;

use crate::basket::Basket;
use crate::ids::ItemId;
use crate::inventory::InventorySnapshot;

/// Single-unit basket edit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BasketOp {
    /// Move one unit from the remaining pool into the basket.
    Add(ItemId),
    /// Move one unit from the basket back into the remaining pool.
    Remove(ItemId),
}

impl BasketOp {
    pub fn item(&self) -> &ItemId {
        match self {
            Self::Add(item) | Self::Remove(item) => item,
        }
    }
}

/// Immutable `(original inventory, basket)` pair.
///
/// The remaining view is derived on read as `original - basket`, so the two
/// can never drift apart. Edits produce a new value; readers holding an older
/// `Arc<BasketState>` keep a consistent view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasketState {
    original: Arc<InventorySnapshot>,
    basket: Basket,
}

impl BasketState {
    pub fn new(original: Arc<InventorySnapshot>) -> Self {
        Self {
            original,
            basket: Basket::empty(),
        }
    }

    pub fn original(&self) -> &InventorySnapshot {
        &self.original
    }

    pub fn original_arc(&self) -> &Arc<InventorySnapshot> {
        &self.original
    }

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    /// Units of `item` not staged in the basket. Never negative.
    pub fn remaining(&self, item: &ItemId) -> Decimal {
        self.original.quantity(item) - Decimal::from(self.basket.quantity(item))
    }

    /// Whether at least one whole unit of `item` is still available.
    pub fn can_add(&self, item: &ItemId) -> bool {
        self.remaining(item) >= Decimal::ONE
    }

    /// Applies `op`, returning the next state or `None` when the edit is
    /// rejected (nothing left to add, or nothing staged to remove).
    pub fn apply(&self, op: &BasketOp) -> Option<Self> {
        match op {
            BasketOp::Add(item) => self.with_added(item),
            BasketOp::Remove(item) => self.with_removed(item),
        }
    }

    pub fn with_added(&self, item: &ItemId) -> Option<Self> {
        if !self.can_add(item) {
            return None;
        }
        Some(Self {
            original: Arc::clone(&self.original),
            basket: self.basket.incremented(item)?,
        })
    }

    pub fn with_removed(&self, item: &ItemId) -> Option<Self> {
        Some(Self {
            original: Arc::clone(&self.original),
            basket: self.basket.decremented(item)?,
        })
    }
}
