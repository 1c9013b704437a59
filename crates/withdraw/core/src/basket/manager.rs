use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::basket::{Basket, BasketEntry, BasketOp, BasketState};
use crate::ids::{Address, ItemId};
use crate::inventory::InventorySnapshot;

/// Decimal places shown for the staged token amount.
pub const TOKEN_DISPLAY_DP: u32 = 2;

/// Errors surfaced by [`BasketManager`] edits that are not silent no-ops.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BasketError {
    #[error("token amount must not be negative, got {0}")]
    NegativeTokenAmount(Decimal),
}

/// Owns the pending basket for one open panel session.
///
/// Selection edits that would break the `remaining >= 0` invariant (adding
/// past availability, removing something not staged) are absorbed as no-ops
/// and reported through the `bool` return value.
#[derive(Clone, Debug)]
pub struct BasketManager {
    state: Arc<BasketState>,
    destination: Address,
    token_amount: Decimal,
}

impl BasketManager {
    pub fn new(
        inventory: impl Into<Arc<InventorySnapshot>>,
        destination: Address,
        default_token_amount: Decimal,
    ) -> Self {
        Self {
            state: Arc::new(BasketState::new(inventory.into())),
            destination,
            token_amount: clamp_token_amount(default_token_amount),
        }
    }

    /// Clears the basket and restages the given defaults.
    pub fn reset(
        &mut self,
        inventory: impl Into<Arc<InventorySnapshot>>,
        destination: Address,
        default_token_amount: Decimal,
    ) {
        *self = Self::new(inventory, destination, default_token_amount);
        tracing::debug!(
            destination = %self.destination,
            tokens = %self.token_amount,
            "basket reset"
        );
    }

    pub fn add(&mut self, item: &ItemId) -> bool {
        self.commit(self.state.with_added(item), "add", item)
    }

    pub fn remove(&mut self, item: &ItemId) -> bool {
        self.commit(self.state.with_removed(item), "remove", item)
    }

    pub fn apply(&mut self, op: &BasketOp) -> bool {
        match op {
            BasketOp::Add(item) => self.add(item),
            BasketOp::Remove(item) => self.remove(item),
        }
    }

    fn commit(&mut self, next: Option<BasketState>, op: &'static str, item: &ItemId) -> bool {
        match next {
            Some(next) => {
                self.state = Arc::new(next);
                tracing::trace!(op, %item, remaining = %self.state.remaining(item), "basket updated");
                true
            }
            None => {
                tracing::trace!(op, %item, "basket edit ignored");
                false
            }
        }
    }

    pub fn set_token_amount(&mut self, amount: Decimal) -> Result<(), BasketError> {
        if amount < Decimal::ZERO {
            return Err(BasketError::NegativeTokenAmount(amount));
        }
        self.token_amount = amount;
        Ok(())
    }

    pub fn set_destination(&mut self, destination: Address) {
        self.destination = destination;
    }

    pub fn snapshot(&self) -> BasketSnapshot {
        BasketSnapshot {
            state: Arc::clone(&self.state),
            destination: self.destination.clone(),
            token_amount: self.token_amount,
        }
    }
}

fn clamp_token_amount(amount: Decimal) -> Decimal {
    if amount < Decimal::ZERO {
        tracing::warn!(%amount, "negative default token amount, staging zero");
        Decimal::ZERO
    } else {
        amount
    }
}

/// Truncates (never rounds) `amount` for display, dropping trailing zeros.
pub fn display_amount(amount: Decimal) -> String {
    amount
        .round_dp_with_strategy(TOKEN_DISPLAY_DP, RoundingStrategy::ToZero)
        .normalize()
        .to_string()
}

/// Immutable view of a basket session, cheap to clone.
///
/// Used both for rendering and as the frozen input of a withdrawal request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasketSnapshot {
    state: Arc<BasketState>,
    destination: Address,
    token_amount: Decimal,
}

impl BasketSnapshot {
    pub fn basket(&self) -> &Basket {
        self.state.basket()
    }

    pub fn entries(&self) -> &[BasketEntry] {
        self.state.basket().entries()
    }

    pub fn original(&self) -> &InventorySnapshot {
        self.state.original()
    }

    pub fn remaining(&self, item: &ItemId) -> Decimal {
        self.state.remaining(item)
    }

    /// Remaining quantity for every item of the original inventory, in id order.
    pub fn remaining_view(&self) -> Vec<(ItemId, Decimal)> {
        self.state
            .original()
            .iter()
            .map(|(item, _)| (item.clone(), self.state.remaining(item)))
            .collect()
    }

    /// Items with at least one whole unit left to stage.
    pub fn selectable(&self) -> Vec<ItemId> {
        self.state
            .original()
            .iter()
            .filter(|(item, _)| self.state.can_add(item))
            .map(|(item, _)| item.clone())
            .collect()
    }

    pub fn destination(&self) -> &Address {
        &self.destination
    }

    pub fn token_amount(&self) -> Decimal {
        self.token_amount
    }

    pub fn token_amount_display(&self) -> String {
        display_amount(self.token_amount)
    }
}
