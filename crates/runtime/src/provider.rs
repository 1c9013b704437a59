//! Collaborator seams consumed by the panel session.

use std::sync::Arc;

use rust_decimal::Decimal;
use withdraw_core::{Address, FarmId, InventorySnapshot};

/// Read-only view of the game state container.
///
/// Queried once per panel opening; the panel never writes back.
pub trait GameStateProvider: Send + Sync {
    fn farm_id(&self) -> FarmId;

    /// Token balance, staged as the default withdrawal amount.
    fn balance(&self) -> Decimal;

    fn inventory(&self) -> Arc<InventorySnapshot>;

    /// Connected wallet account, staged as the default destination.
    fn wallet_address(&self) -> Address;
}

/// Side effect run when the player acknowledges a successful withdrawal
/// (e.g. asking the auth/session layer to reload the farm).
pub trait SessionRefresh: Send + Sync {
    fn refresh(&self);
}

impl<F> SessionRefresh for F
where
    F: Fn() + Send + Sync,
{
    fn refresh(&self) {
        self()
    }
}

/// Fixed game state, for fixtures and tests.
#[derive(Clone, Debug)]
pub struct StaticGameState {
    pub farm_id: FarmId,
    pub balance: Decimal,
    pub address: Address,
    pub inventory: Arc<InventorySnapshot>,
}

impl GameStateProvider for StaticGameState {
    fn farm_id(&self) -> FarmId {
        self.farm_id
    }

    fn balance(&self) -> Decimal {
        self.balance
    }

    fn inventory(&self) -> Arc<InventorySnapshot> {
        Arc::clone(&self.inventory)
    }

    fn wallet_address(&self) -> Address {
        self.address.clone()
    }
}
