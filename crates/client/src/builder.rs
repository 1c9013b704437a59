//! Client builder with dependency injection pattern.

use std::sync::Arc;

use anyhow::{Context, Result};
use client_blockchain_core::TokenTransfer;
use withdraw_core::ItemOracle;
use withdraw_runtime::{GameStateProvider, SessionRefresh, WithdrawPanel};

use crate::Client;

/// Builder for constructing a Client with proper validation.
///
/// Game state, item catalog and transfer backend are required; the session
/// refresh hook defaults to logging only.
#[derive(Default)]
pub struct ClientBuilder {
    game_state: Option<Arc<dyn GameStateProvider>>,
    oracle: Option<Arc<dyn ItemOracle>>,
    transfer: Option<Arc<dyn TokenTransfer>>,
    refresh: Option<Arc<dyn SessionRefresh>>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the game-state provider (required).
    pub fn game_state(mut self, provider: impl GameStateProvider + 'static) -> Self {
        self.game_state = Some(Arc::new(provider));
        self
    }

    /// Set the item catalog used to resolve contract ids (required).
    pub fn oracle(mut self, oracle: impl ItemOracle + 'static) -> Self {
        self.oracle = Some(Arc::new(oracle));
        self
    }

    /// Set the transfer backend (required).
    pub fn transfer(mut self, transfer: impl TokenTransfer + 'static) -> Self {
        self.transfer = Some(Arc::new(transfer));
        self
    }

    /// Set the hook run after a successful withdrawal is acknowledged (optional).
    pub fn refresh(mut self, refresh: impl SessionRefresh + 'static) -> Self {
        self.refresh = Some(Arc::new(refresh));
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if any required collaborator is missing.
    pub fn build(self) -> Result<Client> {
        let game_state = self
            .game_state
            .context("Game state is required. Use .game_state() to set it.")?;

        let oracle = self
            .oracle
            .context("Item catalog is required. Use .oracle() to set it.")?;

        let transfer = self
            .transfer
            .context("Transfer backend is required. Use .transfer() to set it.")?;

        let refresh: Arc<dyn SessionRefresh> = match self.refresh {
            Some(refresh) => refresh,
            None => Arc::new(|| tracing::info!("session refresh requested")),
        };

        Ok(Client {
            panel: WithdrawPanel::new(game_state, oracle, transfer, refresh),
        })
    }
}
