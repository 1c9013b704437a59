//! One withdraw panel, from opening to acknowledgement.
//!
//! The panel composes a [`BasketManager`] and a [`SubmissionController`] for
//! each open session. Opening is edge-triggered: only a closed -> open
//! transition restages the defaults read from the [`GameStateProvider`].

use std::sync::Arc;

use client_blockchain_core::TokenTransfer;
use rust_decimal::Decimal;
use withdraw_core::{
    Address, BasketManager, BasketOp, BasketSnapshot, InventorySnapshot, ItemId, ItemOracle,
};

use crate::controller::{SubmissionController, SubmissionOutcome, SubmissionPhase};
use crate::error::PanelError;
use crate::provider::{GameStateProvider, SessionRefresh};

/// Render-ready state of an open panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelView {
    pub outcome: SubmissionOutcome,
    pub basket: BasketSnapshot,
}

impl PanelView {
    pub fn phase(&self) -> SubmissionPhase {
        self.outcome.phase()
    }
}

/// Defaults captured when the panel opened; acknowledgement restores them.
#[derive(Clone, Debug)]
struct OpenDefaults {
    inventory: Arc<InventorySnapshot>,
    destination: Address,
    token_amount: Decimal,
}

struct PanelSession {
    basket: BasketManager,
    controller: SubmissionController,
    defaults: OpenDefaults,
}

pub struct WithdrawPanel {
    provider: Arc<dyn GameStateProvider>,
    oracle: Arc<dyn ItemOracle>,
    transfer: Arc<dyn TokenTransfer>,
    refresh: Arc<dyn SessionRefresh>,
    session: Option<PanelSession>,
}

impl WithdrawPanel {
    pub fn new(
        provider: Arc<dyn GameStateProvider>,
        oracle: Arc<dyn ItemOracle>,
        transfer: Arc<dyn TokenTransfer>,
        refresh: Arc<dyn SessionRefresh>,
    ) -> Self {
        Self {
            provider,
            oracle,
            transfer,
            refresh,
            session: None,
        }
    }

    /// Applies the panel's `isOpen` signal. Returns `true` on an edge.
    pub fn set_open(&mut self, open: bool) -> bool {
        match (self.session.is_some(), open) {
            (false, true) => {
                self.open();
                true
            }
            (true, false) => {
                self.close();
                true
            }
            _ => false,
        }
    }

    fn open(&mut self) {
        let defaults = OpenDefaults {
            inventory: self.provider.inventory(),
            destination: self.provider.wallet_address(),
            token_amount: self.provider.balance(),
        };
        let farm_id = self.provider.farm_id();

        tracing::info!(
            %farm_id,
            items = defaults.inventory.len(),
            balance = %defaults.token_amount,
            "withdraw panel opened"
        );

        self.session = Some(PanelSession {
            basket: BasketManager::new(
                Arc::clone(&defaults.inventory),
                defaults.destination.clone(),
                defaults.token_amount,
            ),
            controller: SubmissionController::new(
                Arc::clone(&self.transfer),
                Arc::clone(&self.oracle),
                farm_id,
            ),
            defaults,
        });
    }

    fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.controller.mark_orphaned();
            tracing::info!(phase = %session.controller.phase(), "withdraw panel closed");
        }
    }

    fn session(&self) -> Result<&PanelSession, PanelError> {
        self.session.as_ref().ok_or(PanelError::Closed)
    }

    /// Basket access, only while the controller accepts input.
    fn editable(&mut self) -> Result<&mut BasketManager, PanelError> {
        let session = self.session.as_mut().ok_or(PanelError::Closed)?;
        match session.controller.phase() {
            SubmissionPhase::Input => Ok(&mut session.basket),
            phase => Err(PanelError::Locked(phase)),
        }
    }

    pub fn add(&mut self, item: &ItemId) -> Result<bool, PanelError> {
        Ok(self.editable()?.add(item))
    }

    pub fn remove(&mut self, item: &ItemId) -> Result<bool, PanelError> {
        Ok(self.editable()?.remove(item))
    }

    pub fn apply(&mut self, op: &BasketOp) -> Result<bool, PanelError> {
        Ok(self.editable()?.apply(op))
    }

    pub fn set_token_amount(&mut self, amount: Decimal) -> Result<(), PanelError> {
        self.editable()?.set_token_amount(amount)?;
        Ok(())
    }

    pub fn set_destination(&mut self, destination: Address) -> Result<(), PanelError> {
        self.editable()?.set_destination(destination);
        Ok(())
    }

    pub async fn submit(&self) -> Result<SubmissionOutcome, PanelError> {
        let session = self.session()?;
        let snapshot = session.basket.snapshot();
        Ok(session.controller.submit(snapshot).await?)
    }

    pub async fn retry(&self) -> Result<SubmissionOutcome, PanelError> {
        Ok(self.session()?.controller.retry().await?)
    }

    /// Ends a terminal cycle: the controller returns to input and the basket
    /// is restaged from the defaults captured at opening.
    ///
    /// After a success the session refresh hook runs.
    pub fn acknowledge(&mut self) -> Result<SubmissionOutcome, PanelError> {
        let session = self.session.as_mut().ok_or(PanelError::Closed)?;
        let acknowledged = session.controller.acknowledge()?;

        let defaults = &session.defaults;
        session.basket.reset(
            Arc::clone(&defaults.inventory),
            defaults.destination.clone(),
            defaults.token_amount,
        );

        if acknowledged == SubmissionOutcome::Succeeded {
            self.refresh.refresh();
        }
        Ok(acknowledged)
    }

    pub fn view(&self) -> Result<PanelView, PanelError> {
        let session = self.session()?;
        Ok(PanelView {
            outcome: session.controller.outcome(),
            basket: session.basket.snapshot(),
        })
    }
}
