//! Withdrawal submission state machine.
//!
//! ```text
//!            submit()               transfer Ok
//!   Input ────────────► Submitting ────────────► Succeeded
//!     ▲                   │    ▲                    │
//!     │      transfer Err │    │ retry()            │
//!     │                   ▼    │                    │
//!     │                  Failed                     │
//!     │                    │                        │
//!     └────────────────────┴────────────────────────┘
//!                     acknowledge()
//! ```
//!
//! The transfer call runs on its own tokio task, so dropping the caller's
//! future (or the whole panel session) never cancels an on-chain withdrawal.
//! The task records the outcome into state shared with the controller.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use client_blockchain_core::{TokenTransfer, TransferRequest};
use withdraw_core::{BasketSnapshot, FarmId, ItemOracle, WithdrawalRequest};

use crate::error::ControllerError;

/// Coarse controller phase, used for gating actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionPhase {
    Input,
    Submitting,
    Succeeded,
    Failed,
}

/// Opaque diagnostic for a failed submission.
///
/// Transfer failures are not classified; the rendered error is kept as is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureReason(String);

impl FailureReason {
    pub fn new(reason: impl fmt::Display) -> Self {
        Self(reason.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observable result of the current submission cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Idle,
    InFlight,
    Succeeded,
    Failed(FailureReason),
}

impl SubmissionOutcome {
    pub fn phase(&self) -> SubmissionPhase {
        match self {
            Self::Idle => SubmissionPhase::Input,
            Self::InFlight => SubmissionPhase::Submitting,
            Self::Succeeded => SubmissionPhase::Succeeded,
            Self::Failed(_) => SubmissionPhase::Failed,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Basket frozen at the first `submit` of a cycle, plus the request built from it.
///
/// `request` is `None` only when building it failed (e.g. an item missing from
/// the catalog); `retry` then rebuilds from the same frozen snapshot.
#[derive(Clone, Debug)]
struct FrozenSubmission {
    snapshot: BasketSnapshot,
    request: Option<WithdrawalRequest>,
}

#[derive(Debug)]
struct ControllerState {
    outcome: SubmissionOutcome,
    frozen: Option<FrozenSubmission>,
    /// Incremented per dispatch; a settlement for an older attempt is ignored.
    attempt: u64,
    orphaned: bool,
}

impl ControllerState {
    fn expect_phase(
        &self,
        action: &'static str,
        allowed: &[SubmissionPhase],
    ) -> Result<(), ControllerError> {
        let phase = self.outcome.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(ControllerError::InvalidTransition { action, phase })
        }
    }

    fn begin_attempt(&mut self) -> u64 {
        self.attempt += 1;
        self.outcome = SubmissionOutcome::InFlight;
        self.attempt
    }
}

type SharedState = Arc<Mutex<ControllerState>>;

fn lock(shared: &SharedState) -> MutexGuard<'_, ControllerState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sequences exactly one withdrawal attempt at a time.
///
/// One controller lives for one open panel session; reopening the panel
/// creates a fresh instance.
pub struct SubmissionController {
    transfer: Arc<dyn TokenTransfer>,
    oracle: Arc<dyn ItemOracle>,
    farm_id: FarmId,
    shared: SharedState,
}

impl SubmissionController {
    pub fn new(
        transfer: Arc<dyn TokenTransfer>,
        oracle: Arc<dyn ItemOracle>,
        farm_id: FarmId,
    ) -> Self {
        Self {
            transfer,
            oracle,
            farm_id,
            shared: Arc::new(Mutex::new(ControllerState {
                outcome: SubmissionOutcome::Idle,
                frozen: None,
                attempt: 0,
                orphaned: false,
            })),
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        lock(&self.shared).outcome.phase()
    }

    pub fn outcome(&self) -> SubmissionOutcome {
        lock(&self.shared).outcome.clone()
    }

    /// Request frozen by the current cycle, if one was built.
    pub fn frozen_request(&self) -> Option<WithdrawalRequest> {
        lock(&self.shared)
            .frozen
            .as_ref()
            .and_then(|frozen| frozen.request.clone())
    }

    /// Freezes `snapshot`, builds the request and sends it.
    ///
    /// Only accepted from [`SubmissionPhase::Input`]. A request that cannot be
    /// built fails the cycle without reaching the transfer backend.
    pub async fn submit(
        &self,
        snapshot: BasketSnapshot,
    ) -> Result<SubmissionOutcome, ControllerError> {
        let (attempt, request) = {
            let mut guard = lock(&self.shared);
            let state = &mut *guard;
            state.expect_phase("submit", &[SubmissionPhase::Input])?;

            let built = WithdrawalRequest::build(&snapshot, self.farm_id, self.oracle.as_ref());
            state.frozen = Some(FrozenSubmission {
                snapshot,
                request: built.as_ref().ok().cloned(),
            });

            match built {
                Ok(request) => (state.begin_attempt(), request),
                Err(err) => {
                    tracing::warn!(error = %err, "withdrawal request could not be built");
                    state.outcome = SubmissionOutcome::Failed(FailureReason::new(err));
                    return Ok(state.outcome.clone());
                }
            }
        };

        Ok(self.dispatch(attempt, request).await)
    }

    /// Re-sends the frozen request of a failed cycle.
    ///
    /// The basket is not re-read: whatever was frozen at the first `submit`
    /// is sent again.
    pub async fn retry(&self) -> Result<SubmissionOutcome, ControllerError> {
        let (attempt, request) = {
            let mut guard = lock(&self.shared);
            let state = &mut *guard;
            state.expect_phase("retry", &[SubmissionPhase::Failed])?;

            let frozen = state
                .frozen
                .as_mut()
                .ok_or(ControllerError::NothingToRetry)?;

            let request = match frozen.request.clone() {
                Some(request) => request,
                None => match WithdrawalRequest::build(
                    &frozen.snapshot,
                    self.farm_id,
                    self.oracle.as_ref(),
                ) {
                    Ok(request) => {
                        frozen.request = Some(request.clone());
                        request
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "withdrawal request still cannot be built");
                        state.outcome = SubmissionOutcome::Failed(FailureReason::new(err));
                        return Ok(state.outcome.clone());
                    }
                },
            };

            tracing::info!(attempt = state.attempt + 1, "retrying withdrawal");
            (state.begin_attempt(), request)
        };

        Ok(self.dispatch(attempt, request).await)
    }

    /// Closes a terminal cycle and returns to [`SubmissionPhase::Input`].
    ///
    /// Returns the outcome that was acknowledged.
    pub fn acknowledge(&self) -> Result<SubmissionOutcome, ControllerError> {
        let mut state = lock(&self.shared);
        state.expect_phase(
            "acknowledge",
            &[SubmissionPhase::Succeeded, SubmissionPhase::Failed],
        )?;

        let acknowledged = std::mem::replace(&mut state.outcome, SubmissionOutcome::Idle);
        state.frozen = None;
        tracing::debug!(outcome = %acknowledged.phase(), "submission acknowledged");
        Ok(acknowledged)
    }

    /// Marks this controller as detached from its panel session.
    ///
    /// An in-flight transfer keeps running; its settlement is still recorded
    /// here, just no longer observed by any panel.
    pub fn mark_orphaned(&self) {
        let mut state = lock(&self.shared);
        state.orphaned = true;
        if state.outcome == SubmissionOutcome::InFlight {
            tracing::warn!(
                farm_id = %self.farm_id,
                "panel closed during submission, transfer continues unobserved"
            );
        }
    }

    async fn dispatch(&self, attempt: u64, request: WithdrawalRequest) -> SubmissionOutcome {
        let wire = TransferRequest::from(&request);
        tracing::info!(
            backend = self.transfer.name(),
            farm_id = %wire.farm_id,
            to = %wire.to,
            items = wire.ids.len(),
            tokens = %wire.tokens,
            attempt,
            "submitting withdrawal"
        );

        let transfer = Arc::clone(&self.transfer);
        let shared = Arc::clone(&self.shared);
        // The settling task outlives the caller; the inner task isolates a
        // panicking backend so the attempt is always settled.
        let task = tokio::spawn(async move {
            let call = tokio::spawn(async move { transfer.withdraw(wire).await });
            let result = match call.await {
                Ok(result) => result.map_err(FailureReason::new),
                Err(join_error) => Err(aborted(&join_error)),
            };
            settle(&shared, attempt, result)
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => settle(&self.shared, attempt, Err(aborted(&join_error))),
        }
    }
}

fn aborted(join_error: &tokio::task::JoinError) -> FailureReason {
    FailureReason::new(format!("transfer task aborted: {join_error}"))
}

/// Records the settlement of `attempt`, returning the resulting outcome.
fn settle(
    shared: &SharedState,
    attempt: u64,
    result: Result<(), FailureReason>,
) -> SubmissionOutcome {
    let mut state = lock(shared);
    if state.attempt != attempt || state.outcome != SubmissionOutcome::InFlight {
        tracing::debug!(attempt, current = state.attempt, "ignoring stale settlement");
        return state.outcome.clone();
    }

    state.outcome = match result {
        Ok(()) => {
            tracing::info!(attempt, orphaned = state.orphaned, "withdrawal succeeded");
            SubmissionOutcome::Succeeded
        }
        Err(reason) => {
            tracing::warn!(attempt, orphaned = state.orphaned, %reason, "withdrawal failed");
            SubmissionOutcome::Failed(reason)
        }
    };
    state.outcome.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use client_blockchain_core::{MockTransfer, TransferError};
    use rust_decimal_macros::dec;
    use tokio::sync::Notify;
    use withdraw_core::{
        Address, BasketManager, ContractId, InventorySnapshot, ItemId, ItemMetadata,
        StaticItemOracle,
    };

    fn oracle() -> Arc<dyn ItemOracle> {
        Arc::new(StaticItemOracle::new([
            ItemMetadata::new(ItemId::from("wood"), ContractId(601)),
            ItemMetadata::new(ItemId::from("stone"), ContractId(602)),
        ]))
    }

    fn snapshot(items: &[&str]) -> BasketSnapshot {
        let inventory = InventorySnapshot::new([
            (ItemId::from("wood"), dec!(5)),
            (ItemId::from("stone"), dec!(2)),
            (ItemId::from("gold"), dec!(1)),
        ])
        .unwrap();
        let mut manager = BasketManager::new(inventory, Address::from("0xABC"), dec!(10.5));
        for item in items {
            manager.add(&ItemId::from(*item));
        }
        manager.snapshot()
    }

    /// Backend that panics once released, after the caller may be gone.
    #[derive(Default)]
    struct PanicAfterRelease {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl TokenTransfer for PanicAfterRelease {
        async fn withdraw(&self, _request: TransferRequest) -> Result<(), TransferError> {
            self.started.notify_one();
            self.release.notified().await;
            panic!("wallet bridge crashed");
        }

        fn name(&self) -> &str {
            "panic-after-release"
        }
    }

    fn controller(transfer: &MockTransfer) -> SubmissionController {
        SubmissionController::new(Arc::new(transfer.clone()), oracle(), FarmId(1))
    }

    #[tokio::test]
    async fn submit_success_reaches_succeeded() {
        let transfer = MockTransfer::new();
        let controller = controller(&transfer);

        let outcome = controller.submit(snapshot(&["wood", "wood", "stone"])).await.unwrap();

        assert_eq!(outcome, SubmissionOutcome::Succeeded);
        assert_eq!(controller.phase(), SubmissionPhase::Succeeded);
        let requests = transfer.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].ids, [ContractId(601), ContractId(602)]);
        assert_eq!(requests[0].amounts, [dec!(2), dec!(1)]);
    }

    #[tokio::test]
    async fn transfer_error_is_kept_as_opaque_reason() {
        let transfer = MockTransfer::new();
        transfer.push_outcome(Err(TransferError::Network("timeout".into())));
        let controller = controller(&transfer);

        let outcome = controller.submit(snapshot(&["wood"])).await.unwrap();

        let reason = outcome.failure().unwrap();
        assert_eq!(reason.as_str(), "Network error: timeout");
        assert_eq!(controller.phase(), SubmissionPhase::Failed);
    }

    #[tokio::test]
    async fn unknown_item_fails_before_transfer() {
        let transfer = MockTransfer::new();
        let controller = controller(&transfer);

        let outcome = controller.submit(snapshot(&["wood", "gold"])).await.unwrap();

        assert_eq!(outcome.phase(), SubmissionPhase::Failed);
        assert!(outcome.failure().unwrap().as_str().contains("gold"));
        assert_eq!(transfer.calls(), 0);
        assert!(controller.frozen_request().is_none());
    }

    #[tokio::test]
    async fn submit_outside_input_is_rejected() {
        let transfer = MockTransfer::new();
        let controller = controller(&transfer);
        controller.submit(snapshot(&["wood"])).await.unwrap();

        let err = controller.submit(snapshot(&["stone"])).await.unwrap_err();

        assert_eq!(
            err,
            ControllerError::InvalidTransition {
                action: "submit",
                phase: SubmissionPhase::Succeeded,
            }
        );
        assert_eq!(transfer.calls(), 1);
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_rejected() {
        let transfer = MockTransfer::gated();
        let controller = Arc::new(controller(&transfer));

        let first = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.submit(snapshot(&["wood"])).await }
        });
        transfer.wait_for_calls(1).await;
        assert_eq!(controller.phase(), SubmissionPhase::Submitting);
        assert_eq!(controller.outcome(), SubmissionOutcome::InFlight);

        let second = controller.submit(snapshot(&["stone"])).await;
        assert_eq!(
            second,
            Err(ControllerError::InvalidTransition {
                action: "submit",
                phase: SubmissionPhase::Submitting,
            })
        );

        transfer.release(1);
        assert_eq!(first.await.unwrap(), Ok(SubmissionOutcome::Succeeded));
        assert_eq!(transfer.calls(), 1);
        assert_eq!(transfer.requests()[0].ids, [ContractId(601)]);
    }

    #[tokio::test]
    async fn acknowledge_only_from_terminal_phases() {
        let transfer = MockTransfer::new();
        let controller = controller(&transfer);

        assert_eq!(
            controller.acknowledge(),
            Err(ControllerError::InvalidTransition {
                action: "acknowledge",
                phase: SubmissionPhase::Input,
            })
        );

        controller.submit(snapshot(&["wood"])).await.unwrap();
        assert_eq!(controller.acknowledge(), Ok(SubmissionOutcome::Succeeded));
        assert_eq!(controller.phase(), SubmissionPhase::Input);
        assert!(controller.frozen_request().is_none());
    }

    #[tokio::test]
    async fn retry_resends_the_frozen_request() {
        let transfer = MockTransfer::new();
        transfer.push_outcome(Err(TransferError::Rejected("denied".into())));
        let controller = controller(&transfer);

        controller.submit(snapshot(&["wood", "stone"])).await.unwrap();
        assert_eq!(controller.phase(), SubmissionPhase::Failed);

        let outcome = controller.retry().await.unwrap();

        assert_eq!(outcome, SubmissionOutcome::Succeeded);
        let requests = transfer.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test]
    async fn retry_requires_failed_phase() {
        let transfer = MockTransfer::new();
        let controller = controller(&transfer);

        assert_eq!(
            controller.retry().await,
            Err(ControllerError::InvalidTransition {
                action: "retry",
                phase: SubmissionPhase::Input,
            })
        );
    }

    #[tokio::test]
    async fn dropped_caller_does_not_cancel_transfer() {
        let transfer = MockTransfer::gated();
        let controller = controller(&transfer);

        let submit = controller.submit(snapshot(&["wood"]));
        tokio::select! {
            _ = submit => panic!("gated transfer settled early"),
            _ = transfer.wait_for_calls(1) => {}
        }
        controller.mark_orphaned();
        assert_eq!(controller.phase(), SubmissionPhase::Submitting);

        transfer.release(1);
        while controller.phase() == SubmissionPhase::Submitting {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.outcome(), SubmissionOutcome::Succeeded);
    }

    #[tokio::test]
    async fn backend_panic_after_caller_dropped_still_settles() {
        let backend = Arc::new(PanicAfterRelease::default());
        let controller = SubmissionController::new(backend.clone(), oracle(), FarmId(1));

        {
            let submit = controller.submit(snapshot(&["wood"]));
            tokio::select! {
                _ = submit => panic!("backend settled before release"),
                _ = backend.started.notified() => {}
            }
        }
        controller.mark_orphaned();
        assert_eq!(controller.phase(), SubmissionPhase::Submitting);

        backend.release.notify_one();
        tokio::time::timeout(Duration::from_secs(5), async {
            while controller.phase() == SubmissionPhase::Submitting {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        let outcome = controller.outcome();
        assert!(outcome.failure().unwrap().as_str().starts_with("transfer task aborted"));
        // the failed cycle is recoverable
        assert_eq!(controller.acknowledge(), Ok(outcome));
        assert_eq!(controller.phase(), SubmissionPhase::Input);
    }
}
