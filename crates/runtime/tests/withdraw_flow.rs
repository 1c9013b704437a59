use std::sync::Arc;

use async_trait::async_trait;
use client_blockchain_core::{MockTransfer, TokenTransfer, TransferError, TransferRequest};
use rust_decimal_macros::dec;
use withdraw_core::{
    Address, BasketManager, ContractId, FarmId, InventorySnapshot, ItemId, ItemMetadata,
    StaticItemOracle,
};
use withdraw_runtime::{
    PanelError, StaticGameState, SubmissionController, SubmissionOutcome, SubmissionPhase,
    WithdrawPanel,
};

fn inventory() -> Arc<InventorySnapshot> {
    Arc::new(
        InventorySnapshot::new([
            (ItemId::from("wood"), dec!(5)),
            (ItemId::from("stone"), dec!(2)),
        ])
        .unwrap(),
    )
}

fn oracle() -> Arc<StaticItemOracle> {
    Arc::new(StaticItemOracle::new([
        ItemMetadata::new(ItemId::from("wood"), ContractId(601)).with_image("wood.png"),
        ItemMetadata::new(ItemId::from("stone"), ContractId(602)),
    ]))
}

fn panel(transfer: Arc<dyn TokenTransfer>) -> WithdrawPanel {
    let provider = StaticGameState {
        farm_id: FarmId(1),
        balance: dec!(25),
        address: Address::from("0x111"),
        inventory: inventory(),
    };
    WithdrawPanel::new(Arc::new(provider), oracle(), transfer, Arc::new(|| {}))
}

/// Backend that panics mid-call, standing in for a crashed wallet bridge.
struct PanickingTransfer;

#[async_trait]
impl TokenTransfer for PanickingTransfer {
    async fn withdraw(&self, _request: TransferRequest) -> Result<(), TransferError> {
        panic!("wallet bridge crashed");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Full player session: select, edit, submit, acknowledge.
#[tokio::test]
async fn test_wood_and_stone_withdrawal() {
    let transfer = MockTransfer::new();
    let mut panel = panel(Arc::new(transfer.clone()));

    // ================================================================
    // Selection
    // ================================================================
    panel.set_open(true);
    let wood = ItemId::from("wood");
    let stone = ItemId::from("stone");

    assert!(panel.add(&wood).unwrap());
    assert!(panel.add(&wood).unwrap());
    assert!(panel.add(&stone).unwrap());

    let view = panel.view().unwrap();
    assert_eq!(view.basket.remaining(&wood), dec!(3));
    assert_eq!(view.basket.remaining(&stone), dec!(1));

    assert!(panel.remove(&wood).unwrap());
    let view = panel.view().unwrap();
    assert_eq!(view.basket.remaining(&wood), dec!(4));
    assert_eq!(view.basket.remaining(&stone), dec!(1));

    panel.set_destination(Address::from("0xABC")).unwrap();
    panel.set_token_amount(dec!(10.5)).unwrap();
    assert_eq!(panel.view().unwrap().basket.token_amount_display(), "10.5");

    // ================================================================
    // Submission
    // ================================================================
    let outcome = panel.submit().await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::Succeeded);

    let requests = transfer.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.to, Address::from("0xABC"));
    assert_eq!(request.tokens, dec!(10.5));
    assert_eq!(request.farm_id, FarmId(1));
    assert_eq!(request.ids, [ContractId(601), ContractId(602)]);
    assert_eq!(request.amounts, [dec!(1), dec!(1)]);

    // ================================================================
    // Acknowledgement
    // ================================================================
    panel.acknowledge().unwrap();
    let view = panel.view().unwrap();
    assert_eq!(view.phase(), SubmissionPhase::Input);
    assert!(view.basket.entries().is_empty());
    assert_eq!(view.basket.remaining(&wood), dec!(5));
    assert_eq!(view.basket.destination(), &Address::from("0x111"));
}

/// A failed transfer is retried with the request frozen at first submit,
/// even after a different basket has been staged elsewhere.
#[tokio::test]
async fn test_retry_uses_frozen_request() {
    let transfer = MockTransfer::new();
    transfer.push_outcome(Err(TransferError::Rejected("signature denied".into())));
    let controller =
        SubmissionController::new(Arc::new(transfer.clone()), oracle(), FarmId(1));

    let mut manager = BasketManager::new(inventory(), Address::from("0xABC"), dec!(10.5));
    manager.add(&ItemId::from("wood"));
    manager.add(&ItemId::from("stone"));

    let outcome = controller.submit(manager.snapshot()).await.unwrap();
    assert_eq!(outcome.phase(), SubmissionPhase::Failed);
    let frozen = controller.frozen_request().unwrap();

    // a fresh manager with a different selection must not leak into retry
    let mut other = BasketManager::new(inventory(), Address::from("0xDEF"), dec!(1));
    other.add(&ItemId::from("wood"));
    other.add(&ItemId::from("wood"));
    manager.add(&ItemId::from("wood"));

    assert_eq!(controller.retry().await, Ok(SubmissionOutcome::Succeeded));

    let requests = transfer.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
    assert_eq!(requests[1], TransferRequest::from(&frozen));
    assert_eq!(requests[1].to, Address::from("0xABC"));
    assert_eq!(requests[1].amounts, [dec!(1), dec!(1)]);
}

/// Closing mid-submission orphans the controller; reopening starts clean
/// while the original transfer still settles.
#[tokio::test]
async fn test_close_during_submission_orphans_session() {
    let transfer = MockTransfer::gated();
    let mut panel = panel(Arc::new(transfer.clone()));
    panel.set_open(true);
    panel.add(&ItemId::from("wood")).unwrap();

    {
        let submit = panel.submit();
        tokio::select! {
            _ = submit => panic!("gated transfer settled early"),
            _ = transfer.wait_for_calls(1) => {}
        }
    }
    assert_eq!(
        panel.view().unwrap().phase(),
        SubmissionPhase::Submitting
    );
    assert_eq!(
        panel.add(&ItemId::from("wood")),
        Err(PanelError::Locked(SubmissionPhase::Submitting))
    );

    panel.set_open(false);
    panel.set_open(true);
    let view = panel.view().unwrap();
    assert_eq!(view.outcome, SubmissionOutcome::Idle);
    assert!(view.basket.entries().is_empty());

    transfer.release(1);
    // the new session is unaffected by the orphaned settlement
    tokio::task::yield_now().await;
    assert_eq!(panel.view().unwrap().outcome, SubmissionOutcome::Idle);
    assert_eq!(transfer.calls(), 1);
}

/// A backend that panics still leaves the controller in a terminal phase.
#[tokio::test]
async fn test_panicking_backend_fails_cleanly() {
    let mut panel = panel(Arc::new(PanickingTransfer));
    panel.set_open(true);
    panel.add(&ItemId::from("stone")).unwrap();

    let outcome = panel.submit().await.unwrap();

    let reason = outcome.failure().unwrap();
    assert!(reason.as_str().starts_with("transfer task aborted"));
    assert_eq!(panel.acknowledge(), Ok(outcome));
    assert_eq!(panel.view().unwrap().phase(), SubmissionPhase::Input);
}

/// An empty basket with zero tokens is still sent, exactly once per submit.
#[tokio::test]
async fn test_empty_submission_is_sent_once() {
    let transfer = MockTransfer::new();
    let mut panel = panel(Arc::new(transfer.clone()));
    panel.set_open(true);
    panel.set_token_amount(dec!(0)).unwrap();

    assert_eq!(panel.submit().await, Ok(SubmissionOutcome::Succeeded));

    let requests = transfer.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].ids.is_empty());
    assert!(requests[0].amounts.is_empty());
    assert_eq!(requests[0].tokens, dec!(0));
    assert_eq!(requests[0].to, Address::from("0x111"));

    // a token-only withdrawal in the next cycle carries no items either
    panel.acknowledge().unwrap();
    panel.set_token_amount(dec!(2)).unwrap();
    assert_eq!(panel.submit().await, Ok(SubmissionOutcome::Succeeded));
    let requests = transfer.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].ids.is_empty());
    assert_eq!(requests[1].tokens, dec!(2));
}
