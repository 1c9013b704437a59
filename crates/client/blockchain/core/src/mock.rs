//! Mock transfer backend for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use crate::traits::{TokenTransfer, TransferError};
use crate::types::TransferRequest;

/// Mock transfer backend for testing without network.
///
/// Records every request, answers from a script of outcomes (success once the
/// script runs out), and can hold calls in flight until the test releases them.
#[derive(Clone, Default)]
pub struct MockTransfer {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    requests: Mutex<Vec<TransferRequest>>,
    script: Mutex<VecDeque<Result<(), TransferError>>>,
    started: Notify,
    gate: Option<Semaphore>,
}

impl MockTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose calls stay in flight until [`Self::release`] is called.
    pub fn gated() -> Self {
        Self {
            shared: Arc::new(Shared {
                gate: Some(Semaphore::new(0)),
                ..Shared::default()
            }),
        }
    }

    /// Queue the outcome of the next unscripted call.
    pub fn push_outcome(&self, outcome: Result<(), TransferError>) {
        lock(&self.shared.script).push_back(outcome);
    }

    /// Let `calls` gated calls settle.
    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.shared.gate {
            gate.add_permits(calls);
        }
    }

    pub fn requests(&self) -> Vec<TransferRequest> {
        lock(&self.shared.requests).clone()
    }

    pub fn calls(&self) -> usize {
        lock(&self.shared.requests).len()
    }

    /// Wait until at least `calls` requests have reached the backend.
    pub async fn wait_for_calls(&self, calls: usize) {
        loop {
            let started = self.shared.started.notified();
            if self.calls() >= calls {
                return;
            }
            started.await;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl TokenTransfer for MockTransfer {
    async fn withdraw(&self, request: TransferRequest) -> Result<(), TransferError> {
        lock(&self.shared.requests).push(request);
        self.shared.started.notify_waiters();

        if let Some(gate) = &self.shared.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        lock(&self.shared.script).pop_front().unwrap_or(Ok(()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
